/// Implement [`Element`](crate::Element) for one or more scalar types,
/// allowing them to be stored as the leaves of a container.
///
/// The crate invokes this for the primitive types and `String`; user types
/// opt in explicitly:
///
/// ```
/// #[derive(Clone, Debug, PartialEq)]
/// struct Celsius(f32);
///
/// multidim::leaf_element!(Celsius);
///
/// let mut temps = multidim::Vector::<Celsius>::new();
/// temps.push_back(Celsius(21.5));
/// assert_eq!(temps.at(0), &Celsius(21.5));
/// ```
#[macro_export]
macro_rules! leaf_element {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::Element for $t {
                type Base = $t;
                type Extent = $crate::UnitExtent;
                type Buffer = $crate::buffer::LeafBuffer<$t>;
                type Ref<'a>
                    = &'a $t
                where
                    $t: 'a;
                type RefMut<'a>
                    = &'a mut $t
                where
                    $t: 'a;

                const IS_NESTED: bool = false;

                unsafe fn make_ref<'a>(
                    ptr: *const $t,
                    _extent: $crate::UnitExtent,
                ) -> &'a $t
                where
                    $t: 'a,
                {
                    unsafe { &*ptr }
                }

                unsafe fn make_mut<'a>(
                    ptr: *mut $t,
                    _extent: $crate::UnitExtent,
                ) -> &'a mut $t
                where
                    $t: 'a,
                {
                    unsafe { &mut *ptr }
                }

                unsafe fn fmt_element(
                    ptr: *const $t,
                    _extent: $crate::UnitExtent,
                    f: &mut ::std::fmt::Formatter<'_>,
                ) -> ::std::fmt::Result
                where
                    $t: ::std::fmt::Debug,
                {
                    ::std::fmt::Debug::fmt(unsafe { &*ptr }, f)
                }
            }
        )+
    };
}
