//! Open enumerations over a fixed integer backing type
//!
//! Schema enums are newtypes rather than Rust enums: a value written by a
//! newer peer with an enumerator this build does not know still decodes,
//! and is written back unchanged. Words outside the backing type's range
//! are rejected.

/// Declare an open enumeration.
///
/// ```
/// use parcel_wire::{from_bytes, to_bytes, wire_enum};
///
/// wire_enum! {
///     pub struct Mode: i32 {
///         OFF = 0,
///         ON = 1,
///     }
/// }
///
/// assert_eq!(Mode::default(), Mode::OFF);
/// let bytes = to_bytes(&Mode(7)).unwrap();
/// let unknown = from_bytes::<Mode>(&bytes).unwrap();
/// assert_eq!(unknown, Mode(7));
/// assert_eq!(unknown.name(), None);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $backing:ty {
            $(#[$first_meta:meta])*
            $first:ident = $first_value:expr
            $(,
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            )* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(pub $backing);

        impl $name {
            $(#[$first_meta])*
            pub const $first: Self = Self($first_value);
            $(
                $(#[$variant_meta])*
                pub const $variant: Self = Self($value);
            )*

            /// Every declared enumerator, in declaration order
            pub const VALUES: &'static [Self] = &[Self::$first, $( Self::$variant, )*];

            /// Enumerator name, or `None` for a value this build does not declare
            pub fn name(self) -> ::core::option::Option<&'static str> {
                if self == Self::$first {
                    return ::core::option::Option::Some(stringify!($first));
                }
                $(
                    if self == Self::$variant {
                        return ::core::option::Option::Some(stringify!($variant));
                    }
                )*
                ::core::option::Option::None
            }

            pub fn is_known(self) -> bool {
                self.name().is_some()
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::WireEncode for $name {
            fn wire_encode(&self, parcel: &mut $crate::Parcel) -> $crate::Result<()> {
                $crate::WireEncode::wire_encode(&self.0, parcel)
            }
        }

        impl $crate::WireDecode for $name {
            fn wire_decode(parcel: &mut $crate::Parcel) -> $crate::Result<Self> {
                ::core::result::Result::Ok(Self($crate::WireDecode::wire_decode(parcel)?))
            }
        }
    };
}
