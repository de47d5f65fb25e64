//! Tagged union codec
//!
//! A union is a closed Rust enum with one single-payload variant per
//! alternative. Its wire form is the variant's discriminant followed by the
//! payload, with no length in between:
//!
//! ```text
//! discriminant: i32   # declaration index of the variant, dense from 0
//! payload             # the variant type's own encoding
//! ```
//!
//! Declaring a union with [`wire_union!`](crate::wire_union) generates the
//! enum, a companion tag enum, `Default` (first variant, default payload),
//! [`Descriptor`](crate::Descriptor) and the codec impls. Unknown
//! discriminants fail with [`WireError::UnknownVariant`](crate::WireError)
//! right after the discriminant is read. Each union counts as one nesting
//! level against the context's `max_depth`.
//!
//! ```
//! use parcel_wire::{from_bytes, to_bytes, wire_union};
//!
//! wire_union! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Value: ValueTag {
//!         Int(i32),
//!         Text(String),
//!     }
//! }
//!
//! let value = Value::Text("hi".into());
//! assert_eq!(value.tag(), ValueTag::Text);
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(from_bytes::<Value>(&bytes).unwrap(), value);
//! assert_eq!(Value::default(), Value::Int(0));
//! ```

/// Declare a tagged union and its wire codec.
///
/// An optional `stability = Vintf;` (or `Network;`) prefix declares the
/// union's [`Stability`](crate::Stability); it is `Local` otherwise.
#[macro_export]
macro_rules! wire_union {
    (
        stability = $stability:ident;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $tag:ident {
            $(#[$first_meta:meta])*
            $first:ident($first_ty:ty)
            $(,
                $(#[$variant_meta:meta])*
                $variant:ident($variant_ty:ty)
            )* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(#[$first_meta])*
            $first($first_ty),
            $(
                $(#[$variant_meta])*
                $variant($variant_ty),
            )*
        }

        #[doc = concat!("Discriminants of [`", stringify!($name), "`], in declaration order.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $tag {
            $first,
            $( $variant, )*
        }

        impl $tag {
            /// Every tag, indexed by its discriminant
            pub const ALL: &'static [$tag] = &[$tag::$first, $( $tag::$variant, )*];

            pub fn from_raw(raw: i32) -> ::core::option::Option<Self> {
                let index = <usize as ::core::convert::TryFrom<i32>>::try_from(raw).ok()?;
                Self::ALL.get(index).copied()
            }

            pub fn raw(self) -> i32 {
                self as i32
            }
        }

        impl $name {
            pub fn tag(&self) -> $tag {
                match self {
                    Self::$first(_) => $tag::$first,
                    $( Self::$variant(_) => $tag::$variant, )*
                }
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first(::core::default::Default::default())
            }
        }

        impl $crate::Descriptor for $name {
            const DESCRIPTOR: &'static str = concat!(module_path!(), "::", stringify!($name));
            const STABILITY: $crate::Stability = $crate::Stability::$stability;
        }

        impl $crate::WireEncode for $name {
            fn wire_encode(&self, parcel: &mut $crate::Parcel) -> $crate::Result<()> {
                parcel.write_i32(self.tag().raw())?;
                match self {
                    Self::$first(value) => $crate::WireEncode::wire_encode(value, parcel),
                    $( Self::$variant(value) => $crate::WireEncode::wire_encode(value, parcel), )*
                }
            }
        }

        impl $crate::WireDecode for $name {
            fn wire_decode(parcel: &mut $crate::Parcel) -> $crate::Result<Self> {
                parcel.nested(|parcel| {
                    let raw = parcel.read_i32()?;
                    let tag = match $tag::from_raw(raw) {
                        ::core::option::Option::Some(tag) => tag,
                        ::core::option::Option::None => {
                            $crate::__private::tracing::debug!(
                                "unknown discriminant {} for union {}",
                                raw,
                                stringify!($name)
                            );
                            return ::core::result::Result::Err($crate::WireError::UnknownVariant {
                                type_name: <Self as $crate::Descriptor>::DESCRIPTOR,
                                tag: raw,
                            });
                        }
                    };
                    match tag {
                        $tag::$first => ::core::result::Result::Ok(Self::$first($crate::WireDecode::wire_decode(parcel)?)),
                        $( $tag::$variant => ::core::result::Result::Ok(Self::$variant($crate::WireDecode::wire_decode(parcel)?)), )*
                    }
                })
            }
        }

        impl $crate::WireEncodeOption for $name {
            fn wire_encode_option(
                value: ::core::option::Option<&Self>,
                parcel: &mut $crate::Parcel,
            ) -> $crate::Result<()> {
                $crate::encode_with_presence(value, parcel)
            }
        }

        impl $crate::WireDecodeOption for $name {
            fn wire_decode_option(parcel: &mut $crate::Parcel) -> $crate::Result<::core::option::Option<Self>> {
                $crate::decode_with_presence(parcel)
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $($rest:tt)*
    ) => {
        $crate::wire_union! {
            stability = Local;
            $(#[$meta])*
            $vis enum $($rest)*
        }
    };
}
