//! Extensible record codec
//!
//! Records are size-prefixed so readers and writers built from different
//! versions of a schema can exchange them:
//!
//! ```text
//! total_size: i32   # bytes from the start of this header to the record end
//! field_0
//! field_1
//! ...
//! ```
//!
//! A reader stops at the declared end: fields it knows but the writer did
//! not emit keep their defaults, and trailing fields it does not know are
//! skipped. Fields may only ever be appended to a record definition.

/// Declare an extensible record and its wire codec.
///
/// Every field names its default after `=`; defaults apply both to
/// `Default::default()` and to fields an older writer did not send. An
/// optional `stability = Vintf;` (or `Network;`) prefix declares the
/// record's [`Stability`](crate::Stability); it is `Local` otherwise.
///
/// ```
/// use parcel_wire::{from_bytes, to_bytes, wire_record};
///
/// wire_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Point {
///         pub x: i32 = 0,
///         pub y: i32 = 0,
///         pub label: Option<String> = None,
///     }
/// }
///
/// let point = Point { x: 3, y: -4, label: Some("origin".into()) };
/// let bytes = to_bytes(&point).unwrap();
/// assert_eq!(from_bytes::<Point>(&bytes).unwrap(), point);
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        stability = $stability:ident;
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        impl $crate::Descriptor for $name {
            const DESCRIPTOR: &'static str = concat!(module_path!(), "::", stringify!($name));
            const STABILITY: $crate::Stability = $crate::Stability::$stability;
        }

        impl $crate::WireEncode for $name {
            fn wire_encode(&self, parcel: &mut $crate::Parcel) -> $crate::Result<()> {
                parcel.sized_write(|body| {
                    $( $crate::WireEncode::wire_encode(&self.$field, body)?; )*
                    let _ = body;
                    ::core::result::Result::Ok(())
                })
            }
        }

        impl $crate::WireDecode for $name {
            fn wire_decode(parcel: &mut $crate::Parcel) -> $crate::Result<Self> {
                #[allow(unused_mut)]
                let mut value = <Self as ::core::default::Default>::default();
                parcel.sized_read(|body| {
                    $(
                        if !body.has_more_data() {
                            $crate::__private::tracing::trace!(
                                "{} ended before field {}",
                                stringify!($name),
                                stringify!($field)
                            );
                            return ::core::result::Result::Ok(());
                        }
                        $crate::WireDecode::wire_decode_into(&mut value.$field, body)?;
                    )*
                    let _ = body;
                    ::core::result::Result::Ok(())
                })?;
                ::core::result::Result::Ok(value)
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
        $vis:vis struct $($rest:tt)*
    ) => {
        $crate::wire_record! {
            stability = Local;
            $(#[$meta])*
            $vis struct $($rest)*
        }
    };
}
