//! Primitive type implementations
//!
//! Every primitive occupies at least one 4-byte word on the wire:
//!
//! | Schema type | Rust Type | Wire size | Encoding              |
//! |-------------|-----------|-----------|-----------------------|
//! | boolean     | bool      | 4         | int32 0 / 1           |
//! | byte        | i8 / u8   | 4         | int32, sign/zero ext. |
//! | char        | u16       | 4         | int32, zero extended  |
//! | int         | i32       | 4         | int32                 |
//! | long        | i64       | 8         | int64                 |
//! | float       | f32       | 4         | IEEE 754 single       |
//! | double      | f64       | 8         | IEEE 754 double       |

use crate::{Parcel, Result, WireDecode, WireEncode, WireError};

// Implements the codec for types carried natively by a parcel primitive
macro_rules! impl_wire_primitive {
    ($ty:ty, $write:ident, $read:ident) => {
        impl WireEncode for $ty {
            fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
                parcel.$write(*self)
            }
        }

        impl WireDecode for $ty {
            fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
                parcel.$read()
            }
        }
    };
}

// Sub-word integers widen to an int32 word; decoding rejects words outside
// the type's range.
macro_rules! impl_wire_widened {
    ($ty:ty) => {
        impl WireEncode for $ty {
            fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
                parcel.write_i32(i32::from(*self))
            }
        }

        impl WireDecode for $ty {
            fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
                let word = parcel.read_i32()?;
                <$ty>::try_from(word).map_err(|_| WireError::ValueOutOfRange {
                    type_name: stringify!($ty),
                    value: word,
                })
            }
        }
    };
}

impl_wire_primitive!(i32, write_i32, read_i32);
impl_wire_primitive!(i64, write_i64, read_i64);
impl_wire_primitive!(f32, write_f32, read_f32);
impl_wire_primitive!(f64, write_f64, read_f64);

impl_wire_widened!(i8);
impl_wire_widened!(u8);
impl_wire_widened!(u16);

impl WireEncode for bool {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_i32(i32::from(*self))
    }
}

impl WireDecode for bool {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        Ok(parcel.read_i32()? != 0)
    }
}
