//! Wire encoding traits

use crate::{Parcel, Result};

/// Trait for types that can be encoded onto a [`Parcel`]
pub trait WireEncode {
    /// Encode this value at the parcel's current position and advance it.
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()>;
}

/// Encoding of an absent-or-present value of this type.
///
/// Strings and arrays mark absence with a `-1` length; records and unions
/// with a leading int32 presence flag. Implementing this trait makes
/// `Option<Self>` encodable.
pub trait WireEncodeOption: WireEncode {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()>;
}

impl<T: WireEncodeOption> WireEncode for Option<T> {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        T::wire_encode_option(self.as_ref(), parcel)
    }
}

impl<T: WireEncode + ?Sized> WireEncode for &T {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        (**self).wire_encode(parcel)
    }
}

impl<T: WireEncode + ?Sized> WireEncode for Box<T> {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        (**self).wire_encode(parcel)
    }
}

impl<T: WireEncodeOption> WireEncodeOption for Box<T> {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        T::wire_encode_option(value.map(|boxed| &**boxed), parcel)
    }
}

/// Presence-flag encoding shared by records and unions
pub fn encode_with_presence<T: WireEncode + ?Sized>(value: Option<&T>, parcel: &mut Parcel) -> Result<()> {
    match value {
        None => parcel.write_presence(false),
        Some(value) => {
            parcel.write_presence(true)?;
            value.wire_encode(parcel)
        }
    }
}
