//! Wire decoding traits

use crate::{Parcel, Result};

/// Trait for types that can be decoded from a [`Parcel`]
pub trait WireDecode: Sized {
    /// Decode a value starting at the parcel's current position.
    ///
    /// On success the position has advanced past everything the value
    /// occupies. On failure the value is not produced at all.
    fn wire_decode(parcel: &mut Parcel) -> Result<Self>;

    /// Decode over an existing value, such as a record field holding its
    /// schema default. Types whose declared metadata must survive an
    /// absent encoding override this.
    fn wire_decode_into(&mut self, parcel: &mut Parcel) -> Result<()> {
        *self = Self::wire_decode(parcel)?;
        Ok(())
    }
}

/// Decoding counterpart of [`WireEncodeOption`](crate::WireEncodeOption)
pub trait WireDecodeOption: WireDecode {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>>;
}

impl<T: WireDecodeOption> WireDecode for Option<T> {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        T::wire_decode_option(parcel)
    }
}

impl<T: WireDecode> WireDecode for Box<T> {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        T::wire_decode(parcel).map(Box::new)
    }
}

impl<T: WireDecodeOption> WireDecodeOption for Box<T> {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>> {
        Ok(T::wire_decode_option(parcel)?.map(Box::new))
    }
}

/// Presence-flag decoding shared by records and unions
pub fn decode_with_presence<T: WireDecode>(parcel: &mut Parcel) -> Result<Option<T>> {
    if parcel.read_presence()? {
        T::wire_decode(parcel).map(Some)
    } else {
        Ok(None)
    }
}
