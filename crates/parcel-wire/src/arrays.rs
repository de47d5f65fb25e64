//! Array codecs
//!
//! - `Vec<T>`: homogeneous array, `count: i32` then each element
//! - `[T; N]`: fixed-size array, same layout; the count must equal `N`
//! - `Bytes`: packed byte array, `length: i32` then raw bytes padded to 4
//!
//! In every case a count of `-1` marks an absent array, which only the
//! `Option<_>` forms accept.

use crate::{Parcel, Result, WireDecode, WireDecodeOption, WireEncode, WireEncodeOption, WireError};
use bytes::Bytes;

fn encode_elements<T: WireEncode>(elements: &[T], parcel: &mut Parcel) -> Result<()> {
    parcel.write_length(Some(elements.len()))?;
    for element in elements {
        element.wire_encode(parcel)?;
    }
    Ok(())
}

fn decode_elements<T: WireDecode>(count: usize, parcel: &mut Parcel) -> Result<Vec<T>> {
    parcel.check_array_count(count)?;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        elements.push(T::wire_decode(parcel)?);
    }
    Ok(elements)
}

fn null_array() -> WireError {
    WireError::InvalidLength(crate::parcel::NULL_LENGTH)
}

impl<T: WireEncode> WireEncode for [T] {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        encode_elements(self, parcel)
    }
}

impl<T: WireEncode> WireEncode for Vec<T> {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        encode_elements(self, parcel)
    }
}

impl<T: WireEncode> WireEncodeOption for Vec<T> {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        match value {
            None => parcel.write_length(None),
            Some(elements) => encode_elements(elements, parcel),
        }
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        let count = parcel.read_length()?.ok_or_else(null_array)?;
        decode_elements(count, parcel)
    }
}

impl<T: WireDecode> WireDecodeOption for Vec<T> {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>> {
        match parcel.read_length()? {
            None => Ok(None),
            Some(count) => decode_elements(count, parcel).map(Some),
        }
    }
}

impl<T: WireEncode, const N: usize> WireEncode for [T; N] {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        encode_elements(self, parcel)
    }
}

impl<T: WireEncode, const N: usize> WireEncodeOption for [T; N] {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        match value {
            None => parcel.write_length(None),
            Some(elements) => encode_elements(elements, parcel),
        }
    }
}

fn decode_fixed<T: WireDecode, const N: usize>(count: usize, parcel: &mut Parcel) -> Result<[T; N]> {
    if count != N {
        return Err(WireError::ArraySizeMismatch { expected: N, got: count });
    }
    let elements = decode_elements(count, parcel)?;
    elements
        .try_into()
        .map_err(|rest: Vec<T>| WireError::ArraySizeMismatch { expected: N, got: rest.len() })
}

impl<T: WireDecode, const N: usize> WireDecode for [T; N] {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        let count = parcel.read_length()?.ok_or_else(null_array)?;
        decode_fixed(count, parcel)
    }
}

impl<T: WireDecode, const N: usize> WireDecodeOption for [T; N] {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>> {
        match parcel.read_length()? {
            None => Ok(None),
            Some(count) => decode_fixed(count, parcel).map(Some),
        }
    }
}

impl WireEncode for Bytes {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_bytes(Some(&self[..]))
    }
}

impl WireEncodeOption for Bytes {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        parcel.write_bytes(value.map(|bytes| &bytes[..]))
    }
}

impl WireDecode for Bytes {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        parcel.read_bytes()?.ok_or_else(null_array)
    }
}

impl WireDecodeOption for Bytes {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>> {
        parcel.read_bytes()
    }
}
