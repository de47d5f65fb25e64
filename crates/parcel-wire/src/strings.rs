//! String codec
//!
//! Strings are carried as UTF-16 with an explicit length and a zero
//! terminator unit:
//!
//! ```text
//! length: i32       # code units, -1 for an absent string
//! units[length]     # u16 each
//! 0u16              # terminator
//! padding to 4-byte alignment
//! ```
//!
//! `String` is never absent; use `Option<String>` for a nullable field.

use crate::{Parcel, Result, WireDecode, WireDecodeOption, WireEncode, WireEncodeOption, WireError};

impl WireEncode for str {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_string(Some(self))
    }
}

impl WireEncode for String {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_string(Some(self))
    }
}

impl WireEncodeOption for String {
    fn wire_encode_option(value: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        parcel.write_string(value.map(String::as_str))
    }
}

impl WireDecode for String {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        parcel
            .read_string()?
            .ok_or_else(|| WireError::InvalidString("unexpected null string".to_string()))
    }
}

impl WireDecodeOption for String {
    fn wire_decode_option(parcel: &mut Parcel) -> Result<Option<Self>> {
        parcel.read_string()
    }
}
