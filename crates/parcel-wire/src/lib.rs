//! Versioned binary wire codec
//!
//! This crate encodes structured values into a flat, position-tracked byte
//! buffer and decodes them back, in a layout that lets independently built
//! peers keep talking while their schemas evolve.
//!
//! # Wire Format
//!
//! - Every item occupies a multiple of 4 bytes; short items are padded
//! - Sub-word integers and `bool` travel as int32
//! - Strings are UTF-16 with a length, a terminator unit and padding
//! - Unions are an int32 discriminant followed by the variant payload
//! - Records are prefixed by their total size, so older readers skip fields
//!   they do not know and newer readers default fields they did not get
//! - Extension slots carry a stability tag and an opaque payload that is
//!   decoded only when read as a concrete type
//!
//! Schema types are declared with [`wire_record!`], [`wire_union!`] and
//! [`wire_enum!`].

mod arrays;
mod context;
mod decode;
mod encode;
mod enums;
mod error;
mod extension;
mod metadata;
mod parcel;
mod primitives;
mod record;
mod strings;
mod union;

pub use context::{WireContext, WIRE_ALIGNMENT};
pub use decode::{decode_with_presence, WireDecode, WireDecodeOption};
pub use encode::{encode_with_presence, WireEncode, WireEncodeOption};
pub use error::{
    Result, WireError, DEFAULT_MAX_ALLOCATION, DEFAULT_MAX_ARRAY_ELEMENTS, DEFAULT_MAX_DEPTH, MAX_OFFSET,
};
pub use extension::{Extension, ExtensionSlot};
pub use metadata::{Descriptor, Stability};
pub use parcel::{from_bytes, from_bytes_with_context, to_bytes, to_bytes_with_context, Parcel, NULL_LENGTH, SIZE_HEADER_LEN};

/// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
