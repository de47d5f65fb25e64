//! Wire error types

use thiserror::Error;

/// Largest offset a parcel position may reach. Record sizes and payload
/// lengths travel as int32, so nothing past this can be described.
pub const MAX_OFFSET: usize = i32::MAX as usize;

/// Default cap on a single declared allocation (string, byte array), in bytes
pub const DEFAULT_MAX_ALLOCATION: usize = 16 * 1024 * 1024;

/// Default cap on the element count of a decoded array
pub const DEFAULT_MAX_ARRAY_ELEMENTS: usize = 1024 * 1024;

/// Default cap on how many records and unions may be nested while decoding
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Wire encoding/decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Fewer bytes remain than a primitive or declared span requires
    #[error("truncated: needed {needed} bytes, have {remaining}")]
    Truncated { needed: usize, remaining: usize },

    /// Union discriminant outside the declared variant set
    #[error("unknown variant {tag} for union {type_name}")]
    UnknownVariant { type_name: &'static str, tag: i32 },

    /// Record header declares less than the header itself
    #[error("bad record size: {size}")]
    BadSize { size: i32 },

    /// Record start plus declared size does not fit in the offset range
    #[error("record size overflow: start {start} + size {size} exceeds {max}", max = MAX_OFFSET)]
    SizeOverflow { start: usize, size: usize },

    /// Extension slot read as a type other than the one it holds
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    /// Local value placed into a slot that must stay binary-stable
    #[error("stability violation: {descriptor} is {value:?}, slot requires {slot:?}")]
    StabilityViolation {
        descriptor: &'static str,
        value: crate::Stability,
        slot: crate::Stability,
    },

    /// Attempt to move the cursor outside the buffer
    #[error("invalid position {position}, buffer length {len}")]
    InvalidPosition { position: usize, len: usize },

    /// Negative length other than the null marker
    #[error("invalid length: {0}")]
    InvalidLength(i32),

    /// Presence flag other than 0 or 1
    #[error("invalid presence flag: {0}")]
    InvalidPresence(i32),

    /// Unknown stability tag
    #[error("invalid stability tag: {0}")]
    InvalidStability(i32),

    /// Malformed string body
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16(#[from] std::char::DecodeUtf16Error),

    /// Fixed-size array received with the wrong element count
    #[error("array size mismatch: expected {expected}, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Declared length exceeds the configured limit
    #[error("allocation limit exceeded: requested {requested}, limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    /// Encoded span too large for an int32 length field
    #[error("payload too large: {size} bytes")]
    PayloadTooLarge { size: usize },

    /// Records and unions nested deeper than the configured limit
    #[error("nesting depth limit {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// Int32 word outside the range of the sub-word type it encodes
    #[error("value {value} out of range for {type_name}")]
    ValueOutOfRange { type_name: &'static str, value: i32 },
}

/// Result type for wire operations
pub type Result<T> = std::result::Result<T, WireError>;
