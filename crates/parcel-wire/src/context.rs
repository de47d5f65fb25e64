//! Wire encoding/decoding context
//!
//! The context carries the transport's byte order and the allocation limits
//! applied while decoding, and provides helpers for padding and primitive
//! encoding/decoding.

use crate::error::{DEFAULT_MAX_ALLOCATION, DEFAULT_MAX_ARRAY_ELEMENTS, DEFAULT_MAX_DEPTH};
use bytes::{Buf, BufMut};

/// Every item on the wire occupies a multiple of this many bytes.
pub const WIRE_ALIGNMENT: usize = 4;

/// Wire encoding/decoding context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireContext {
    /// Whether to use little-endian byte order
    pub little_endian: bool,
    /// Largest string or byte array a decoder will allocate, in bytes
    pub max_allocation: usize,
    /// Largest element count a decoder will accept for an array
    pub max_array_elements: usize,
    /// Deepest nesting of records and unions a decoder will follow
    pub max_depth: usize,
}

impl WireContext {
    /// Little-endian context with default limits
    pub fn new() -> Self {
        Self {
            little_endian: true,
            max_allocation: DEFAULT_MAX_ALLOCATION,
            max_array_elements: DEFAULT_MAX_ARRAY_ELEMENTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Big-endian context with default limits
    pub fn big_endian() -> Self {
        Self {
            little_endian: false,
            ..Self::new()
        }
    }

    pub fn with_max_allocation(mut self, max_allocation: usize) -> Self {
        self.max_allocation = max_allocation;
        self
    }

    pub fn with_max_array_elements(mut self, max_array_elements: usize) -> Self {
        self.max_array_elements = max_array_elements;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Padding needed to round `len` up to the wire alignment
    #[inline]
    pub fn pad_len(len: usize) -> usize {
        let remainder = len % WIRE_ALIGNMENT;
        if remainder == 0 {
            0
        } else {
            WIRE_ALIGNMENT - remainder
        }
    }

    // Primitive encoding methods

    #[inline]
    pub fn put_u16<B: BufMut>(&self, buf: &mut B, value: u16) {
        if self.little_endian {
            buf.put_u16_le(value);
        } else {
            buf.put_u16(value);
        }
    }

    #[inline]
    pub fn put_i32<B: BufMut>(&self, buf: &mut B, value: i32) {
        if self.little_endian {
            buf.put_i32_le(value);
        } else {
            buf.put_i32(value);
        }
    }

    #[inline]
    pub fn put_i64<B: BufMut>(&self, buf: &mut B, value: i64) {
        if self.little_endian {
            buf.put_i64_le(value);
        } else {
            buf.put_i64(value);
        }
    }

    #[inline]
    pub fn put_f32<B: BufMut>(&self, buf: &mut B, value: f32) {
        if self.little_endian {
            buf.put_f32_le(value);
        } else {
            buf.put_f32(value);
        }
    }

    #[inline]
    pub fn put_f64<B: BufMut>(&self, buf: &mut B, value: f64) {
        if self.little_endian {
            buf.put_f64_le(value);
        } else {
            buf.put_f64(value);
        }
    }

    // Primitive decoding methods. Callers check `remaining()` first.

    #[inline]
    pub fn get_u16<B: Buf>(&self, buf: &mut B) -> u16 {
        if self.little_endian {
            buf.get_u16_le()
        } else {
            buf.get_u16()
        }
    }

    #[inline]
    pub fn get_i32<B: Buf>(&self, buf: &mut B) -> i32 {
        if self.little_endian {
            buf.get_i32_le()
        } else {
            buf.get_i32()
        }
    }

    #[inline]
    pub fn get_i64<B: Buf>(&self, buf: &mut B) -> i64 {
        if self.little_endian {
            buf.get_i64_le()
        } else {
            buf.get_i64()
        }
    }

    #[inline]
    pub fn get_f32<B: Buf>(&self, buf: &mut B) -> f32 {
        if self.little_endian {
            buf.get_f32_le()
        } else {
            buf.get_f32()
        }
    }

    #[inline]
    pub fn get_f64<B: Buf>(&self, buf: &mut B) -> f64 {
        if self.little_endian {
            buf.get_f64_le()
        } else {
            buf.get_f64()
        }
    }
}

impl Default for WireContext {
    fn default() -> Self {
        Self::new()
    }
}
