//! Position-tracked byte cursor
//!
//! A [`Parcel`] owns one contiguous buffer and a single position used for
//! both reading and writing. Writes at the end of the buffer append; writes
//! after `set_position` into the middle overwrite and extend as needed.
//!
//! Reads are bounded by the buffer end and, while a record body is being
//! decoded, by the record's declared end. No read ever advances the
//! position past either boundary.
//!
//! Wire format of the variable-length primitives:
//!
//! ```text
//! string:     len: i32 (-1 = null) | utf16 units[len] | 0u16 | pad to 4
//! byte array: len: i32 (-1 = null) | bytes[len] | pad to 4
//! record:     total_size: i32 (counts itself) | fields...
//! ```

use crate::context::{WireContext, WIRE_ALIGNMENT};
use crate::error::MAX_OFFSET;
use crate::{Result, WireDecode, WireEncode, WireError};
use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

/// Size of a record's total-size header, which counts itself
pub const SIZE_HEADER_LEN: usize = 4;

/// Length marker for an absent string or array
pub const NULL_LENGTH: i32 = -1;

/// Owned byte buffer with a read/write position
#[derive(Debug, Clone, Default)]
pub struct Parcel {
    data: BytesMut,
    pos: usize,
    /// Read boundary narrowed while inside a record body
    limit: Option<usize>,
    /// Records and unions currently being decoded
    depth: usize,
    ctx: WireContext,
}

impl Parcel {
    /// Empty parcel with the default context
    pub fn new() -> Self {
        Self::with_context(WireContext::new())
    }

    pub fn with_context(ctx: WireContext) -> Self {
        Self {
            data: BytesMut::new(),
            pos: 0,
            limit: None,
            depth: 0,
            ctx,
        }
    }

    /// Parcel over a copy of `data`, positioned at 0
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        Self::from_bytes_with_context(data, WireContext::new())
    }

    pub fn from_bytes_with_context(data: impl AsRef<[u8]>, ctx: WireContext) -> Self {
        Self {
            data: BytesMut::from(data.as_ref()),
            pos: 0,
            limit: None,
            depth: 0,
            ctx,
        }
    }

    pub fn context(&self) -> WireContext {
        self.ctx
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor. Fails if `position` is outside `[0, len]`.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(WireError::InvalidPosition {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    /// Bytes readable before the buffer end or the current record boundary
    pub fn remaining(&self) -> usize {
        self.read_end().saturating_sub(self.pos)
    }

    /// Whether any readable bytes are left inside the current boundary
    pub fn has_more_data(&self) -> bool {
        self.pos < self.read_end()
    }

    fn read_end(&self) -> usize {
        match self.limit {
            Some(limit) => limit.min(self.data.len()),
            None => self.data.len(),
        }
    }

    /// Reserve `len` bytes at the position for writing and advance past them
    fn claim(&mut self, len: usize) -> Result<&mut [u8]> {
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= MAX_OFFSET)
            .ok_or(WireError::PayloadTooLarge { size: len })?;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.pos = end;
        Ok(&mut self.data[start..end])
    }

    /// Consume `len` readable bytes
    fn take(&mut self, len: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(WireError::Truncated {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..start + len])
    }

    /// Write bytes verbatim, without length or padding
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.claim(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    // Fixed-width primitives

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let ctx = self.ctx;
        let mut dst = self.claim(4)?;
        ctx.put_i32(&mut dst, value);
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let ctx = self.ctx;
        let mut dst = self.claim(8)?;
        ctx.put_i64(&mut dst, value);
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let ctx = self.ctx;
        let mut dst = self.claim(4)?;
        ctx.put_f32(&mut dst, value);
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let ctx = self.ctx;
        let mut dst = self.claim(8)?;
        ctx.put_f64(&mut dst, value);
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let ctx = self.ctx;
        let mut src = self.take(4)?;
        Ok(ctx.get_i32(&mut src))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let ctx = self.ctx;
        let mut src = self.take(8)?;
        Ok(ctx.get_i64(&mut src))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let ctx = self.ctx;
        let mut src = self.take(4)?;
        Ok(ctx.get_f32(&mut src))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let ctx = self.ctx;
        let mut src = self.take(8)?;
        Ok(ctx.get_f64(&mut src))
    }

    // Lengths and presence flags

    /// Write a length field, `None` being the null marker
    pub fn write_length(&mut self, len: Option<usize>) -> Result<()> {
        match len {
            None => self.write_i32(NULL_LENGTH),
            Some(len) => {
                let len = i32::try_from(len).map_err(|_| WireError::PayloadTooLarge { size: len })?;
                self.write_i32(len)
            }
        }
    }

    /// Read a length field; `None` for the null marker
    pub fn read_length(&mut self) -> Result<Option<usize>> {
        match self.read_i32()? {
            NULL_LENGTH => Ok(None),
            len if len < 0 => Err(WireError::InvalidLength(len)),
            len => Ok(Some(len as usize)),
        }
    }

    pub fn write_presence(&mut self, present: bool) -> Result<()> {
        self.write_i32(i32::from(present))
    }

    pub fn read_presence(&mut self) -> Result<bool> {
        match self.read_i32()? {
            0 => Ok(false),
            1 => Ok(true),
            flag => Err(WireError::InvalidPresence(flag)),
        }
    }

    /// Validate an array element count before anything is allocated.
    ///
    /// Every encoded element occupies at least one aligned word, so a count
    /// that cannot fit in the readable bytes is truncated input.
    pub fn check_array_count(&self, count: usize) -> Result<()> {
        if count > self.ctx.max_array_elements {
            return Err(WireError::AllocationLimitExceeded {
                requested: count,
                limit: self.ctx.max_array_elements,
            });
        }
        let needed = count.saturating_mul(WIRE_ALIGNMENT);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(WireError::Truncated { needed, remaining });
        }
        Ok(())
    }

    fn check_allocation(&self, requested: usize) -> Result<()> {
        if requested > self.ctx.max_allocation {
            return Err(WireError::AllocationLimitExceeded {
                requested,
                limit: self.ctx.max_allocation,
            });
        }
        Ok(())
    }

    // Strings and byte arrays

    /// Write a UTF-16 string; `None` is written as the null marker
    pub fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            return self.write_length(None);
        };
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_length(Some(units.len()))?;

        // units plus terminator, padded
        let byte_len = (units.len() + 1) * 2;
        let ctx = self.ctx;
        let mut dst = self.claim(byte_len + WireContext::pad_len(byte_len))?;
        for unit in units.iter().copied().chain(std::iter::once(0)) {
            ctx.put_u16(&mut dst, unit);
        }
        dst.fill(0);
        Ok(())
    }

    /// Read a UTF-16 string; `None` if the null marker was written
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let Some(len) = self.read_length()? else {
            return Ok(None);
        };
        let byte_len = len
            .checked_add(1)
            .and_then(|units| units.checked_mul(2))
            .ok_or(WireError::InvalidLength(len as i32))?;
        self.check_allocation(byte_len)?;

        let ctx = self.ctx;
        let mut src = self.take(byte_len + WireContext::pad_len(byte_len))?;
        let mut units = Vec::with_capacity(len);
        for _ in 0..len {
            units.push(ctx.get_u16(&mut src));
        }
        if ctx.get_u16(&mut src) != 0 {
            return Err(WireError::InvalidString("missing terminator".to_string()));
        }

        let value = char::decode_utf16(units).collect::<std::result::Result<String, _>>()?;
        Ok(Some(value))
    }

    /// Write a packed byte array; `None` is written as the null marker
    pub fn write_bytes(&mut self, value: Option<&[u8]>) -> Result<()> {
        let Some(value) = value else {
            return self.write_length(None);
        };
        self.write_length(Some(value.len()))?;
        let dst = self.claim(value.len() + WireContext::pad_len(value.len()))?;
        let (body, padding) = dst.split_at_mut(value.len());
        body.copy_from_slice(value);
        padding.fill(0);
        Ok(())
    }

    /// Read a packed byte array; `None` if the null marker was written
    pub fn read_bytes(&mut self) -> Result<Option<Bytes>> {
        let Some(len) = self.read_length()? else {
            return Ok(None);
        };
        self.check_allocation(len)?;
        let src = self.take(len + WireContext::pad_len(len))?;
        Ok(Some(Bytes::copy_from_slice(&src[..len])))
    }

    // Typed values

    pub fn write<T: WireEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.wire_encode(self)
    }

    pub fn read<T: WireDecode>(&mut self) -> Result<T> {
        T::wire_decode(self)
    }

    // Nesting

    /// Run `body` one nesting level deeper.
    ///
    /// Fails with [`WireError::DepthLimitExceeded`] before running `body`
    /// if the context's `max_depth` is already reached.
    pub fn nested<F, R>(&mut self, body: F) -> Result<R>
    where
        F: FnOnce(&mut Parcel) -> Result<R>,
    {
        if self.depth >= self.ctx.max_depth {
            debug!("rejecting value at {}: nesting exceeds {}", self.pos, self.ctx.max_depth);
            return Err(WireError::DepthLimitExceeded {
                limit: self.ctx.max_depth,
            });
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Records and unions currently open on the decode path
    pub fn depth(&self) -> usize {
        self.depth
    }

    // Size-prefixed spans

    /// Write a size-prefixed span.
    ///
    /// The body is encoded into a scratch parcel first, then emitted after
    /// an int32 holding the body length plus the header itself.
    pub fn sized_write<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Parcel) -> Result<()>,
    {
        let mut scratch = Parcel::with_context(self.ctx);
        body(&mut scratch)?;

        let body_len = scratch.len();
        let total = body_len
            .checked_add(SIZE_HEADER_LEN)
            .filter(|total| *total <= MAX_OFFSET)
            .ok_or(WireError::PayloadTooLarge { size: body_len })?;
        self.write_i32(total as i32)?;
        self.write_raw(&scratch.data)
    }

    /// Read a size-prefixed span.
    ///
    /// While `body` runs, reads are bounded by the span's declared end, so
    /// `has_more_data` turns false once every field the writer emitted has
    /// been consumed. Afterwards the position is set to the declared end,
    /// discarding whatever trailing fields this reader does not know.
    /// The span counts as one nesting level.
    pub fn sized_read<F, R>(&mut self, body: F) -> Result<R>
    where
        F: FnOnce(&mut Parcel) -> Result<R>,
    {
        let start = self.pos;
        let raw_size = self.read_i32()?;
        if raw_size < SIZE_HEADER_LEN as i32 {
            debug!("rejecting record at {}: bad size {}", start, raw_size);
            return Err(WireError::BadSize { size: raw_size });
        }
        let size = raw_size as usize;
        if start > MAX_OFFSET - size {
            debug!("rejecting record at {}: size {} overflows offset range", start, size);
            return Err(WireError::SizeOverflow { start, size });
        }
        let end = start + size;
        let read_end = self.read_end();
        if end > read_end {
            return Err(WireError::Truncated {
                needed: size,
                remaining: read_end - start,
            });
        }

        let outer = self.limit.replace(end);
        let result = self.nested(body);
        self.limit = outer;
        let value = result?;

        if self.pos < end {
            trace!("skipping {} unknown trailing bytes of record at {}", end - self.pos, start);
        }
        self.pos = end;
        Ok(value)
    }
}

/// Encode a value into a fresh buffer with the default context
pub fn to_bytes<T: WireEncode + ?Sized>(value: &T) -> Result<Bytes> {
    to_bytes_with_context(value, WireContext::new())
}

pub fn to_bytes_with_context<T: WireEncode + ?Sized>(value: &T, ctx: WireContext) -> Result<Bytes> {
    let mut parcel = Parcel::with_context(ctx);
    parcel.write(value)?;
    Ok(parcel.into_bytes())
}

/// Decode a value from the start of `data` with the default context
pub fn from_bytes<T: WireDecode>(data: &[u8]) -> Result<T> {
    from_bytes_with_context(data, WireContext::new())
}

pub fn from_bytes_with_context<T: WireDecode>(data: &[u8], ctx: WireContext) -> Result<T> {
    Parcel::from_bytes_with_context(data, ctx).read()
}
