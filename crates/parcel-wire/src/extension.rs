//! Lazily decoded extension slot
//!
//! An [`ExtensionSlot`] is a record field that holds one value of any
//! structured type, chosen at runtime. On the wire the slot carries:
//!
//! ```text
//! presence: i32             # 0 = unset, 1 = set; nothing follows when unset
//! stability: i32            # slot stability tag
//! payload: byte array       # length-prefixed, padded
//!   descriptor: string      #   type name of the held value
//!   value                   #   the value's own encoding
//! ```
//!
//! Decoding keeps the payload as raw bytes. The held value is only decoded
//! when [`ExtensionSlot::get`] asks for a concrete type, and re-encoding an
//! undecoded slot copies the payload verbatim, so a relay that never looks
//! inside passes it through byte for byte.

use crate::{Descriptor, Parcel, Result, Stability, WireContext, WireDecode, WireEncode, WireError};
use bytes::Bytes;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A structured type that can be stored in an [`ExtensionSlot`]
pub trait Extension: WireEncode + WireDecode + Descriptor + Send + Sync + 'static {}

impl<T> Extension for T where T: WireEncode + WireDecode + Descriptor + Send + Sync + 'static {}

type AnyValue = Arc<dyn Any + Send + Sync>;
type EncodeFn = fn(&(dyn Any + Send + Sync), &mut Parcel) -> Result<()>;

fn encode_erased<T: Extension>(value: &(dyn Any + Send + Sync), parcel: &mut Parcel) -> Result<()> {
    match value.downcast_ref::<T>() {
        Some(value) => value.wire_encode(parcel),
        None => Err(WireError::TypeMismatch {
            expected: T::DESCRIPTOR,
            found: "<type-erased value>".to_string(),
        }),
    }
}

#[derive(Clone)]
enum Contents {
    Empty,
    /// Set locally through [`ExtensionSlot::set`]
    Value {
        descriptor: &'static str,
        value: AnyValue,
        encode: EncodeFn,
    },
    /// Decoded from the wire and not yet interpreted
    Raw { payload: Bytes, ctx: WireContext },
}

/// Record field holding at most one value of a runtime-chosen type
pub struct ExtensionSlot {
    stability: Stability,
    contents: Contents,
    /// First successful typed decode of a raw payload
    decoded: RwLock<Option<AnyValue>>,
}

impl ExtensionSlot {
    /// Unset slot of the given stability
    pub fn new(stability: Stability) -> Self {
        Self {
            stability,
            contents: Contents::Empty,
            decoded: RwLock::new(None),
        }
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn is_set(&self) -> bool {
        !matches!(self.contents, Contents::Empty)
    }

    /// Whether the slot holds a payload received from the wire
    pub fn is_raw(&self) -> bool {
        matches!(self.contents, Contents::Raw { .. })
    }

    /// Store `value`, replacing whatever the slot held.
    ///
    /// Fails with [`WireError::StabilityViolation`] if the slot is stable
    /// and `T` is not; the slot is left unchanged in that case.
    pub fn set<T: Extension>(&mut self, value: T) -> Result<()> {
        self.set_arc(Arc::new(value))
    }

    pub fn set_arc<T: Extension>(&mut self, value: Arc<T>) -> Result<()> {
        if !self.stability.permits(T::STABILITY) {
            debug!(
                "refusing {:?} value {} in {:?} slot",
                T::STABILITY,
                T::DESCRIPTOR,
                self.stability
            );
            return Err(WireError::StabilityViolation {
                descriptor: T::DESCRIPTOR,
                value: T::STABILITY,
                slot: self.stability,
            });
        }
        self.contents = Contents::Value {
            descriptor: T::DESCRIPTOR,
            value,
            encode: encode_erased::<T>,
        };
        *self.decoded.get_mut() = None;
        Ok(())
    }

    /// Typed view of the held value.
    ///
    /// `Ok(None)` if the slot is unset. A raw payload is decoded on the
    /// first call and the result cached, so repeated and concurrent calls
    /// return the same value. Fails with [`WireError::TypeMismatch`] if the
    /// slot holds a different type, or with the decode error if the payload
    /// is malformed; neither outcome changes the slot.
    pub fn get<T: Extension>(&self) -> Result<Option<Arc<T>>> {
        match &self.contents {
            Contents::Empty => Ok(None),
            Contents::Value { descriptor, value, .. } => {
                if *descriptor != T::DESCRIPTOR {
                    return Err(WireError::TypeMismatch {
                        expected: T::DESCRIPTOR,
                        found: descriptor.to_string(),
                    });
                }
                value
                    .clone()
                    .downcast::<T>()
                    .map(Some)
                    .map_err(|_| WireError::TypeMismatch {
                        expected: T::DESCRIPTOR,
                        found: descriptor.to_string(),
                    })
            }
            Contents::Raw { payload, ctx } => {
                if let Some(cached) = self.cached::<T>() {
                    return Ok(Some(cached));
                }
                let value = Arc::new(decode_payload::<T>(payload, *ctx)?);

                let mut decoded = self.decoded.write();
                if let Some(winner) = decoded.as_ref().and_then(|any| any.clone().downcast::<T>().ok()) {
                    return Ok(Some(winner));
                }
                *decoded = Some(value.clone());
                Ok(Some(value))
            }
        }
    }

    fn cached<T: Extension>(&self) -> Option<Arc<T>> {
        self.decoded.read().as_ref().and_then(|any| any.clone().downcast::<T>().ok())
    }

    /// Descriptor of the held value, read from the payload if undecoded
    pub fn descriptor(&self) -> Result<Option<String>> {
        match &self.contents {
            Contents::Empty => Ok(None),
            Contents::Value { descriptor, .. } => Ok(Some(descriptor.to_string())),
            Contents::Raw { payload, ctx } => Parcel::from_bytes_with_context(payload, *ctx).read_string(),
        }
    }

    /// Undecoded payload as received, if the slot came from the wire
    pub fn raw_payload(&self) -> Option<&Bytes> {
        match &self.contents {
            Contents::Raw { payload, .. } => Some(payload),
            _ => None,
        }
    }

    fn raw_context(&self) -> Option<WireContext> {
        match &self.contents {
            Contents::Raw { ctx, .. } => Some(*ctx),
            _ => None,
        }
    }

    /// Unset the slot, keeping its stability
    pub fn clear(&mut self) {
        self.contents = Contents::Empty;
        *self.decoded.get_mut() = None;
    }

    /// Payload bytes: descriptor followed by the value's encoding
    fn payload(&self, ctx: WireContext) -> Result<Option<Bytes>> {
        match &self.contents {
            Contents::Empty => Ok(None),
            Contents::Raw { payload, .. } => Ok(Some(payload.clone())),
            Contents::Value {
                descriptor,
                value,
                encode,
            } => {
                let mut parcel = Parcel::with_context(ctx);
                parcel.write_string(Some(*descriptor))?;
                encode(&**value, &mut parcel)?;
                Ok(Some(parcel.into_bytes()))
            }
        }
    }
}

fn decode_payload<T: Extension>(payload: &Bytes, ctx: WireContext) -> Result<T> {
    let mut parcel = Parcel::from_bytes_with_context(payload, ctx);
    let descriptor = parcel.read_string()?.unwrap_or_default();
    if descriptor != T::DESCRIPTOR {
        debug!("extension holds {}, not {}", descriptor, T::DESCRIPTOR);
        return Err(WireError::TypeMismatch {
            expected: T::DESCRIPTOR,
            found: descriptor,
        });
    }
    trace!("decoding {} byte {} extension", payload.len(), T::DESCRIPTOR);
    parcel.read()
}

impl Default for ExtensionSlot {
    fn default() -> Self {
        Self::new(Stability::Local)
    }
}

impl Clone for ExtensionSlot {
    fn clone(&self) -> Self {
        Self {
            stability: self.stability,
            contents: self.contents.clone(),
            decoded: RwLock::new(self.decoded.read().clone()),
        }
    }
}

/// Slots are equal when they would encode identically in the byte order
/// of whichever side was read from the wire. Raw payloads received in
/// different byte orders never compare equal.
impl PartialEq for ExtensionSlot {
    fn eq(&self, other: &Self) -> bool {
        if self.stability != other.stability {
            return false;
        }
        let ctx = self
            .raw_context()
            .or_else(|| other.raw_context())
            .unwrap_or_default();
        match (self.payload(ctx), other.payload(ctx)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for ExtensionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ExtensionSlot");
        debug.field("stability", &self.stability);
        match &self.contents {
            Contents::Empty => debug.field("contents", &"empty"),
            Contents::Value { descriptor, .. } => debug.field("value", descriptor),
            Contents::Raw { payload, .. } => debug.field("raw_len", &payload.len()),
        };
        debug.finish()
    }
}

impl WireEncode for ExtensionSlot {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        match self.payload(parcel.context())? {
            None => parcel.write_presence(false),
            Some(payload) => {
                parcel.write_presence(true)?;
                parcel.write(&self.stability)?;
                parcel.write_bytes(Some(&payload))
            }
        }
    }
}

impl WireDecode for ExtensionSlot {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        let mut slot = Self::default();
        slot.wire_decode_into(parcel)?;
        Ok(slot)
    }

    /// An unset slot on the wire keeps the declared stability; a set one
    /// takes the stability it was written with.
    fn wire_decode_into(&mut self, parcel: &mut Parcel) -> Result<()> {
        if !parcel.read_presence()? {
            self.clear();
            return Ok(());
        }
        let stability = parcel.read::<Stability>()?;
        let payload = parcel
            .read_bytes()?
            .ok_or(WireError::InvalidLength(crate::parcel::NULL_LENGTH))?;
        trace!("holding {} byte extension payload undecoded", payload.len());

        self.stability = stability;
        self.contents = Contents::Raw {
            payload,
            ctx: parcel.context(),
        };
        *self.decoded.get_mut() = None;
        Ok(())
    }
}
