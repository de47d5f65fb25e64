//! Type metadata carried alongside structured values

use crate::{Parcel, Result, WireDecode, WireEncode, WireError};

/// How durable a type's binary contract must be.
///
/// `Local` types may only be exchanged between components compiled from
/// the same schema build. Encoding with one build and decoding with
/// another is undefined and is NOT detected at runtime; keeping such
/// payloads inside one build is the caller's responsibility.
///
/// `Vintf` and `Network` types promise a frozen layout that independently
/// updated binaries can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stability {
    #[default]
    Local,
    Vintf,
    Network,
}

impl Stability {
    /// Whether values of this stability may cross independently-built binaries
    pub fn is_stable(self) -> bool {
        !matches!(self, Stability::Local)
    }

    /// Whether a container of this stability may hold a value of `value`'s.
    ///
    /// A stable container must only hold stable values; a local container
    /// holds anything.
    pub fn permits(self, value: Stability) -> bool {
        !self.is_stable() || value.is_stable()
    }
}

impl From<Stability> for i32 {
    fn from(stability: Stability) -> Self {
        match stability {
            Stability::Local => 0,
            Stability::Vintf => 1,
            Stability::Network => 2,
        }
    }
}

impl TryFrom<i32> for Stability {
    type Error = WireError;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Stability::Local),
            1 => Ok(Stability::Vintf),
            2 => Ok(Stability::Network),
            other => Err(WireError::InvalidStability(other)),
        }
    }
}

impl WireEncode for Stability {
    fn wire_encode(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_i32((*self).into())
    }
}

impl WireDecode for Stability {
    fn wire_decode(parcel: &mut Parcel) -> Result<Self> {
        Stability::try_from(parcel.read_i32()?)
    }
}

/// Schema identity of a structured type.
///
/// Records and unions declared with [`wire_record!`](crate::wire_record)
/// and [`wire_union!`](crate::wire_union) implement this automatically.
pub trait Descriptor {
    /// Fully qualified type name, written ahead of extension payloads
    const DESCRIPTOR: &'static str;

    /// Stability the type's layout promises
    const STABILITY: Stability = Stability::Local;
}
