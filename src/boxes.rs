use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(b: &[u8; 4]) -> Self {
        FourCC(*b)
    }

    /// The tag as text, with non-printable bytes shown as `.`.
    pub fn as_str_lossy(&self) -> String {
        String::from_iter(self.0.map(|b| match b {
            b' '..=b'~' => char::from(b),
            _ => '.',
        }))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str_lossy())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

impl PartialEq<&str> for FourCC {
    fn eq(&self, other: &&str) -> bool {
        other.as_bytes() == &self.0[..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub size: u64,          // total size including header, 0-sized boxes already resolved
    pub typ: FourCC,
    pub header_size: u64,   // 8 or 16 (0 for the synthetic root)
    pub start: u64,         // file offset of header start
    pub is_container: bool,
}

impl BoxHeader {
    /// Synthetic container spanning a whole stream of `len` bytes.
    pub fn root(len: u64) -> Self {
        BoxHeader {
            size: len,
            typ: FourCC::default(),
            header_size: 0,
            start: 0,
            is_container: true,
        }
    }

    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size)
    }

    pub fn payload_offset(&self) -> u64 {
        self.start + self.header_size
    }

    pub fn payload_len(&self) -> u64 {
        self.size.saturating_sub(self.header_size)
    }
}

/// How the walker treats a box of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Payload is a sequence of child boxes.
    Container,
    /// Leaf whose payload is decoded through the registry.
    Payload,
    /// Anything we don't understand; skipped wholesale.
    Opaque,
}
