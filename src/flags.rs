//! The flags byte of a version 0 header.
//!
//! Each bit toggles one payload transform independently of the others. Bits without a meaning
//! are reserved: readers leave them alone, and the only validation performed is that every bit
//! in [`Flags::REQUIRED`] is set. New optional flags can therefore be introduced without touching
//! the validation logic.

use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// The flags byte of an envelope header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// Payload is a MessagePack document.
    pub const MSGPACK: Flags = Flags(0x01 << 0);
    /// Payload is gzip-compressed, and must be decompressed before decoding.
    pub const GZIP: Flags = Flags(0x01 << 4);
    /// Bits that must be set for a version 0 envelope to be readable.
    pub const REQUIRED: Flags = Flags::MSGPACK;

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Flags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit set in `other` is also set here.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn has_required(self) -> bool {
        self.contains(Flags::REQUIRED)
    }

    pub const fn is_compressed(self) -> bool {
        self.contains(Flags::GZIP)
    }
}

impl BitOr for Flags {
    type Output = Flags;
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Flags(bits)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> u8 {
        flags.0
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Flags(0x{:02x})", self.0)
    }
}
