//! Envelope headers.
//!
//! Header format, version 0:
//!  1. Version byte (0x00)
//!  2. Flags byte (see [`Flags`])
//!
//! Everything after the header is payload. A later version may use a completely different
//! header layout, so the version byte is always read first and selects how the rest is parsed.

use crate::error::FormatError;
use crate::flags::Flags;

/// The shortest header any supported version uses. Anything shorter is rejected before the
/// version byte is even looked at.
pub const MIN_HEADER_LEN: usize = 2;

/// Supported header layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// Version byte, flags byte, payload.
    #[default]
    V0,
}

impl Version {
    /// The newest version, used for all newly encoded envelopes.
    pub const CURRENT: Version = Version::V0;

    /// Length of the full header for this version, including the version byte.
    pub fn header_len(self) -> usize {
        match self {
            Version::V0 => 2,
        }
    }
}

impl From<Version> for u8 {
    fn from(val: Version) -> u8 {
        match val {
            Version::V0 => 0,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = u8;
    fn try_from(val: u8) -> Result<Version, u8> {
        match val {
            0 => Ok(Version::V0),
            _ => Err(val),
        }
    }
}

/// A parsed envelope header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    pub flags: Flags,
}

impl Header {
    /// A header for a newly encoded envelope, using the current version.
    pub fn new(flags: Flags) -> Self {
        Self {
            version: Version::CURRENT,
            flags,
        }
    }

    /// Length of this header in bytes.
    pub fn size(&self) -> usize {
        self.version.header_len()
    }

    /// Append the header bytes to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self.version {
            Version::V0 => {
                buf.push(self.version.into());
                buf.push(self.flags.bits());
            }
        }
    }

    /// Split an envelope into its header and payload. Only the length and version are checked
    /// here; flag validation is left to the caller, as it depends on what the payload turns out
    /// to be.
    pub fn split(buf: &[u8]) -> Result<(Header, &[u8]), FormatError> {
        if buf.len() < MIN_HEADER_LEN {
            return Err(FormatError::HeaderTooShort {
                actual: buf.len(),
                expected: MIN_HEADER_LEN,
            });
        }
        let version = Version::try_from(buf[0]).map_err(|actual| {
            FormatError::UnsupportedVersion {
                actual,
                supported: Version::CURRENT.into(),
            }
        })?;
        let header_len = version.header_len();
        if buf.len() < header_len {
            return Err(FormatError::HeaderTooShort {
                actual: buf.len(),
                expected: header_len,
            });
        }
        let (header, payload) = buf.split_at(header_len);
        let header = match version {
            Version::V0 => Header {
                version,
                flags: Flags::from_bits(header[1]),
            },
        };
        Ok((header, payload))
    }
}

/// Read the header of an envelope without touching its payload.
pub fn read_header(buf: &[u8]) -> Result<Header, FormatError> {
    Header::split(buf).map(|(header, _)| header)
}
