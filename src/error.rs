use crate::compress::CompressionError;
use std::fmt;

use serde::{de, ser};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Problems with the envelope header itself. These are never recoverable: the envelope is either
/// corrupted or was written by an incompatible producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The envelope is shorter than the header it must start with.
    HeaderTooShort { actual: usize, expected: usize },
    /// The version byte names a layout this library doesn't know how to read.
    UnsupportedVersion { actual: u8, supported: u8 },
    /// The flags don't mark the payload as a MessagePack document.
    UnsupportedDocumentFormat { flags: u8 },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FormatError::HeaderTooShort { actual, expected } => write!(
                f,
                "header too short: got {} bytes, expected at least {}",
                actual, expected
            ),
            FormatError::UnsupportedVersion { actual, supported } => write!(
                f,
                "unsupported version: {} != {}",
                actual, supported
            ),
            FormatError::UnsupportedDocumentFormat { flags } => {
                write!(f, "unsupported document format: flags 0x{:02x}", flags)
            }
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug)]
pub enum Error {
    /// Occurs when the header is too short, has an unknown version, or is missing a required
    /// flag.
    Format(FormatError),
    /// Occurs when the payload is marked as compressed but fails to decompress, or when the
    /// compression settings are invalid.
    Compression(CompressionError),
    /// Occurs when the document can't be represented by the object-model codec, or when the
    /// payload isn't a single well-formed document.
    Encoding(String),
    /// Occurs when the text form of an envelope isn't valid Base64.
    Transport(base64::DecodeError),
}

impl Error {
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    pub fn is_compression(&self) -> bool {
        matches!(self, Error::Compression(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Format(ref err) => write!(f, "Bad envelope format: {}", err),
            Error::Compression(ref err) => write!(f, "Compression failure: {}", err),
            Error::Encoding(ref msg) => write!(f, "Document encoding failure: {}", msg),
            Error::Transport(ref err) => write!(f, "Bad transport encoding: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Format(ref err) => Some(err),
            Error::Compression(ref err) => Some(err),
            Error::Transport(ref err) => Some(err),
            Error::Encoding(_) => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<CompressionError> for Error {
    fn from(e: CompressionError) -> Self {
        Self::Compression(e)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Self::Transport(e)
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Encoding(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Encoding(msg.to_string())
    }
}
