//! docpack wraps a single JSON-compatible document in a small, versioned binary envelope.
//!
//! An envelope is a 2-byte header followed by the payload:
//!
//! ```text
//! byte 0:      version (0x00)
//! byte 1:      flags
//!                0x01: payload is MessagePack (must be set)
//!                0x10: payload is gzip-compressed
//! bytes 2..N:  payload
//! ```
//!
//! The header is checked before anything else is done with the payload. Unknown versions are
//! always rejected, as flag meanings are specific to a version. Within version 0, reserved flag
//! bits are ignored, but an envelope without the MessagePack bit is never decoded.
//!
//! Documents are anything that implements `Serialize`/`Deserialize`. [`Value`] is the dynamic
//! document type, though `serde_json::Value` or any JSON-shaped struct works just as well.
//!
//! ```
//! # use docpack::*;
//! let doc = Value::Map(vec![(Value::from("a"), Value::from(1))]);
//! let bytes = pack_bytes(&doc, false).unwrap();
//! assert_eq!(bytes, &[0x00, 0x01, 0x81, 0xa1, b'a', 0x01]);
//! let back: Value = unpack_bytes(&bytes).unwrap();
//! assert_eq!(back, doc);
//!
//! let text = pack(&doc, true).unwrap();
//! let back: Value = unpack(&text).unwrap();
//! assert_eq!(back, doc);
//! ```
//!
//! Every operation is a pure function of its input, so all of this is safe to use from any
//! number of threads at once.

mod codec;
mod compress;
mod envelope;
mod error;
mod flags;
mod header;
mod transport;

use serde::{de::DeserializeOwned, Serialize};

pub use codec::{DocumentCodec, MsgPack};
pub use compress::{
    Compress, CompressionError, Compressor, Gzip, ALGORITHM_GZIP, DEFAULT_GZIP_LEVEL,
    DEFAULT_MAX_SIZE,
};
pub use envelope::Envelope;
pub use error::{Error, FormatError, Result};
pub use flags::Flags;
pub use header::{read_header, Header, Version, MIN_HEADER_LEN};
pub use rmpv::Value;
pub use transport::{from_text, to_text};

/// Serialize a document into a Base64-encoded envelope. Set `compress` to gzip the payload.
pub fn pack<T: Serialize + ?Sized>(doc: &T, compress: bool) -> Result<String> {
    Ok(to_text(&pack_bytes(doc, compress)?))
}

/// Deserialize a document previously serialized with [`pack`].
pub fn unpack<T: DeserializeOwned>(text: &str) -> Result<T> {
    unpack_bytes(&from_text(text)?)
}

/// Serialize a document into an envelope. Set `compress` to gzip the payload.
pub fn pack_bytes<T: Serialize + ?Sized>(doc: &T, compress: bool) -> Result<Vec<u8>> {
    Envelope::new().encode_with(doc, compress)
}

/// Deserialize a document previously serialized with [`pack_bytes`].
pub fn unpack_bytes<T: DeserializeOwned>(buf: &[u8]) -> Result<T> {
    Envelope::new().decode(buf)
}
