//! Encoding and decoding of complete envelopes.
//!
//! An [`Envelope`] ties together a document codec and a compressor. The default instance uses
//! MessagePack and gzip, which is the only pairing version 0 defines.

use crate::{
    codec::{DocumentCodec, MsgPack},
    compress::{Compress, Compressor, Gzip},
    error::{FormatError, Result},
    flags::Flags,
    header::Header,
    transport,
};
use serde::{de::DeserializeOwned, Serialize};

/// Encoder and decoder for complete envelopes, generic over the document codec and compressor.
#[derive(Clone, Debug, Default)]
pub struct Envelope<C = MsgPack, Z = Gzip> {
    codec: C,
    compressor: Z,
    compress: bool,
}

impl Envelope {
    /// Create an envelope codec that doesn't compress by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an envelope codec from compression settings. Enabled settings turn compression on
    /// by default, at the configured level.
    pub fn from_settings(settings: &Compress) -> Result<Self> {
        Ok(Self {
            codec: MsgPack,
            compressor: settings.compressor()?,
            compress: settings.is_enabled(),
        })
    }
}

impl<C: DocumentCodec, Z: Compressor> Envelope<C, Z> {
    /// Build an envelope codec from alternative codec implementations.
    pub fn with_parts(codec: C, compressor: Z) -> Self {
        Self {
            codec,
            compressor,
            compress: false,
        }
    }

    /// Set whether [`encode`][Self::encode] compresses.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Whether [`encode`][Self::encode] compresses.
    pub fn compresses(&self) -> bool {
        self.compress
    }

    /// Encode a document, compressing it if this codec is set to do so.
    pub fn encode<T: Serialize + ?Sized>(&self, doc: &T) -> Result<Vec<u8>> {
        self.encode_with(doc, self.compress)
    }

    /// Encode a document into a complete envelope.
    ///
    /// # Errors
    ///
    /// Fails if the document contains a value the codec can't represent, or if the configured
    /// compressor fails.
    pub fn encode_with<T: Serialize + ?Sized>(&self, doc: &T, compress: bool) -> Result<Vec<u8>> {
        let raw = self.codec.encode(doc)?;
        let mut flags = Flags::MSGPACK;
        let payload = if compress {
            flags |= Flags::GZIP;
            self.compressor.compress(&raw)?
        } else {
            raw
        };
        let header = Header::new(flags);

        let mut buf = Vec::with_capacity(header.size() + payload.len());
        header.encode(&mut buf);
        buf.extend_from_slice(&payload);
        tracing::trace!(
            flags = ?flags,
            payload_len = payload.len(),
            envelope_len = buf.len(),
            "encoded envelope"
        );
        Ok(buf)
    }

    /// Decode a complete envelope into a document.
    ///
    /// # Errors
    ///
    /// Fails if the header is too short or has an unknown version, if a compressed payload
    /// doesn't decompress, if the payload isn't marked as MessagePack, or if the payload isn't
    /// exactly one valid document.
    pub fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<T> {
        let (header, payload) = Header::split(buf)?;
        tracing::trace!(
            version = ?header.version,
            flags = ?header.flags,
            payload_len = payload.len(),
            "decoding envelope"
        );

        let decompressed;
        let payload = if header.flags.is_compressed() {
            decompressed = self.compressor.decompress(payload)?;
            &decompressed[..]
        } else {
            payload
        };

        // Checked after decompression, so a payload that happens to decompress still can't be
        // read as the wrong format.
        if !header.flags.has_required() {
            return Err(FormatError::UnsupportedDocumentFormat {
                flags: header.flags.bits(),
            }
            .into());
        }

        self.codec.decode(payload)
    }

    /// Encode a document and wrap the envelope in Base64 text.
    pub fn encode_text<T: Serialize + ?Sized>(&self, doc: &T) -> Result<String> {
        Ok(transport::to_text(&self.encode(doc)?))
    }

    /// Decode an envelope from its Base64 text form.
    pub fn decode_text<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        self.decode(&transport::from_text(text)?)
    }
}
