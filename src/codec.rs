//! Object-model codecs: turning a serde document into bytes and back.

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};

/// A document-to-bytes transform. Decoding must consume the whole buffer; a codec never returns
/// a partial or default document on malformed input.
pub trait DocumentCodec {
    fn encode<T: Serialize + ?Sized>(&self, doc: &T) -> Result<Vec<u8>>;
    fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<T>;
}

/// MessagePack, with structs written as maps so that documents keep their JSON shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MsgPack;

impl DocumentCodec for MsgPack {
    fn encode<T: Serialize + ?Sized>(&self, doc: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut serializer = rmp_serde::Serializer::new(&mut out).with_struct_map();
        doc.serialize(&mut serializer)?;
        Ok(out)
    }

    fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<T> {
        let mut rest = buf;
        let doc = {
            let mut deserializer = rmp_serde::Deserializer::new(&mut rest);
            T::deserialize(&mut deserializer)?
        };
        if !rest.is_empty() {
            return Err(Error::Encoding(format!(
                "{} bytes of extra data after document",
                rest.len()
            )));
        }
        Ok(doc)
    }
}
