//! JS-facing header records.

use chaincodec_core::{
    serialize_header, BlockHeader, DecodedHeader, Encoded, Error, Hash256, ParseError,
};
use core::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use wasm_bindgen::prelude::*;

/// A 32-byte identifier as JS sees it: a hex string or raw bytes.
///
/// Bytes go out through `serialize_bytes`, which reaches JS as a
/// `Uint8Array`. Both `Uint8Array` and plain number arrays are accepted back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Hex(String),
    Bytes(Vec<u8>),
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Identifier::Hex(hex) => s.serialize_str(hex),
            Identifier::Bytes(bytes) => s.serialize_bytes(bytes),
        }
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct IdentifierVisitor;

        impl<'de> Visitor<'de> for IdentifierVisitor {
            type Value = Identifier;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hex string or a byte array")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Identifier::Hex(v.to_string()))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(Identifier::Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Identifier::Bytes(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(32));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(Identifier::Bytes(bytes))
            }
        }

        d.deserialize_any(IdentifierVisitor)
    }
}

impl Identifier {
    /// Parse into a display-order hash.
    pub fn to_hash(&self) -> Result<Hash256, ParseError> {
        match self {
            Identifier::Hex(s) => s.parse(),
            Identifier::Bytes(bytes) => Hash256::from_display_slice(bytes),
        }
    }
}

impl From<Encoded> for Identifier {
    fn from(encoded: Encoded) -> Self {
        match encoded {
            Encoded::Binary(bytes) => Identifier::Bytes(bytes),
            Encoded::Hex(s) => Identifier::Hex(s),
        }
    }
}

/// Decoded block header, identifiers presented in the input's encoding.
///
/// `version` is the unsigned reading of the four version bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub version: u32,
    pub prev_block_hash: Identifier,
    pub merkle_root: Identifier,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    /// Block hash; checked against the fields when re-serializing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Identifier>,
}

impl HeaderInfo {
    pub fn from_decoded(decoded: &DecodedHeader) -> Self {
        HeaderInfo {
            version: decoded.header.version as u32,
            prev_block_hash: decoded.prev_block_hash().into(),
            merkle_root: decoded.merkle_root().into(),
            timestamp: decoded.header.timestamp,
            bits: decoded.header.bits,
            nonce: decoded.header.nonce,
            hash: Some(decoded.hash().into()),
        }
    }

    pub fn to_header(&self) -> Result<BlockHeader, ParseError> {
        Ok(BlockHeader {
            version: self.version as i32,
            prev_block_hash: self.prev_block_hash.to_hash()?,
            merkle_root: self.merkle_root.to_hash()?,
            timestamp: self.timestamp,
            bits: self.bits,
            nonce: self.nonce,
        })
    }

    /// Encode to hex, failing if a carried hash does not match.
    pub fn serialize(&self) -> Result<String, Error> {
        let header = self.to_header()?;
        let expected = self.hash.as_ref().map(Identifier::to_hash).transpose()?;
        serialize_header(&header, expected.as_ref())
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }

    /// Read from a JS object.
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid header record: {:?}", e)))
    }
}
