//! Header and transaction codec entry points for JS callers.
//!
//! Failures are thrown as JS `Error` objects whose `name` is the error kind
//! (`ParseError`, `InvalidProofOfWork` or `HashMismatch`), so callers can
//! choose between dropping a message and banning its source.

use chaincodec_core::{CodecConfig, CompactPolicy, Error, HeaderCodec, Network};
use wasm_bindgen::prelude::*;

use crate::record::HeaderInfo;

/// Header decoding bound to a network and compact-target policy.
#[wasm_bindgen]
pub struct HeaderValidator {
    codec: HeaderCodec,
}

#[wasm_bindgen]
impl HeaderValidator {
    /// Create a validator.
    ///
    /// # Arguments
    /// * `network` - The network ("mainnet", "testnet" or "regtest")
    /// * `strict` - Apply canonical compact-target and proof-of-work limit checks
    #[wasm_bindgen(constructor)]
    pub fn new(network: &str, strict: bool) -> Result<HeaderValidator, JsValue> {
        let config = CodecConfig::new(parse_network(network)?).with_compact_policy(if strict {
            CompactPolicy::Strict
        } else {
            CompactPolicy::Permissive
        });
        Ok(HeaderValidator {
            codec: HeaderCodec::new(config),
        })
    }

    /// Decode and validate a hex header; identifiers come back as hex.
    #[wasm_bindgen]
    pub fn deserialize(&self, header_hex: &str) -> Result<JsValue, JsValue> {
        let decoded = self.codec.deserialize(header_hex).map_err(to_js_error)?;
        HeaderInfo::from_decoded(&decoded).to_js()
    }

    /// Decode and validate a binary header; identifiers come back as bytes.
    #[wasm_bindgen]
    pub fn deserialize_bytes(&self, header: &[u8]) -> Result<JsValue, JsValue> {
        let decoded = self.codec.deserialize(header).map_err(to_js_error)?;
        HeaderInfo::from_decoded(&decoded).to_js()
    }

    /// Get the network name.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.codec.config().network.name().to_string()
    }

    /// Whether strict compact-target checks are applied.
    #[wasm_bindgen(getter)]
    pub fn strict(&self) -> bool {
        self.codec.config().compact_policy == CompactPolicy::Strict
    }
}

/// Decode and validate a hex header with the default mainnet settings.
#[wasm_bindgen]
pub fn deserialize_header(header_hex: &str) -> Result<JsValue, JsValue> {
    let decoded = chaincodec_core::deserialize_header(header_hex).map_err(to_js_error)?;
    HeaderInfo::from_decoded(&decoded).to_js()
}

/// Decode and validate a binary header with the default mainnet settings.
#[wasm_bindgen]
pub fn deserialize_header_bytes(header: &[u8]) -> Result<JsValue, JsValue> {
    let decoded = chaincodec_core::deserialize_header(header).map_err(to_js_error)?;
    HeaderInfo::from_decoded(&decoded).to_js()
}

/// Encode a header record to hex, checking its `hash` when present.
#[wasm_bindgen]
pub fn serialize_header(record: JsValue) -> Result<String, JsValue> {
    HeaderInfo::from_js(record)?.serialize().map_err(to_js_error)
}

/// Block hash of a hex header (display order hex).
#[wasm_bindgen]
pub fn block_hash(header_hex: &str) -> Result<String, JsValue> {
    let encoded = chaincodec_core::blockheader_to_blockhash(header_hex).map_err(to_js_error)?;
    let bytes = encoded.to_bytes().map_err(|e| to_js_error(e.into()))?;
    Ok(hex::encode(bytes))
}

/// Block hash of a binary header (display order bytes).
#[wasm_bindgen]
pub fn block_hash_bytes(header: &[u8]) -> Result<Vec<u8>, JsValue> {
    let encoded = chaincodec_core::blockheader_to_blockhash(header).map_err(to_js_error)?;
    encoded.to_bytes().map_err(|e| to_js_error(e.into()))
}

/// Strip placeholder witnesses and re-serialize a raw transaction in segwit layout.
#[wasm_bindgen]
pub fn normalize_transaction(raw_tx_hex: &str) -> Result<String, JsValue> {
    chaincodec_core::normalize_transaction(raw_tx_hex).map_err(to_js_error)
}

/// Hash of a network's genesis block.
#[wasm_bindgen]
pub fn genesis_hash(network: &str) -> Result<String, JsValue> {
    let network = parse_network(network)?;
    let codec = HeaderCodec::new(CodecConfig::new(network));
    let decoded = codec
        .deserialize(network.genesis_header_hex())
        .map_err(to_js_error)?;
    Ok(decoded.hash.to_hex())
}

/// Round a height down to a multiple of `divisor`.
#[wasm_bindgen]
pub fn nearest_parent(height: u32, divisor: u32) -> u32 {
    chaincodec_core::nearest_parent(height, divisor)
}

fn parse_network(network: &str) -> Result<Network, JsValue> {
    Network::from_str(network).ok_or_else(|| JsValue::from_str("Invalid network"))
}

/// Convert a codec error into a JS `Error` named after its kind.
pub fn to_js_error(err: Error) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(err.kind().name());
    js_err.into()
}
