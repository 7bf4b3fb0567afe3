//! Browser-side tests of the JS entry points.

#![cfg(target_arch = "wasm32")]

use chaincodec_wasm::codec::{
    block_hash, deserialize_header, deserialize_header_bytes, genesis_hash, normalize_transaction,
    serialize_header, HeaderValidator,
};
use chaincodec_wasm::{HeaderInfo, Identifier};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

const GENESIS_HEADER: &str = concat!(
    "01000000",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
    "29ab5f49",
    "ffff001d",
    "1dac2b7c",
);
const GENESIS_HASH: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";

fn error_name(err: wasm_bindgen::JsValue) -> String {
    err.dyn_into::<js_sys::Error>().unwrap().name().into()
}

#[wasm_bindgen_test]
fn header_round_trips_through_js() {
    let record = deserialize_header(GENESIS_HEADER).unwrap();
    let info = HeaderInfo::from_js(record.clone()).unwrap();
    assert_eq!(info.nonce, 2083236893);
    assert_eq!(serialize_header(record).unwrap(), GENESIS_HEADER);
}

#[wasm_bindgen_test]
fn binary_identifiers_are_uint8_arrays() {
    let raw = hex::decode(GENESIS_HEADER).unwrap();
    let record = deserialize_header_bytes(&raw).unwrap();

    let hash = js_sys::Reflect::get(&record, &"hash".into()).unwrap();
    assert!(hash.is_instance_of::<js_sys::Uint8Array>());

    let info = HeaderInfo::from_js(record.clone()).unwrap();
    assert!(matches!(info.merkle_root, Identifier::Bytes(ref bytes) if bytes.len() == 32));
    assert_eq!(serialize_header(record).unwrap(), GENESIS_HEADER);
}

#[wasm_bindgen_test]
fn block_hash_matches_genesis() {
    assert_eq!(block_hash(GENESIS_HEADER).unwrap(), GENESIS_HASH);
    assert_eq!(genesis_hash("mainnet").unwrap(), GENESIS_HASH);
}

#[wasm_bindgen_test]
fn errors_are_named_by_kind() {
    assert_eq!(error_name(deserialize_header("00").unwrap_err()), "ParseError");

    let mut bad_nonce = GENESIS_HEADER.to_string();
    bad_nonce.replace_range(152..154, "00");
    assert_eq!(error_name(deserialize_header(&bad_nonce).unwrap_err()), "InvalidProofOfWork");

    assert_eq!(error_name(normalize_transaction("01").unwrap_err()), "ParseError");
}

#[wasm_bindgen_test]
fn validator_reports_settings() {
    let validator = HeaderValidator::new("regtest", true).unwrap();
    assert_eq!(validator.network(), "regtest");
    assert!(validator.strict());
    assert!(HeaderValidator::new("nonsense", false).is_err());
}
