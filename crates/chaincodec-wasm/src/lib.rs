//! WebAssembly bindings for the light node codec.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Decoding and validating block headers from hex or bytes
//! - Re-encoding header records with hash self-checks
//! - Normalizing raw transactions before caching or relay

use wasm_bindgen::prelude::*;

pub mod codec;
pub mod logger;
pub mod record;

// Re-export main types for JS access
pub use codec::HeaderValidator;
pub use record::{HeaderInfo, Identifier};

/// Initialize the WASM module with better panic messages and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(log::LevelFilter::Info);
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
