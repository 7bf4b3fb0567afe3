//! Header and transaction codec for a light (non-fully-validating) node.
//!
//! This crate provides pure Rust implementations of:
//! - Block header decoding and encoding with the chain's byte-order conventions
//! - Proof-of-work verification against the header's own compact target
//! - Double SHA256 identifiers for headers and transactions
//! - Witness normalization of raw transactions before caching or relay
//!
//! Every operation is synchronous and stateless. Diagnostics go through the
//! `log` facade; install a logger in the calling application to see them.

pub mod codec;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod hash;
pub mod header;
pub mod network;
pub mod normalize;
pub mod pow;
pub mod transaction;

pub use codec::{Encoded, Encoding, RawInput};
pub use config::CodecConfig;
pub use difficulty::{bits_to_target, target_to_bits, CompactPolicy, CompactTarget, Target};
pub use error::{Error, ErrorKind, ParseError, Result};
pub use hash::{double_sha256, Hash256};
pub use header::{
    blockheader_to_blockhash, deserialize_header, serialize_header, BlockHeader, DecodedHeader,
    HeaderCodec,
};
pub use network::{nearest_parent, Network};
pub use normalize::{normalize, normalize_transaction};
pub use pow::{verify_pow, verify_pow_with};
pub use transaction::{OutPoint, Transaction, TxIn, TxOut, Witness};
