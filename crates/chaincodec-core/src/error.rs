//! Error types for header and transaction decoding.
//!
//! Callers apply different policies per kind: a [`ErrorKind::Parse`] failure
//! is a malformed message, [`ErrorKind::InvalidProofOfWork`] marks a header
//! that must be discarded (and its source possibly banned), and
//! [`ErrorKind::HashMismatch`] flags a corrupted or tampered record.

use thiserror::Error;

use crate::hash::Hash256;

/// Structural decoding failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("truncated input: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{0} trailing bytes after transaction")]
    TrailingData(usize),

    #[error("invalid segwit flag: {0:#04x}")]
    InvalidSegwitFlag(u8),

    #[error("{what} count {count} exceeds input size")]
    CountTooLarge { what: &'static str, count: u64 },
}

/// Errors surfaced by the codec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid proof of work: block {hash} does not meet target of bits {bits:#010x}")]
    InvalidProofOfWork { hash: Hash256, bits: u32 },

    #[error("hash mismatch: record claims {expected}, serialized header hashes to {computed}")]
    HashMismatch { expected: Hash256, computed: Hash256 },
}

/// Discriminant of [`Error`], for routing failures to caller policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    InvalidProofOfWork,
    HashMismatch,
}

impl ErrorKind {
    /// Stable name for the kind, used when errors cross a language boundary.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::InvalidProofOfWork => "InvalidProofOfWork",
            ErrorKind::HashMismatch => "HashMismatch",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::InvalidProofOfWork { .. } => ErrorKind::InvalidProofOfWork,
            Error::HashMismatch { .. } => ErrorKind::HashMismatch,
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Parse(ParseError::InvalidHex(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let parse: Error = ParseError::InvalidLength { expected: 80, got: 79 }.into();
        let pow = Error::InvalidProofOfWork {
            hash: Hash256::ZERO,
            bits: 0x1d00ffff,
        };
        let mismatch = Error::HashMismatch {
            expected: Hash256::ZERO,
            computed: Hash256::ZERO,
        };

        assert_eq!(parse.kind(), ErrorKind::Parse);
        assert_eq!(pow.kind(), ErrorKind::InvalidProofOfWork);
        assert_eq!(mismatch.kind(), ErrorKind::HashMismatch);
        assert_eq!(pow.kind().name(), "InvalidProofOfWork");
    }

    #[test]
    fn test_hex_error_converts_to_parse() {
        let err: Error = hex::decode("zz").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_display_mentions_bits() {
        let err = Error::InvalidProofOfWork {
            hash: Hash256::ZERO,
            bits: 0x1d00ffff,
        };
        assert!(err.to_string().contains("0x1d00ffff"));
    }
}
