//! Bitcoin block header codec.
//!
//! Layout of the 80-byte header, every field little-endian on the wire:
//!
//! | bytes   | field           |
//! |---------|-----------------|
//! | 0..4    | version         |
//! | 4..36   | prev_block_hash |
//! | 36..68  | merkle_root     |
//! | 68..72  | timestamp       |
//! | 72..76  | bits            |
//! | 76..80  | nonce           |
//!
//! Decoding a header also verifies its proof of work: a header whose hash
//! does not meet its own target is not a header. Encoding only checks that a
//! claimed hash matches the bytes produced.

use log::debug;

use crate::codec::{Encoded, Encoding, RawInput, Reader};
use crate::config::CodecConfig;
use crate::difficulty::{bits_to_target, Target};
use crate::error::{Error, ParseError, Result};
use crate::hash::{double_sha256, Hash256};
use crate::network::BLOCK_HEADER_SIZE;
use crate::pow::verify_pow_with;

/// A Bitcoin block header (80 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version with BIP9 versionbits.
    pub version: i32,
    /// Hash of the previous block (display byte order).
    pub prev_block_hash: Hash256,
    /// Merkle root of all transactions (display byte order).
    pub merkle_root: Hash256,
    /// Block timestamp (Unix time).
    pub timestamp: u32,
    /// Difficulty target in compact "bits" format.
    pub bits: u32,
    /// Nonce for proof of work.
    pub nonce: u32,
}

impl BlockHeader {
    /// Decode the header fields from exactly 80 bytes.
    pub fn from_bytes(bytes: &[u8]) -> core::result::Result<Self, ParseError> {
        if bytes.len() != BLOCK_HEADER_SIZE {
            return Err(ParseError::InvalidLength {
                expected: BLOCK_HEADER_SIZE,
                got: bytes.len(),
            });
        }

        let mut reader = Reader::new(bytes);
        Ok(BlockHeader {
            version: reader.read_i32_le()?,
            prev_block_hash: Hash256::from_wire(&reader.read_array()?),
            merkle_root: Hash256::from_wire(&reader.read_array()?),
            timestamp: reader.read_u32_le()?,
            bits: reader.read_u32_le()?,
            nonce: reader.read_u32_le()?,
        })
    }

    /// Serialize the block header to 80 bytes.
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut header = [0u8; BLOCK_HEADER_SIZE];

        header[0..4].copy_from_slice(&self.version.to_le_bytes());
        header[4..36].copy_from_slice(&self.prev_block_hash.to_wire());
        header[36..68].copy_from_slice(&self.merkle_root.to_wire());
        header[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());
        header[76..80].copy_from_slice(&self.nonce.to_le_bytes());

        header
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the block hash (double SHA256, display order).
    pub fn block_hash(&self) -> Hash256 {
        Hash256::hash(&self.to_bytes())
    }

    /// The target claimed by `bits`, permissively expanded.
    pub fn target(&self) -> Target {
        bits_to_target(self.bits)
    }
}

/// A header decoded from untrusted input, with its verified hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHeader {
    pub header: BlockHeader,
    /// Double SHA256 of the serialized header, display order.
    pub hash: Hash256,
    /// Presentation used by the identifier accessors.
    pub encoding: Encoding,
}

impl DecodedHeader {
    pub fn prev_block_hash(&self) -> Encoded {
        self.encoding.encode(self.header.prev_block_hash.as_bytes())
    }

    pub fn merkle_root(&self) -> Encoded {
        self.encoding.encode(self.header.merkle_root.as_bytes())
    }

    pub fn hash(&self) -> Encoded {
        self.encoding.encode(self.hash.as_bytes())
    }

    /// Re-encode the header, checking it still hashes to `self.hash`.
    pub fn serialize(&self) -> Result<String> {
        serialize_header(&self.header, Some(&self.hash))
    }
}

/// Header operations under a fixed [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderCodec {
    config: CodecConfig,
}

impl HeaderCodec {
    pub fn new(config: CodecConfig) -> Self {
        HeaderCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode and validate a header, presenting identifiers in the input's encoding.
    pub fn deserialize<'a>(&self, input: impl Into<RawInput<'a>>) -> Result<DecodedHeader> {
        let input = input.into();
        self.deserialize_as(input, input.encoding())
    }

    /// Decode and validate a header, presenting identifiers in `encoding`.
    pub fn deserialize_as<'a>(
        &self,
        input: impl Into<RawInput<'a>>,
        encoding: Encoding,
    ) -> Result<DecodedHeader> {
        let raw = header_bytes(input.into())?;
        let header = BlockHeader::from_bytes(&raw)?;

        let digest = double_sha256(&raw);
        verify_pow_with(&raw, &digest, &self.config)?;

        Ok(DecodedHeader {
            header,
            hash: Hash256::from_wire(&digest),
            encoding,
        })
    }

    /// Encode a header to hex.
    ///
    /// When `expected_hash` is given, the hash of the freshly encoded bytes
    /// must equal it. Proof of work is not checked.
    pub fn serialize(
        &self,
        header: &BlockHeader,
        expected_hash: Option<&Hash256>,
    ) -> Result<String> {
        let raw = header.to_bytes();
        if let Some(expected) = expected_hash {
            let computed = Hash256::hash(&raw);
            if computed != *expected {
                debug!("header hash mismatch: claimed {}, computed {}", expected, computed);
                return Err(Error::HashMismatch {
                    expected: *expected,
                    computed,
                });
            }
        }
        Ok(hex::encode(raw))
    }

    /// The block hash of a serialized header, in the input's encoding.
    pub fn block_hash<'a>(&self, input: impl Into<RawInput<'a>>) -> Result<Encoded> {
        let input = input.into();
        let raw = header_bytes(input)?;
        Ok(input.encoding().encode(Hash256::hash(&raw).as_bytes()))
    }
}

fn header_bytes(input: RawInput<'_>) -> Result<[u8; BLOCK_HEADER_SIZE]> {
    let bytes = input.to_bytes()?;
    <[u8; BLOCK_HEADER_SIZE]>::try_from(&bytes[..]).map_err(|_| {
        Error::Parse(ParseError::InvalidLength {
            expected: BLOCK_HEADER_SIZE,
            got: bytes.len(),
        })
    })
}

/// Decode and validate a header with the default configuration.
pub fn deserialize_header<'a>(input: impl Into<RawInput<'a>>) -> Result<DecodedHeader> {
    HeaderCodec::default().deserialize(input)
}

/// Encode a header to hex, checking `expected_hash` when given.
pub fn serialize_header(header: &BlockHeader, expected_hash: Option<&Hash256>) -> Result<String> {
    HeaderCodec::default().serialize(header, expected_hash)
}

/// The block hash of a serialized header, without decoding or validating it.
pub fn blockheader_to_blockhash<'a>(input: impl Into<RawInput<'a>>) -> Result<Encoded> {
    HeaderCodec::default().block_hash(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::CompactPolicy;
    use crate::error::ErrorKind;
    use crate::network::Network;

    const GENESIS_HASH: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
    const GENESIS_MERKLE: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    const BLOCK_1: &str = concat!(
        "01000000",
        "6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000",
        "982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e",
        "61bc6649",
        "ffff001d",
        "01e36299",
    );
    const BLOCK_1_HASH: &str = "00000000839a8e6886ab5951d76f411475428afc90947ee320161bbf18eb6048";

    fn genesis_bytes() -> Vec<u8> {
        hex::decode(Network::Mainnet.genesis_header_hex()).unwrap()
    }

    /// A header whose target exceeds 256 bits, so any nonce passes.
    fn unbounded_header() -> BlockHeader {
        BlockHeader {
            version: -1,
            prev_block_hash: Hash256::new([0x12; 32]),
            merkle_root: Hash256::new([0x34; 32]),
            timestamp: 1_700_000_000,
            bits: 0x2200ffff,
            nonce: 0xDEADBEEF,
        }
    }

    #[test]
    fn test_deserialize_genesis_hex() {
        let decoded = deserialize_header(Network::Mainnet.genesis_header_hex()).unwrap();

        assert_eq!(decoded.header.version, 1);
        assert_eq!(decoded.header.prev_block_hash, Hash256::ZERO);
        assert_eq!(decoded.header.merkle_root.to_hex(), GENESIS_MERKLE);
        assert_eq!(decoded.header.timestamp, 1231006505);
        assert_eq!(decoded.header.bits, 0x1d00ffff);
        assert_eq!(decoded.header.nonce, 2083236893);
        assert_eq!(decoded.hash.to_hex(), GENESIS_HASH);

        assert_eq!(decoded.encoding, Encoding::Hex);
        assert_eq!(decoded.hash(), Encoded::Hex(GENESIS_HASH.to_string()));
        assert_eq!(decoded.merkle_root(), Encoded::Hex(GENESIS_MERKLE.to_string()));
    }

    #[test]
    fn test_deserialize_binary_mirrors_input() {
        let raw = genesis_bytes();
        let decoded = deserialize_header(raw.as_slice()).unwrap();

        assert_eq!(decoded.encoding, Encoding::Binary);
        assert_eq!(decoded.hash(), Encoded::Binary(hex::decode(GENESIS_HASH).unwrap()));
        assert_eq!(decoded.prev_block_hash(), Encoded::Binary(vec![0u8; 32]));
    }

    #[test]
    fn test_deserialize_as_overrides_encoding() {
        let raw = genesis_bytes();
        let decoded = HeaderCodec::default()
            .deserialize_as(raw.as_slice(), Encoding::Hex)
            .unwrap();
        assert_eq!(decoded.hash(), Encoded::Hex(GENESIS_HASH.to_string()));
    }

    #[test]
    fn test_block_one_links_to_genesis() {
        let decoded = deserialize_header(BLOCK_1).unwrap();
        assert_eq!(decoded.header.prev_block_hash.to_hex(), GENESIS_HASH);
        assert_eq!(
            decoded.header.merkle_root.to_hex(),
            "0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098"
        );
        assert_eq!(decoded.header.timestamp, 1231469665);
        assert_eq!(decoded.header.nonce, 2573394689);
        assert_eq!(decoded.hash.to_hex(), BLOCK_1_HASH);
    }

    #[test]
    fn test_other_network_genesis_hashes() {
        let testnet = deserialize_header(Network::Testnet.genesis_header_hex()).unwrap();
        assert_eq!(
            testnet.hash.to_hex(),
            "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943"
        );

        let regtest = HeaderCodec::new(CodecConfig::new(Network::Regtest))
            .deserialize(Network::Regtest.genesis_header_hex())
            .unwrap();
        assert_eq!(
            regtest.hash.to_hex(),
            "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206"
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        for header_hex in [
            Network::Mainnet.genesis_header_hex(),
            Network::Testnet.genesis_header_hex(),
            Network::Regtest.genesis_header_hex(),
            BLOCK_1,
        ] {
            let decoded = deserialize_header(header_hex).unwrap();
            assert_eq!(decoded.serialize().unwrap(), header_hex);
        }

        let raw = genesis_bytes();
        let decoded = deserialize_header(raw.as_slice()).unwrap();
        assert_eq!(decoded.serialize().unwrap(), hex::encode(&raw));
    }

    #[test]
    fn test_version_bit_pattern_is_preserved() {
        let header = unbounded_header();
        let decoded = deserialize_header(&header.to_bytes()).unwrap();

        assert_eq!(decoded.header, header);
        assert_eq!(&decoded.header.to_bytes()[0..4], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&decoded.header.to_bytes()[76..80], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(decoded.serialize().unwrap(), header.to_hex());
    }

    #[test]
    fn test_hash_stability() {
        let raw = genesis_bytes();
        let hex_header = Network::Mainnet.genesis_header_hex();

        let from_hex = blockheader_to_blockhash(hex_header).unwrap();
        assert_eq!(from_hex, deserialize_header(hex_header).unwrap().hash());

        let from_bin = blockheader_to_blockhash(raw.as_slice()).unwrap();
        assert_eq!(from_bin, deserialize_header(raw.as_slice()).unwrap().hash());

        assert_eq!(from_hex, Encoded::Hex(GENESIS_HASH.to_string()));
    }

    #[test]
    fn test_blockhash_skips_pow() {
        let mut raw = genesis_bytes();
        raw[76] ^= 0x01;
        assert!(blockheader_to_blockhash(raw.as_slice()).is_ok());
    }

    #[test]
    fn test_wrong_nonce_fails_pow() {
        let mut raw = genesis_bytes();
        raw[76] ^= 0x01;
        let err = deserialize_header(raw.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProofOfWork);
    }

    #[test]
    fn test_zero_target_fails_pow() {
        let mut header = unbounded_header();
        header.bits = 0x01003456;
        let err = deserialize_header(&header.to_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidProofOfWork { bits: 0x01003456, .. }));
    }

    #[test]
    fn test_strict_codec_rejects_overflowing_bits() {
        let header = unbounded_header();
        let config = CodecConfig::default().with_compact_policy(CompactPolicy::Strict);
        let codec = HeaderCodec::new(config);
        let err = codec.deserialize(&header.to_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProofOfWork);
    }

    #[test]
    fn test_parse_errors() {
        let err = deserialize_header("00ff").unwrap_err();
        assert_eq!(err, Error::Parse(ParseError::InvalidLength { expected: 80, got: 2 }));

        let err = deserialize_header("zz").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let raw = genesis_bytes();
        let err = blockheader_to_blockhash(&raw[..79]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_tampered_hash_is_rejected() {
        let mut decoded = deserialize_header(Network::Mainnet.genesis_header_hex()).unwrap();
        let mut forged = *decoded.hash.as_bytes();
        forged[31] ^= 0x01;
        decoded.hash = Hash256::new(forged);

        let err = decoded.serialize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HashMismatch);
        match err {
            Error::HashMismatch { expected, computed } => {
                assert_eq!(expected, decoded.hash);
                assert_eq!(computed.to_hex(), GENESIS_HASH);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_does_not_check_pow() {
        let mut decoded = deserialize_header(Network::Mainnet.genesis_header_hex()).unwrap();
        decoded.header.nonce = 0;

        let hex_header = serialize_header(&decoded.header, None).unwrap();
        assert!(hex_header.ends_with("00000000"));

        let rehashed = decoded.header.block_hash();
        assert_eq!(serialize_header(&decoded.header, Some(&rehashed)).unwrap(), hex_header);
    }

    #[test]
    fn test_header_target() {
        let decoded = deserialize_header(Network::Mainnet.genesis_header_hex()).unwrap();
        assert!(decoded.header.target().is_met_by(decoded.hash.as_bytes()));
    }
}
