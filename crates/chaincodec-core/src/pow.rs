//! Proof-of-work verification of a serialized header.

use log::debug;

use crate::config::CodecConfig;
use crate::difficulty::{CompactPolicy, CompactTarget, Target};
use crate::error::{Error, Result};
use crate::hash::{reverse_bytes, Hash256};
use crate::network::BLOCK_HEADER_SIZE;

/// Byte range of the `bits` field within a serialized header.
const BITS_RANGE: core::ops::Range<usize> = 72..76;

/// Check that `raw_digest` satisfies the target encoded in the header's own
/// `bits` field, using the permissive compact expansion.
///
/// `raw_digest` is the double SHA256 of `raw_header` as produced by the hash
/// function, before the display reversal. It is read as a little-endian
/// integer and must not exceed the target.
pub fn verify_pow(raw_header: &[u8; BLOCK_HEADER_SIZE], raw_digest: &[u8; 32]) -> Result<()> {
    verify_pow_with(raw_header, raw_digest, &CodecConfig::default())
}

/// [`verify_pow`] under an explicit configuration.
pub fn verify_pow_with(
    raw_header: &[u8; BLOCK_HEADER_SIZE],
    raw_digest: &[u8; 32],
    config: &CodecConfig,
) -> Result<()> {
    let mut bits = [0u8; 4];
    bits.copy_from_slice(&raw_header[BITS_RANGE]);
    let compact = CompactTarget::from_wire(bits);

    // Little-endian digest, rearranged so it compares as a big-endian number
    let digest_be = reverse_bytes(raw_digest);

    let target = match config.compact_policy {
        CompactPolicy::Permissive => Some(compact.expand()),
        CompactPolicy::Strict => strict_target(&compact, config),
    };

    match target {
        Some(target) if target.is_met_by(&digest_be) => Ok(()),
        _ => {
            let hash = Hash256::new(digest_be);
            debug!(
                "rejecting header {}: bits {:#010x} ({:?} policy)",
                hash,
                compact.to_bits(),
                config.compact_policy
            );
            Err(Error::InvalidProofOfWork {
                hash,
                bits: compact.to_bits(),
            })
        }
    }
}

fn strict_target(compact: &CompactTarget, config: &CodecConfig) -> Option<Target> {
    let target = compact.strict_target()?;
    let limit = CompactTarget::from_bits(config.network.pow_limit_bits()).strict_target()?;
    if target > limit {
        return None;
    }
    Some(Target::Bounded(target))
}
