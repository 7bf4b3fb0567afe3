//! SHA256 double-hashing and 32-byte chain identifiers.

use core::fmt;
use core::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::ParseError;

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// This is used for block header hashing and transaction IDs.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut result = [0u8; 32];
    result.copy_from_slice(&second);
    result
}

/// Reverse the byte order of a 32-byte array.
///
/// Bitcoin displays hashes in reverse byte order relative to the raw digest.
#[inline]
pub fn reverse_bytes(bytes: &[u8; 32]) -> [u8; 32] {
    let mut reversed = *bytes;
    reversed.reverse();
    reversed
}

/// A 32-byte chain identifier in display byte order.
///
/// Block hashes, merkle roots and txids travel on the wire in the raw digest
/// order and are shown reversed. `Hash256` always holds the display order;
/// use [`Hash256::from_wire`] and [`Hash256::to_wire`] at the wire boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const LENGTH: usize = 32;

    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Wrap bytes that are already in display order.
    pub const fn new(display: [u8; 32]) -> Self {
        Hash256(display)
    }

    /// Build an identifier from wire-order bytes (e.g. a raw digest).
    pub fn from_wire(wire: &[u8; 32]) -> Self {
        Hash256(reverse_bytes(wire))
    }

    /// Build an identifier from a wire-order slice, which must be 32 bytes.
    pub fn from_wire_slice(wire: &[u8]) -> Result<Self, ParseError> {
        let bytes: [u8; 32] = wire.try_into().map_err(|_| ParseError::InvalidLength {
            expected: Self::LENGTH,
            got: wire.len(),
        })?;
        Ok(Self::from_wire(&bytes))
    }

    /// Build an identifier from a display-order slice, which must be 32 bytes.
    pub fn from_display_slice(display: &[u8]) -> Result<Self, ParseError> {
        let bytes: [u8; 32] = display.try_into().map_err(|_| ParseError::InvalidLength {
            expected: Self::LENGTH,
            got: display.len(),
        })?;
        Ok(Hash256(bytes))
    }

    /// Double SHA256 of `data`, presented in display order.
    pub fn hash(data: &[u8]) -> Self {
        Self::from_wire(&double_sha256(data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_wire(&self) -> [u8; 32] {
        reverse_bytes(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Hash256 {
    type Err = ParseError;

    /// Parse a display-order hex identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_display_slice(&bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_sha256() {
        // Test vector: SHA256d("hello")
        let data = b"hello";
        let hash = double_sha256(data);

        let expected = hex::decode(
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        ).unwrap();

        assert_eq!(hash.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_reverse_bytes() {
        let mut original = [0u8; 32];
        for (i, byte) in original.iter_mut().enumerate() {
            *byte = i as u8 + 1;
        }
        let reversed = reverse_bytes(&original);

        assert_eq!(reversed[0], 0x20);
        assert_eq!(reversed[31], 0x01);
    }

    #[test]
    fn test_hash256_wire_and_display() {
        let mut wire = [0u8; 32];
        wire[0] = 0xab;
        let id = Hash256::from_wire(&wire);

        assert_eq!(id.as_bytes()[31], 0xab);
        assert_eq!(id.to_wire(), wire);
        assert!(id.to_hex().ends_with("ab"));
    }

    #[test]
    fn test_hash256_from_str() {
        let hex_id = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
        let id: Hash256 = hex_id.parse().unwrap();
        assert_eq!(id.to_string(), hex_id);

        assert!(matches!(
            "00ff".parse::<Hash256>(),
            Err(ParseError::InvalidLength { expected: 32, got: 2 })
        ));
        assert!(matches!("xyz".parse::<Hash256>(), Err(ParseError::InvalidHex(_))));
    }
}
