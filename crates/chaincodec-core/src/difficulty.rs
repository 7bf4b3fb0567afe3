//! Compact "bits" target decoding.
//!
//! The bits format is: [exponent (1 byte)][mantissa (3 bytes)]
//! Target = mantissa * 256^(exponent - 3)
//!
//! Headers are validated against the permissive expansion of this formula:
//! no sign bit handling and no range check, so an exponent large enough to
//! push the target past 256 bits yields [`Target::Unbounded`]. The canonical
//! checks Bitcoin Core applies are available through [`CompactPolicy::Strict`].

/// How the compact encoding in a header is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompactPolicy {
    /// Plain `mantissa * 256^(exponent - 3)`, as received.
    #[default]
    Permissive,
    /// Reject negative, zero and overflowing encodings, and targets above
    /// the network's proof-of-work limit.
    Strict,
}

/// A 256-bit target, or a target above every 256-bit digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Big-endian 256-bit value.
    Bounded([u8; 32]),
    /// The expansion does not fit in 256 bits.
    Unbounded,
}

impl Target {
    /// Whether a digest, given as a big-endian integer, satisfies the target.
    ///
    /// The target is an inclusive upper bound.
    #[inline]
    pub fn is_met_by(&self, digest_be: &[u8; 32]) -> bool {
        match self {
            // Arrays compare lexicographically, which is big-endian numeric order.
            Target::Bounded(target) => digest_be <= target,
            Target::Unbounded => true,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8; 32]> {
        match self {
            Target::Bounded(target) => Some(target),
            Target::Unbounded => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Target::Bounded(target) if target.iter().all(|b| *b == 0))
    }
}

/// The compact encoding split into its exponent and mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactTarget {
    pub exponent: u8,
    /// Most significant byte first.
    pub mantissa: [u8; 3],
}

impl CompactTarget {
    pub fn from_bits(bits: u32) -> Self {
        let [exponent, m0, m1, m2] = bits.to_be_bytes();
        CompactTarget {
            exponent,
            mantissa: [m0, m1, m2],
        }
    }

    /// Decode the four `bits` bytes exactly as they sit in a serialized header.
    pub fn from_wire(bits: [u8; 4]) -> Self {
        Self::from_bits(u32::from_le_bytes(bits))
    }

    pub fn to_bits(&self) -> u32 {
        u32::from_be_bytes([
            self.exponent,
            self.mantissa[0],
            self.mantissa[1],
            self.mantissa[2],
        ])
    }

    pub fn mantissa_value(&self) -> u32 {
        self.to_bits() & 0x00FF_FFFF
    }

    /// `mantissa * 256^(exponent - 3)` with no validation of the encoding.
    ///
    /// Exponents below 3 shift mantissa bytes below the unit position; those
    /// bytes are dropped, which is the integer floor of the real target.
    pub fn expand(&self) -> Target {
        expand_mantissa(self.exponent, self.mantissa)
    }

    /// Set when the mantissa's sign bit is on and the remaining bits are not zero.
    pub fn is_negative(&self) -> bool {
        let word = self.mantissa_value() & 0x007F_FFFF;
        word != 0 && self.mantissa[0] & 0x80 != 0
    }

    /// Set when the encoded value cannot fit in 256 bits.
    pub fn is_overflow(&self) -> bool {
        let word = self.mantissa_value() & 0x007F_FFFF;
        let size = self.exponent;
        word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32))
    }

    /// The target under Bitcoin Core's `SetCompact` rules, or `None` when the
    /// encoding is negative, zero or overflowing.
    pub fn strict_target(&self) -> Option<[u8; 32]> {
        if self.is_negative() || self.is_overflow() {
            return None;
        }
        let mut mantissa = self.mantissa;
        mantissa[0] &= 0x7F;
        let target = expand_mantissa(self.exponent, mantissa);
        if target.is_zero() {
            return None;
        }
        target.as_bytes().copied()
    }
}

fn expand_mantissa(exponent: u8, mantissa: [u8; 3]) -> Target {
    let mut target = [0u8; 32];
    for (i, &byte) in mantissa.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        // Power of 256 this mantissa byte lands on
        let power = exponent as i32 - 1 - i as i32;
        if power < 0 {
            continue;
        }
        if power >= 32 {
            return Target::Unbounded;
        }
        target[31 - power as usize] = byte;
    }
    Target::Bounded(target)
}

/// Convert compact "bits" to a target using the permissive expansion.
pub fn bits_to_target(bits: u32) -> Target {
    CompactTarget::from_bits(bits).expand()
}

/// Convert a 256-bit target back to canonical compact "bits".
pub fn target_to_bits(target: &[u8; 32]) -> u32 {
    // Find the first non-zero byte
    let first_nonzero = match target.iter().position(|b| *b != 0) {
        Some(pos) => pos,
        None => return 0,
    };

    // Exponent is the number of bytes from the right
    let exponent = (32 - first_nonzero) as u32;

    let mut mantissa: u32 = 0;
    for offset in 0..3 {
        mantissa <<= 8;
        if let Some(byte) = target.get(first_nonzero + offset) {
            mantissa |= *byte as u32;
        }
    }

    // A set high bit would read as negative; move it into the exponent
    let (exp_adj, mant_adj) = if mantissa & 0x00800000 != 0 {
        (exponent + 1, mantissa >> 8)
    } else {
        (exponent, mantissa)
    };

    (exp_adj << 24) | (mant_adj & 0x007FFFFF)
}
