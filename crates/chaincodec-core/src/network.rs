//! Bitcoin network definitions and constants.

/// Bitcoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Bitcoin mainnet
    #[default]
    Mainnet,
    /// Bitcoin testnet3
    Testnet,
    /// Local regression test network
    Regtest,
}

impl Network {
    /// Serialized genesis block header (80 bytes, hex).
    pub fn genesis_header_hex(&self) -> &'static str {
        match self {
            Network::Mainnet => concat!(
                "01000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
                "29ab5f49",
                "ffff001d",
                "1dac2b7c",
            ),
            Network::Testnet => concat!(
                "01000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
                "dae5494d",
                "ffff001d",
                "1aa4ae18",
            ),
            Network::Regtest => concat!(
                "01000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
                "dae5494d",
                "ffff7f20",
                "02000000",
            ),
        }
    }

    /// Compact encoding of the highest target a header may claim.
    pub fn pow_limit_bits(&self) -> u32 {
        match self {
            Network::Mainnet | Network::Testnet => 0x1d00ffff,
            Network::Regtest => 0x207fffff,
        }
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Some(Network::Mainnet),
            "testnet" | "testnet3" | "test" => Some(Network::Testnet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Size of a block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Length of the all-zero witness placeholder item, in bytes (64 hex characters).
pub const WITNESS_PLACEHOLDER_LEN: usize = 32;

/// Round `height` down to the nearest multiple of `divisor`.
///
/// Used to align header requests on checkpoint or chunk boundaries.
/// A zero divisor leaves the height unchanged.
pub fn nearest_parent(height: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        return height;
    }
    height - height % divisor
}
