//! Codec configuration.

use crate::difficulty::CompactPolicy;
use crate::network::Network;

/// Settings shared by header operations.
///
/// The default validates mainnet headers with the permissive compact-target
/// expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    /// Network whose proof-of-work limit applies under a strict policy.
    pub network: Network,
    /// How the header's `bits` field is expanded into a target.
    pub compact_policy: CompactPolicy,
}

impl CodecConfig {
    pub fn new(network: Network) -> Self {
        CodecConfig {
            network,
            compact_policy: CompactPolicy::default(),
        }
    }

    /// Set the network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the compact-target policy.
    pub fn with_compact_policy(mut self, compact_policy: CompactPolicy) -> Self {
        self.compact_policy = compact_policy;
        self
    }
}
