//! Well-known Solana network definitions.

use chainmeter::chain::{ChainId, SOLANA_NAMESPACE};
use chainmeter::networks::NetworkInfo;

/// Genesis-hash reference of Solana mainnet-beta.
pub const SOLANA_MAINNET_REFERENCE: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Genesis-hash reference of Solana devnet.
pub const SOLANA_DEVNET_REFERENCE: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

/// Genesis-hash reference of Solana testnet.
pub const SOLANA_TESTNET_REFERENCE: &str = "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z";

/// Well-known Solana networks with their names and CAIP-2 identifiers.
pub static SOLANA_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "solana",
        namespace: SOLANA_NAMESPACE,
        reference: SOLANA_MAINNET_REFERENCE,
    },
    NetworkInfo {
        name: "solana-mainnet",
        namespace: SOLANA_NAMESPACE,
        reference: SOLANA_MAINNET_REFERENCE,
    },
    NetworkInfo {
        name: "solana-devnet",
        namespace: SOLANA_NAMESPACE,
        reference: SOLANA_DEVNET_REFERENCE,
    },
    NetworkInfo {
        name: "solana-testnet",
        namespace: SOLANA_NAMESPACE,
        reference: SOLANA_TESTNET_REFERENCE,
    },
];

/// CAIP-2 chain id of Solana mainnet-beta.
#[must_use]
pub fn solana_mainnet() -> ChainId {
    ChainId::new(SOLANA_NAMESPACE, SOLANA_MAINNET_REFERENCE)
}
