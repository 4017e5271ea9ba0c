//! Well-known EVM networks.
//!
//! Names follow the ethers conventions (`homestead` is an alias of
//! `mainnet`, `matic` of `polygon`), so bindings written against either
//! spelling resolve to the same chain.

use chainmeter::networks::NetworkInfo;

use crate::chain::Eip155ChainId;

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET: Eip155ChainId = 1;

/// Goerli (testnet) chain ID.
pub const GOERLI: Eip155ChainId = 5;

/// Optimism chain ID.
pub const OPTIMISM: Eip155ChainId = 10;

/// BNB Smart Chain chain ID.
pub const BSC: Eip155ChainId = 56;

/// Polygon Mainnet chain ID.
pub const POLYGON_MAINNET: Eip155ChainId = 137;

/// Base Mainnet chain ID.
pub const BASE_MAINNET: Eip155ChainId = 8453;

/// Arbitrum One chain ID.
pub const ARBITRUM_ONE: Eip155ChainId = 42161;

/// Avalanche C-Chain chain ID.
pub const AVALANCHE_MAINNET: Eip155ChainId = 43114;

/// Linea Mainnet chain ID.
pub const LINEA_MAINNET: Eip155ChainId = 59144;

/// Holesky (testnet) chain ID.
pub const HOLESKY: Eip155ChainId = 17000;

/// Sepolia (testnet) chain ID.
pub const SEPOLIA: Eip155ChainId = 11_155_111;

const fn eip155(name: &'static str, reference: &'static str) -> NetworkInfo {
    NetworkInfo {
        name,
        namespace: "eip155",
        reference,
    }
}

/// Well-known EVM networks with their names and CAIP-2 identifiers.
///
/// The first entry for a chain is its canonical name.
pub static EVM_NETWORKS: &[NetworkInfo] = &[
    eip155("mainnet", "1"),
    eip155("homestead", "1"),
    eip155("goerli", "5"),
    eip155("optimism", "10"),
    eip155("bnb", "56"),
    eip155("bsc", "56"),
    eip155("polygon", "137"),
    eip155("matic", "137"),
    eip155("base", "8453"),
    eip155("holesky", "17000"),
    eip155("arbitrum", "42161"),
    eip155("avalanche", "43114"),
    eip155("linea", "59144"),
    eip155("sepolia", "11155111"),
];

#[cfg(test)]
mod tests {
    use chainmeter::chain::ChainId;
    use chainmeter::networks::{Network, NetworkRegistry, NetworkResolver};

    use super::*;

    #[test]
    fn test_constants_match_table() {
        let registry = NetworkRegistry::from_networks(EVM_NETWORKS);
        for (name, id) in [
            ("mainnet", ETHEREUM_MAINNET),
            ("goerli", GOERLI),
            ("optimism", OPTIMISM),
            ("bsc", BSC),
            ("polygon", POLYGON_MAINNET),
            ("base", BASE_MAINNET),
            ("holesky", HOLESKY),
            ("arbitrum", ARBITRUM_ONE),
            ("avalanche", AVALANCHE_MAINNET),
            ("linea", LINEA_MAINNET),
            ("sepolia", SEPOLIA),
        ] {
            assert_eq!(
                registry.chain_id_by_name(name).and_then(ChainId::as_eip155),
                Some(id),
                "{name}"
            );
        }
    }

    #[test]
    fn test_aliases_resolve_together() {
        let registry = NetworkRegistry::from_networks(EVM_NETWORKS);
        assert_eq!(
            registry.resolve(&"homestead".into()).unwrap(),
            registry.resolve(&Network::Id(1)).unwrap()
        );
        assert_eq!(
            registry.name_by_chain_id(&ChainId::eip155(137)),
            Some("polygon")
        );
    }
}
