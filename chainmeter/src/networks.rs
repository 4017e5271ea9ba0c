//! Network identification and resolution.
//!
//! Bindings name their network loosely: a numeric EIP-155 chain id (`1`), a
//! human-readable name (`"mainnet"`, `"solana-devnet"`) or a CAIP-2 chain id
//! (`"eip155:137"`). This module turns any of those into one canonical
//! [`ChainId`].
//!
//! Concrete network data lives in chain-specific crates:
//!
//! - `chainmeter-evm` provides `EVM_NETWORKS` for EIP-155 chains
//! - `chainmeter-svm` provides `SOLANA_NETWORKS` for Solana clusters
//!
//! Applications assemble a [`NetworkRegistry`] from these slices at startup.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::ChainId;

/// A known network definition with its chain ID and human-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network name (e.g., "mainnet", "solana")
    pub name: &'static str,
    /// CAIP-2 namespace (e.g., "eip155", "solana")
    pub namespace: &'static str,
    /// Chain reference (e.g., "1" for Ethereum mainnet)
    pub reference: &'static str,
}

impl NetworkInfo {
    /// Create a `ChainId` from this network info
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.namespace, self.reference)
    }
}

/// A network identifier as supplied by a binding call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    /// Numeric EIP-155 chain id.
    Id(u64),
    /// Human-readable network name, resolved through a [`NetworkRegistry`].
    Name(String),
    /// Fully qualified CAIP-2 chain id.
    Chain(ChainId),
}

impl Default for Network {
    fn default() -> Self {
        Self::Id(1)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
            Self::Chain(chain_id) => write!(f, "{chain_id}"),
        }
    }
}

impl From<u64> for Network {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

impl From<ChainId> for Network {
    fn from(value: ChainId) -> Self {
        Self::Chain(value)
    }
}

impl From<&str> for Network {
    fn from(value: &str) -> Self {
        if let Ok(id) = value.parse::<u64>() {
            return Self::Id(id);
        }
        match ChainId::from_str(value) {
            Ok(chain_id) => Self::Chain(chain_id),
            Err(_) => Self::Name(value.to_owned()),
        }
    }
}

impl From<String> for Network {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Id(id) => serializer.serialize_u64(*id),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Self::Id(id),
            Raw::Text(text) => Self::from(text),
        })
    }
}

/// The network identifier could not be mapped to a chain id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unresolvable network '{network}'")]
pub struct UnresolvableNetwork {
    /// The identifier as supplied by the caller.
    pub network: String,
}

impl UnresolvableNetwork {
    /// Creates a new error for the given network identifier.
    #[must_use]
    pub fn new(network: &Network) -> Self {
        Self {
            network: network.to_string(),
        }
    }
}

/// Maps a [`Network`] identifier to its canonical [`ChainId`].
///
/// Implementations must be pure and total over the identifiers they
/// recognize: the same input always yields the same chain id.
pub trait NetworkResolver {
    /// Resolves a network identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvableNetwork`] if the identifier is not recognized.
    fn resolve(&self, network: &Network) -> Result<ChainId, UnresolvableNetwork>;
}

impl<T: NetworkResolver + ?Sized> NetworkResolver for &T {
    fn resolve(&self, network: &Network) -> Result<ChainId, UnresolvableNetwork> {
        (**self).resolve(network)
    }
}

/// Registry that maps network names to [`ChainId`] values and vice versa.
///
/// Several names may alias one chain (`"mainnet"` and `"homestead"`); the
/// first registered name is the canonical one returned by
/// [`name_by_chain_id`](Self::name_by_chain_id).
///
/// # Example
///
/// ```ignore
/// use chainmeter::networks::NetworkRegistry;
///
/// let registry = NetworkRegistry::from_networks(chainmeter_evm::EVM_NETWORKS)
///     .with_networks(chainmeter_svm::SOLANA_NETWORKS);
///
/// let chain_id = registry.chain_id_by_name("mainnet").unwrap();
/// let name = registry.name_by_chain_id(chain_id).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    name_to_chain_id: HashMap<&'static str, ChainId>,
    chain_id_to_name: HashMap<ChainId, &'static str>,
}

impl NetworkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name_to_chain_id: HashMap::new(),
            chain_id_to_name: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated from a network info slice.
    #[must_use]
    pub fn from_networks(networks: &[NetworkInfo]) -> Self {
        let mut registry = Self::with_capacity(networks.len());
        registry.register(networks);
        registry
    }

    /// Creates an empty registry with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            name_to_chain_id: HashMap::with_capacity(cap),
            chain_id_to_name: HashMap::with_capacity(cap),
        }
    }

    /// Registers additional networks into this registry.
    pub fn register(&mut self, networks: &[NetworkInfo]) {
        for info in networks {
            self.name_to_chain_id.insert(info.name, info.chain_id());
            self.chain_id_to_name
                .entry(info.chain_id())
                .or_insert(info.name);
        }
    }

    /// Builder-style method: registers additional networks and returns `self`.
    #[must_use]
    pub fn with_networks(mut self, networks: &[NetworkInfo]) -> Self {
        self.register(networks);
        self
    }

    /// Looks up a [`ChainId`] by its human-readable network name.
    #[must_use]
    pub fn chain_id_by_name(&self, name: &str) -> Option<&ChainId> {
        self.name_to_chain_id.get(name)
    }

    /// Looks up the canonical network name by its [`ChainId`].
    #[must_use]
    pub fn name_by_chain_id(&self, chain_id: &ChainId) -> Option<&'static str> {
        self.chain_id_to_name.get(chain_id).copied()
    }

    /// Returns the number of registered network names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.name_to_chain_id.len()
    }

    /// Returns `true` if no networks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_to_chain_id.is_empty()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkResolver for NetworkRegistry {
    /// Numeric ids are always EIP-155 chain ids, the way ethers treats them.
    /// Names must be registered. CAIP-2 ids must be registered unless they
    /// carry a numeric EIP-155 reference.
    fn resolve(&self, network: &Network) -> Result<ChainId, UnresolvableNetwork> {
        match network {
            Network::Id(id) => Ok(ChainId::eip155(*id)),
            Network::Name(name) => self
                .chain_id_by_name(name)
                .cloned()
                .ok_or_else(|| UnresolvableNetwork::new(network)),
            Network::Chain(chain_id) => {
                if self.chain_id_to_name.contains_key(chain_id) {
                    Ok(chain_id.clone())
                } else {
                    chain_id
                        .as_eip155()
                        .map(ChainId::eip155)
                        .ok_or_else(|| UnresolvableNetwork::new(network))
                }
            }
        }
    }
}
