//! Canonical contract identity.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::chain::ChainId;
use crate::networks::{Network, NetworkResolver, UnresolvableNetwork};

/// Canonical identity of a contract instance: ABI name, address and chain.
///
/// The address is lower-cased on construction and the chain is always the
/// resolved [`ChainId`], so two bindings of the same contract through
/// different address casings or network aliases compare equal.
///
/// Renders as `{abi_name}_{address}_{chain_id}`, e.g.
/// `ERC20_0xa0b8..._eip155:1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    abi_name: String,
    address: String,
    chain_id: ChainId,
}

impl IdentityKey {
    /// Separator between the rendered components.
    pub const DELIMITER: char = '_';

    /// Creates a key from an already resolved chain id.
    pub fn new(abi_name: impl Into<String>, address: &str, chain_id: ChainId) -> Self {
        Self {
            abi_name: abi_name.into(),
            address: address.to_lowercase(),
            chain_id,
        }
    }

    /// Resolves `network` and builds the key.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvableNetwork`] if the resolver does not recognize
    /// the network.
    pub fn derive<R: NetworkResolver + ?Sized>(
        resolver: &R,
        abi_name: &str,
        address: &str,
        network: &Network,
    ) -> Result<Self, UnresolvableNetwork> {
        let chain_id = resolver.resolve(network)?;
        Ok(Self::new(abi_name, address, chain_id))
    }

    /// Returns the ABI name.
    #[must_use]
    pub fn abi_name(&self) -> &str {
        &self.abi_name
    }

    /// Returns the lower-cased address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the resolved chain id.
    #[must_use]
    pub const fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = Self::DELIMITER;
        write!(f, "{}{d}{}{d}{}", self.abi_name, self.address, self.chain_id)
    }
}

impl Serialize for IdentityKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
