//! Binding options and their cache signature.

use alloy_primitives::{Keccak256, hex};
use serde::{Deserialize, Serialize};

use crate::networks::{Network, NetworkResolver, UnresolvableNetwork};

/// Options a processor is bound with.
///
/// Two option sets that differ only in address casing or in how the network
/// is spelled produce the same [`signature`](Self::signature).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindOptions {
    /// Contract address.
    pub address: String,

    /// Network the contract lives on. Falls back to the binder's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,

    /// Explicit display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// First block to process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_block: Option<u64>,

    /// Last block to process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_block: Option<u64>,
}

impl BindOptions {
    /// Creates options for an address with everything else unset.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the network.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<Network>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the first block to process.
    #[must_use]
    pub const fn with_start_block(mut self, block: u64) -> Self {
        self.start_block = Some(block);
        self
    }

    /// Sets the last block to process.
    #[must_use]
    pub const fn with_end_block(mut self, block: u64) -> Self {
        self.end_block = Some(block);
        self
    }

    /// Computes a stable signature for these options.
    ///
    /// The network (or `default_network` when unset) is resolved first. Each
    /// field is length-prefixed before hashing with keccak-256, so distinct
    /// option sets cannot collide by concatenation.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvableNetwork`] if the network cannot be resolved.
    pub fn signature<R: NetworkResolver + ?Sized>(
        &self,
        resolver: &R,
        default_network: &Network,
    ) -> Result<String, UnresolvableNetwork> {
        let network = self.network.as_ref().unwrap_or(default_network);
        let chain_id = resolver.resolve(network)?;

        let mut hasher = Keccak256::new();
        write_field(&mut hasher, Some(self.address.to_lowercase().as_bytes()));
        write_field(&mut hasher, Some(chain_id.to_string().as_bytes()));
        write_field(&mut hasher, self.name.as_deref().map(str::as_bytes));
        write_field(
            &mut hasher,
            self.start_block.map(u64::to_be_bytes).as_ref().map(|b| &b[..]),
        );
        write_field(
            &mut hasher,
            self.end_block.map(u64::to_be_bytes).as_ref().map(|b| &b[..]),
        );
        Ok(hex::encode(hasher.finalize()))
    }
}

fn write_field(hasher: &mut Keccak256, field: Option<&[u8]>) {
    match field {
        None => hasher.update([0u8]),
        Some(bytes) => {
            hasher.update([1u8]);
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::{NetworkInfo, NetworkRegistry};

    fn resolver() -> NetworkRegistry {
        NetworkRegistry::from_networks(&[NetworkInfo {
            name: "mainnet",
            namespace: "eip155",
            reference: "1",
        }])
    }

    #[test]
    fn test_signature_is_deterministic() {
        let opts = BindOptions::new("0xAbC").with_start_block(10);
        let a = opts.signature(&resolver(), &Network::Id(1)).unwrap();
        let b = opts.clone().signature(&resolver(), &Network::Id(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_signature_normalizes_network_and_case() {
        let resolver = resolver();
        let a = BindOptions::new("0xABC")
            .with_network("mainnet")
            .signature(&resolver, &Network::Id(5))
            .unwrap();
        let b = BindOptions::new("0xabc")
            .signature(&resolver, &Network::Id(1))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_distinguishes_fields() {
        let resolver = resolver();
        let default = Network::Id(1);
        let base = BindOptions::new("0xabc");
        let sigs = [
            base.clone(),
            base.clone().with_name("x"),
            base.clone().with_start_block(1),
            base.clone().with_end_block(1),
            base.clone().with_network(137u64),
        ]
        .iter()
        .map(|o| o.signature(&resolver, &default).unwrap())
        .collect::<std::collections::HashSet<_>>();
        assert_eq!(sigs.len(), 5);
    }

    #[test]
    fn test_signature_unresolvable_network() {
        let err = BindOptions::new("0xabc")
            .with_network("atlantis")
            .signature(&resolver(), &Network::Id(1))
            .unwrap_err();
        assert_eq!(err.network, "atlantis");
    }

    #[test]
    fn test_options_serde_camel_case() {
        let opts: BindOptions =
            serde_json::from_str(r#"{"address":"0x1","network":1,"startBlock":5}"#).unwrap();
        assert_eq!(opts.network, Some(Network::Id(1)));
        assert_eq!(opts.start_block, Some(5));
        assert_eq!(opts.end_block, None);
    }
}
