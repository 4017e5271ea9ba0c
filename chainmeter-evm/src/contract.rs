//! Bound EVM contracts.

use std::sync::Arc;

use alloy_primitives::Address;
use chainmeter::binds::{Binder, IdentityKey};
use chainmeter::context::{
    BlockRecord, ChainLogContext, ContractView, ExecutionContext, LogRecord,
};
use chainmeter::error::BindError;
use chainmeter::networks::{Network, NetworkResolver, UnresolvableNetwork};

use crate::chain::Eip155ChainId;

/// A contract instance bound under a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmContract {
    /// ABI the contract implements.
    pub abi_name: String,
    /// Display name.
    pub name: String,
    /// Contract address.
    pub address: Address,
    /// Chain the contract lives on.
    pub chain_id: Eip155ChainId,
}

impl ContractView for EvmContract {
    /// EIP-55 checksummed address.
    fn address(&self) -> String {
        self.address.to_checksum(None)
    }
}

impl EvmContract {
    /// Returns the contract cached for this identity, binding it first if
    /// needed.
    ///
    /// The display name comes from the binder's name registry, so an explicit
    /// `name` only applies if the identity has not been named before.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the network is unknown or
    /// is not an EVM chain.
    pub fn bind<P: ?Sized, R: NetworkResolver>(
        binder: &Binder<P, Self, R>,
        abi_name: &str,
        address: Address,
        network: Option<&Network>,
        name: Option<&str>,
    ) -> Result<Arc<Self>, BindError> {
        let address_str = address.to_string();
        binder.contract_or_try_insert_with(
            abi_name,
            &address_str,
            network,
            |key: &IdentityKey| -> Result<Arc<Self>, BindError> {
                let chain_id = key.chain_id().as_eip155().ok_or_else(|| {
                    let network = network.unwrap_or(&binder.config().default_network);
                    UnresolvableNetwork::new(network)
                })?;
                let name = binder.contract_name(abi_name, name, &address_str, network)?;

                #[cfg(feature = "telemetry")]
                tracing::debug!(abi = abi_name, %address, chain_id, name = %name, "Bound EVM contract");

                Ok(Arc::new(Self {
                    abi_name: abi_name.to_owned(),
                    name,
                    address,
                    chain_id,
                }))
            },
        )
    }

    /// Creates a log-scoped execution context for this contract.
    #[must_use]
    pub fn log_context(self: &Arc<Self>, log: LogRecord) -> ExecutionContext {
        let view: Arc<dyn ContractView> = Arc::<Self>::clone(self);
        ChainLogContext::for_log(self.chain_id, view, log).into()
    }

    /// Creates a block-scoped execution context for this contract.
    #[must_use]
    pub fn block_context(self: &Arc<Self>, block: BlockRecord) -> ExecutionContext {
        let view: Arc<dyn ContractView> = Arc::<Self>::clone(self);
        ChainLogContext::for_block(self.chain_id, view, block).into()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use chainmeter::config::BindConfig;
    use chainmeter::meter::{Labels, derive_metadata};
    use chainmeter::networks::{NetworkInfo, NetworkRegistry};

    use super::*;
    use crate::EVM_NETWORKS;

    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    static WITH_SOLANA: &[NetworkInfo] = &[NetworkInfo {
        name: "solana",
        namespace: "solana",
        reference: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
    }];

    fn binder() -> Binder<(), EvmContract> {
        Binder::new(
            NetworkRegistry::from_networks(EVM_NETWORKS).with_networks(WITH_SOLANA),
            BindConfig::default(),
        )
    }

    #[test]
    fn test_bind_caches_by_identity() {
        let binder = binder();
        let first = EvmContract::bind(&binder, "ERC20", USDC, None, Some("usdc")).unwrap();
        let again =
            EvmContract::bind(&binder, "ERC20", USDC, Some(&"homestead".into()), None).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(first.name, "usdc");
        assert_eq!(first.chain_id, 1);

        let polygon =
            EvmContract::bind(&binder, "ERC20", USDC, Some(&"polygon".into()), None).unwrap();
        assert_eq!(polygon.name, "ERC20_0");
        assert_eq!(polygon.chain_id, 137);
    }

    #[test]
    fn test_bind_rejects_non_evm_network() {
        let binder = binder();
        let err = EvmContract::bind(&binder, "ERC20", USDC, Some(&"solana".into()), None)
            .unwrap_err();
        assert!(matches!(err, BindError::UnresolvableNetwork(_)));
        assert!(binder.state().contracts().is_empty());
    }

    #[test]
    fn test_concurrent_first_binds_share_one_contract() {
        let binder = binder();
        let bound: Vec<Arc<EvmContract>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| EvmContract::bind(&binder, "ERC20", USDC, None, None)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });
        assert!(bound.iter().all(|c| Arc::ptr_eq(c, &bound[0])));
        assert_eq!(bound[0].name, "ERC20_0");
        assert_eq!(binder.state().contracts().len(), 1);
        assert_eq!(binder.names().len(), 1);
    }

    #[test]
    fn test_log_context_uses_checksummed_address() {
        let binder = binder();
        let contract = EvmContract::bind(&binder, "ERC20", USDC, None, None).unwrap();
        let ctx = contract.log_context(LogRecord {
            block_number: 100,
            transaction_index: 2,
            log_index: 5,
        });
        let metadata = derive_metadata(&ctx, "transfers", Labels::new()).unwrap();
        assert_eq!(
            metadata.contract_address,
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
        );
        assert_eq!(metadata.chain_id, "1");

        let ctx = contract.block_context(BlockRecord::new(7));
        let metadata = derive_metadata(&ctx, "blocks", Labels::new()).unwrap();
        assert_eq!(metadata.block_number, 7);
        assert_eq!(metadata.log_index, -1);
    }
}
