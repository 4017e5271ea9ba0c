//! Contract binding: identity keys, display names and shared registries.
//!
//! - [`IdentityKey`] - Canonical `(abi, address, chain)` identity
//! - [`ContractNamer`] / [`NameRegistry`] - Deterministic display names
//! - [`Registry`] / [`ProcessorState`] - Shared processor and contract caches
//! - [`BindOptions`] - Processor binding options and their signature
//! - [`Binder`] - The service tying these together, passed to every binding call site

mod key;
mod namer;
mod names;
mod options;
mod registry;

pub use key::IdentityKey;
pub use namer::ContractNamer;
pub use names::NameRegistry;
pub use options::BindOptions;
pub use registry::{ContractRegistry, ProcessorRegistry, ProcessorState, Registry};

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::config::BindConfig;
use crate::error::BindError;
use crate::networks::{Network, NetworkRegistry, NetworkResolver};

/// Binding service owning the name registry and the processor state.
///
/// Construct one at startup and share it by reference. `P` is the processor
/// type and `C` the contract wrapper type; either may be a trait object.
///
/// # Example
///
/// ```ignore
/// use chainmeter::binds::Binder;
/// use chainmeter::config::BindConfig;
///
/// let binder: Binder<dyn Processor, EvmContract> =
///     Binder::new(networks, BindConfig::default());
/// let name = binder.contract_name("ERC20", None, "0xA0b8...", None)?;
/// ```
pub struct Binder<P: ?Sized, C: ?Sized, R = NetworkRegistry> {
    resolver: R,
    config: BindConfig,
    names: NameRegistry,
    state: ProcessorState<P, C>,
}

impl<P: ?Sized, C: ?Sized, R: NetworkResolver> Binder<P, C, R> {
    /// Creates a binder with empty registries.
    #[must_use]
    pub fn new(resolver: R, config: BindConfig) -> Self {
        let names = NameRegistry::new(config.name_sequence_start);
        Self {
            resolver,
            config,
            names,
            state: ProcessorState::new(),
        }
    }

    /// Returns the network resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Returns the name registry.
    #[must_use]
    pub const fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// Returns the shared processor state.
    #[must_use]
    pub const fn state(&self) -> &ProcessorState<P, C> {
        &self.state
    }

    fn network_or_default<'a>(&'a self, network: Option<&'a Network>) -> &'a Network {
        network.unwrap_or(&self.config.default_network)
    }

    /// Computes the identity key of a contract.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the network is unknown.
    pub fn identity_key(
        &self,
        abi_name: &str,
        address: &str,
        network: Option<&Network>,
    ) -> Result<IdentityKey, BindError> {
        let network = self.network_or_default(network);
        Ok(IdentityKey::derive(
            &self.resolver,
            abi_name,
            address,
            network,
        )?)
    }

    /// Returns the display name of a contract, assigning one on first use.
    ///
    /// The first name recorded for an identity wins. Otherwise `contract_name`
    /// is used if given, else the ABI's next generated name.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the network is unknown.
    pub fn contract_name(
        &self,
        abi_name: &str,
        contract_name: Option<&str>,
        address: &str,
        network: Option<&Network>,
    ) -> Result<String, BindError> {
        let key = self.identity_key(abi_name, address, network)?;
        Ok(self.names.resolve(key, contract_name))
    }

    fn processor_key(&self, abi_name: &str, opts: &BindOptions) -> Result<String, BindError> {
        let signature = opts.signature(&self.resolver, &self.config.default_network)?;
        Ok(format!("{abi_name}_{signature}"))
    }

    /// Looks up the processor bound for `abi_name` with `opts`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the options' network is unknown.
    pub fn processor(
        &self,
        abi_name: &str,
        opts: &BindOptions,
    ) -> Result<Option<Arc<P>>, BindError> {
        let key = self.processor_key(abi_name, opts)?;
        Ok(self.state.processors().get(&key))
    }

    /// Records the processor bound for `abi_name` with `opts`, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the options' network is unknown.
    pub fn add_processor(
        &self,
        abi_name: &str,
        opts: &BindOptions,
        processor: Arc<P>,
    ) -> Result<(), BindError> {
        let key = self.processor_key(abi_name, opts)?;
        self.state.processors().put(key, processor);
        Ok(())
    }

    /// Looks up the contract wrapper cached for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the network is unknown.
    pub fn contract_by_abi(
        &self,
        abi_name: &str,
        address: &str,
        network: Option<&Network>,
    ) -> Result<Option<Arc<C>>, BindError> {
        let key = self.identity_key(abi_name, address, network)?;
        Ok(self.state.contracts().get(&key))
    }

    /// Caches a contract wrapper for an identity, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] if the network is unknown.
    pub fn add_contract_by_abi(
        &self,
        abi_name: &str,
        address: &str,
        network: Option<&Network>,
        contract: Arc<C>,
    ) -> Result<(), BindError> {
        let key = self.identity_key(abi_name, address, network)?;
        self.state.contracts().put(key, contract);
        Ok(())
    }

    /// Returns the contract wrapper cached for an identity, creating it with
    /// `init` if absent.
    ///
    /// Concurrent first calls for one identity all receive the wrapper built
    /// by whichever call won the entry lock. `init` receives the identity key
    /// and may use the binder's naming, but must not touch the contract
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnresolvableNetwork`] (converted into `E`) if the
    /// network is unknown, or whatever `init` returns.
    pub fn contract_or_try_insert_with<E, F>(
        &self,
        abi_name: &str,
        address: &str,
        network: Option<&Network>,
        init: F,
    ) -> Result<Arc<C>, E>
    where
        E: From<BindError>,
        F: FnOnce(&IdentityKey) -> Result<Arc<C>, E>,
    {
        let key = self.identity_key(abi_name, address, network)?;
        self.state.contracts().get_or_try_insert_with(key, init)
    }
}

impl<P: ?Sized, C: ?Sized, R: Debug> Debug for Binder<P, C, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .field("names", &self.names)
            .field("state", &self.state)
            .finish()
    }
}
