#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-155 (EVM) support for chainmeter.
//!
//! # Modules
//!
//! - [`chain`] - EIP-155 chain id helpers
//! - [`contract`] - [`EvmContract`], a bound contract and its execution contexts
//! - `rpc` - Conversions from alloy RPC logs and headers (feature `rpc`)
//!
//! The well-known network table is re-exported at the crate root as
//! [`EVM_NETWORKS`].
//!
//! # Feature Flags
//!
//! - `rpc` - Conversions from `alloy-rpc-types-eth`
//! - `telemetry` - Tracing instrumentation
//!
//! # Example
//!
//! ```ignore
//! use chainmeter::networks::NetworkRegistry;
//! use chainmeter_evm::{EVM_NETWORKS, EvmContract};
//!
//! let binder = Binder::new(NetworkRegistry::from_networks(EVM_NETWORKS), config);
//! let usdc = EvmContract::bind(&binder, "ERC20", address, None, Some("usdc"))?;
//! let ctx = usdc.log_context(rpc::log_record(&log)?);
//! ctx.meter().counter("transfers").add(1u64, Labels::new())?;
//! ```

pub mod chain;
pub mod contract;
#[cfg(feature = "rpc")]
pub mod rpc;

mod networks;
pub use networks::*;

pub use contract::EvmContract;
