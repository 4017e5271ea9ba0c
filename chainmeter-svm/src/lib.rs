#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Solana support for chainmeter.
//!
//! - [`account`] - Account execution contexts and program naming
//!
//! The well-known network table is re-exported at the crate root as
//! [`SOLANA_NETWORKS`].
//!
//! # Feature Flags
//!
//! - `telemetry` - Tracing instrumentation
//!
//! # Example
//!
//! ```ignore
//! use chainmeter_svm::account::account_context;
//!
//! let ctx = account_context(&pubkey);
//! ctx.meter().gauge("balance").record(lamports, Labels::new())?;
//! ```

pub mod account;

mod networks;
pub use networks::*;
