#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Contract binding registry and metric record derivation for blockchain
//! event processors.
//!
//! This crate sits between a processor's handlers and the runtime that
//! ships their output. It is chain-agnostic; chain-specific network tables
//! and conversions live in separate crates.
//!
//! # Overview
//!
//! Binding a contract yields a stable display name and a cache slot keyed by
//! the contract's identity (ABI name, lower-cased address, resolved chain).
//! While handling an event, code obtains a [`Meter`](meter::Meter) from the
//! [`ExecutionContext`](context::ExecutionContext) and records counters and
//! gauges; each record's metadata is derived from the context and buffered
//! until the runtime drains it.
//!
//! # Modules
//!
//! - [`binds`] - Identity keys, contract names, processor and contract registries
//! - [`chain`] - CAIP-2 chain identifiers
//! - [`config`] - Binding configuration
//! - [`context`] - Execution contexts and their metric buffers
//! - [`error`] - Error types
//! - [`meter`] - Metadata derivation, meters, counters and gauges
//! - [`networks`] - Network identifiers and resolution
//! - [`numberish`] - Metric value normalization
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod binds;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod meter;
pub mod networks;
pub mod numberish;

pub use binds::{Binder, IdentityKey};
pub use context::ExecutionContext;
pub use error::{BindError, MeterError};
