//! Execution contexts metrics are recorded under.
//!
//! An [`ExecutionContext`] is either a chain-log scope (an EVM log or block
//! seen through a bound contract) or an account scope (a Solana account).
//! Each context owns the counter and gauge buffers its [`Meter`] appends to;
//! the runtime drains them after every processing unit.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::meter::{CounterResult, GaugeResult, Meter};

/// Chain identifier stamped on every record produced under an account context.
pub const ACCOUNT_CHAIN_ID: &str = "SOL:mainnet";

/// A bound contract view, as far as metric attribution is concerned.
pub trait ContractView: Debug + Send + Sync {
    /// The raw contract address records are attributed to.
    fn address(&self) -> String;
}

impl ContractView for String {
    fn address(&self) -> String {
        self.clone()
    }
}

/// Position of a log within the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Block the log was emitted in.
    pub block_number: u64,
    /// Index of the emitting transaction within the block.
    pub transaction_index: u32,
    /// Index of the log within the block.
    pub log_index: u32,
}

/// A block header, reduced to what metrics need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Block number.
    pub number: u64,
    /// Block timestamp in seconds, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl BlockRecord {
    /// Creates a block record without a timestamp.
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self {
            number,
            timestamp: None,
        }
    }
}

/// Append-only counter and gauge buffers.
///
/// Appends are serialized by a mutex per buffer, so recording from several
/// threads into one context keeps every record intact.
#[derive(Debug, Default)]
pub struct MetricBuffers {
    counters: Mutex<Vec<CounterResult>>,
    gauges: Mutex<Vec<GaugeResult>>,
}

// A push cannot leave a Vec half-written, so a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MetricBuffers {
    pub(crate) fn push_counter(&self, record: CounterResult) {
        lock(&self.counters).push(record);
    }

    pub(crate) fn push_gauge(&self, record: GaugeResult) {
        lock(&self.gauges).push(record);
    }

    /// Returns a copy of the buffered counters, in recording order.
    #[must_use]
    pub fn counters(&self) -> Vec<CounterResult> {
        lock(&self.counters).clone()
    }

    /// Returns a copy of the buffered gauges, in recording order.
    #[must_use]
    pub fn gauges(&self) -> Vec<GaugeResult> {
        lock(&self.gauges).clone()
    }

    /// Removes and returns the buffered counters.
    pub fn take_counters(&self) -> Vec<CounterResult> {
        std::mem::take(&mut *lock(&self.counters))
    }

    /// Removes and returns the buffered gauges.
    pub fn take_gauges(&self) -> Vec<GaugeResult> {
        std::mem::take(&mut *lock(&self.gauges))
    }
}

/// A log or block observed through a bound contract.
#[derive(Debug)]
pub struct ChainLogContext {
    /// Numeric EIP-155 chain id.
    pub chain_id: u64,
    /// The contract the handler is bound to.
    pub contract: Arc<dyn ContractView>,
    /// The log being processed, if this is a log handler.
    pub log: Option<LogRecord>,
    /// The block being processed.
    pub block: Option<BlockRecord>,
    buffers: MetricBuffers,
}

impl ChainLogContext {
    /// Creates a context. When both are present the log takes precedence.
    #[must_use]
    pub fn new(
        chain_id: u64,
        contract: Arc<dyn ContractView>,
        block: Option<BlockRecord>,
        log: Option<LogRecord>,
    ) -> Self {
        Self {
            chain_id,
            contract,
            log,
            block,
            buffers: MetricBuffers::default(),
        }
    }

    /// Creates a log-scoped context.
    #[must_use]
    pub fn for_log(chain_id: u64, contract: Arc<dyn ContractView>, log: LogRecord) -> Self {
        Self::new(chain_id, contract, None, Some(log))
    }

    /// Creates a block-scoped context.
    #[must_use]
    pub fn for_block(chain_id: u64, contract: Arc<dyn ContractView>, block: BlockRecord) -> Self {
        Self::new(chain_id, contract, Some(block), None)
    }

    /// Block number of the log, or of the block when there is no log.
    #[must_use]
    pub fn block_number(&self) -> Option<u64> {
        self.log
            .map(|log| log.block_number)
            .or_else(|| self.block.map(|block| block.number))
    }
}

/// A Solana account.
#[derive(Debug)]
pub struct AccountContext {
    /// Account address (base58).
    pub address: String,
    buffers: MetricBuffers,
}

impl AccountContext {
    /// Creates a context for an account.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            buffers: MetricBuffers::default(),
        }
    }
}

/// The scope a handler runs in.
#[derive(Debug)]
pub enum ExecutionContext {
    /// EVM log or block.
    ChainLog(ChainLogContext),
    /// Solana account.
    Account(AccountContext),
}

impl ExecutionContext {
    /// Returns a meter recording into this context.
    #[must_use]
    pub const fn meter(&self) -> Meter<'_> {
        Meter::new(self)
    }

    /// Returns this context's metric buffers.
    #[must_use]
    pub const fn buffers(&self) -> &MetricBuffers {
        match self {
            Self::ChainLog(ctx) => &ctx.buffers,
            Self::Account(ctx) => &ctx.buffers,
        }
    }

    /// Returns a copy of the buffered counters.
    #[must_use]
    pub fn counters(&self) -> Vec<CounterResult> {
        self.buffers().counters()
    }

    /// Returns a copy of the buffered gauges.
    #[must_use]
    pub fn gauges(&self) -> Vec<GaugeResult> {
        self.buffers().gauges()
    }

    /// Drains the buffered counters for export.
    pub fn take_counters(&self) -> Vec<CounterResult> {
        self.buffers().take_counters()
    }

    /// Drains the buffered gauges for export.
    pub fn take_gauges(&self) -> Vec<GaugeResult> {
        self.buffers().take_gauges()
    }
}

impl From<ChainLogContext> for ExecutionContext {
    fn from(ctx: ChainLogContext) -> Self {
        Self::ChainLog(ctx)
    }
}

impl From<AccountContext> for ExecutionContext {
    fn from(ctx: AccountContext) -> Self {
        Self::Account(ctx)
    }
}
