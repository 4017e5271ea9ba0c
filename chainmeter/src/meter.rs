//! Metric recording.
//!
//! - [`derive_metadata`] - Attributes a record to the active context
//! - [`Meter`] - Stateless factory handed out by an [`ExecutionContext`]
//! - [`Counter`] / [`Gauge`] - Append records to the context's buffers
//!
//! # Example
//!
//! ```ignore
//! let meter = ctx.meter();
//! meter.counter("transfers").add(1u64, Labels::new())?;
//! meter.gauge("balance").record(balance, labels)?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::{ACCOUNT_CHAIN_ID, ExecutionContext};
use crate::error::MeterError;
use crate::numberish::{MetricValue, Numberish, to_metric_value};

/// Metric labels. Ordered so equal label sets compare and serialize equally.
pub type Labels = BTreeMap<String, String>;

/// Sentinel index for block-level records that have no transaction or log.
pub const NO_INDEX: i64 = -1;

/// Where a record belongs: contract, chain position, metric name and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// Contract (or account) address.
    pub contract_address: String,
    /// Block number, `0` for account contexts.
    pub block_number: u64,
    /// Transaction index, [`NO_INDEX`] for block-level records.
    pub transaction_index: i64,
    /// Log index, [`NO_INDEX`] for block-level records.
    pub log_index: i64,
    /// Chain identifier.
    pub chain_id: String,
    /// Metric name.
    pub name: String,
    /// Metric labels.
    pub labels: Labels,
}

/// Kind of handler that produced a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandlerType {
    /// Not known.
    #[default]
    Unknown,
    /// EVM log handler.
    EthLog,
    /// EVM block handler.
    EthBlock,
    /// Solana instruction handler.
    SolInstruction,
}

/// Runtime details the host attaches to a record after it is buffered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Handler the record came from.
    pub from: HandlerType,
}

/// A buffered counter observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterResult {
    /// Attribution.
    pub metadata: RecordMetadata,
    /// Amount.
    pub metric_value: MetricValue,
    /// `true` to increment, `false` to decrement.
    pub add: bool,
    /// Left unset here; filled in by the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_info: Option<RuntimeInfo>,
}

/// A buffered gauge observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeResult {
    /// Attribution.
    pub metadata: RecordMetadata,
    /// Observed value.
    pub metric_value: MetricValue,
    /// Left unset here; filled in by the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_info: Option<RuntimeInfo>,
}

/// Derives the metadata of a record named `name` under `ctx`.
///
/// - chain-log with a log: position of the log
/// - chain-log with only a block: block number, indices [`NO_INDEX`]
/// - account: block `0`, indices `0`, chain [`ACCOUNT_CHAIN_ID`]
///
/// # Errors
///
/// Returns [`MeterError::UnsupportedContextVariant`] for a chain-log context
/// with neither a log nor a block.
pub fn derive_metadata(
    ctx: &ExecutionContext,
    name: &str,
    labels: Labels,
) -> Result<RecordMetadata, MeterError> {
    match ctx {
        ExecutionContext::ChainLog(ctx) => {
            let (block_number, transaction_index, log_index) = match (ctx.log, ctx.block) {
                (Some(log), _) => (
                    log.block_number,
                    i64::from(log.transaction_index),
                    i64::from(log.log_index),
                ),
                (None, Some(block)) => (block.number, NO_INDEX, NO_INDEX),
                (None, None) => {
                    return Err(MeterError::UnsupportedContextVariant(
                        "chain-log context has neither log nor block",
                    ));
                }
            };
            Ok(RecordMetadata {
                contract_address: ctx.contract.address(),
                block_number,
                transaction_index,
                log_index,
                chain_id: ctx.chain_id.to_string(),
                name: name.to_owned(),
                labels,
            })
        }
        ExecutionContext::Account(ctx) => Ok(RecordMetadata {
            contract_address: ctx.address.clone(),
            block_number: 0,
            transaction_index: 0,
            log_index: 0,
            chain_id: ACCOUNT_CHAIN_ID.to_owned(),
            name: name.to_owned(),
            labels,
        }),
    }
}

fn derive_or_log(
    ctx: &ExecutionContext,
    name: &str,
    labels: Labels,
) -> Result<RecordMetadata, MeterError> {
    let result = derive_metadata(ctx, name, labels);
    #[cfg(feature = "telemetry")]
    if let Err(err) = &result {
        tracing::warn!(metric = name, error = %err, "Dropped metric record");
    }
    result
}

/// Hands out counters and gauges bound to one context.
///
/// Every call returns a new front-end object; two counters with the same
/// name are independent values writing into the same buffers.
#[derive(Debug, Clone, Copy)]
pub struct Meter<'a> {
    ctx: &'a ExecutionContext,
}

impl<'a> Meter<'a> {
    /// Creates a meter for `ctx`.
    #[must_use]
    pub const fn new(ctx: &'a ExecutionContext) -> Self {
        Self { ctx }
    }

    /// Returns a counter named `name`.
    pub fn counter(&self, name: impl Into<String>) -> Counter<'a> {
        Counter {
            name: name.into(),
            ctx: self.ctx,
        }
    }

    /// Returns a gauge named `name`.
    pub fn gauge(&self, name: impl Into<String>) -> Gauge<'a> {
        Gauge {
            name: name.into(),
            ctx: self.ctx,
        }
    }
}

/// Records increments and decrements.
#[derive(Debug, Clone)]
pub struct Counter<'a> {
    name: String,
    ctx: &'a ExecutionContext,
}

impl Counter<'_> {
    /// Returns the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records an increment of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`MeterError`] if the context cannot attribute the record;
    /// nothing is buffered in that case.
    pub fn add(&self, value: impl Into<Numberish>, labels: Labels) -> Result<(), MeterError> {
        self.record(value.into(), labels, true)
    }

    /// Records a decrement of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`MeterError`] if the context cannot attribute the record;
    /// nothing is buffered in that case.
    pub fn sub(&self, value: impl Into<Numberish>, labels: Labels) -> Result<(), MeterError> {
        self.record(value.into(), labels, false)
    }

    fn record(&self, value: Numberish, labels: Labels, add: bool) -> Result<(), MeterError> {
        let metadata = derive_or_log(self.ctx, &self.name, labels)?;
        self.ctx.buffers().push_counter(CounterResult {
            metadata,
            metric_value: to_metric_value(value),
            add,
            runtime_info: None,
        });
        Ok(())
    }
}

/// Records point-in-time values.
#[derive(Debug, Clone)]
pub struct Gauge<'a> {
    name: String,
    ctx: &'a ExecutionContext,
}

impl Gauge<'_> {
    /// Returns the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records `value`.
    ///
    /// # Errors
    ///
    /// Returns [`MeterError`] if the context cannot attribute the record;
    /// nothing is buffered in that case.
    pub fn record(&self, value: impl Into<Numberish>, labels: Labels) -> Result<(), MeterError> {
        let metadata = derive_or_log(self.ctx, &self.name, labels)?;
        self.ctx.buffers().push_gauge(GaugeResult {
            metadata,
            metric_value: to_metric_value(value),
            runtime_info: None,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::context::{AccountContext, BlockRecord, ChainLogContext, ContractView, LogRecord};

    fn contract() -> Arc<dyn ContractView> {
        Arc::new("0xABC".to_owned())
    }

    const LOG: LogRecord = LogRecord {
        block_number: 100,
        transaction_index: 2,
        log_index: 5,
    };

    fn log_ctx() -> ExecutionContext {
        ChainLogContext::for_log(1, contract(), LOG).into()
    }

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_metadata_from_log() {
        let metadata = derive_metadata(&log_ctx(), "transfers", Labels::new()).unwrap();
        assert_eq!(
            metadata,
            RecordMetadata {
                contract_address: "0xABC".into(),
                block_number: 100,
                transaction_index: 2,
                log_index: 5,
                chain_id: "1".into(),
                name: "transfers".into(),
                labels: Labels::new(),
            }
        );
    }

    #[test]
    fn test_metadata_from_block() {
        let ctx: ExecutionContext =
            ChainLogContext::for_block(1, contract(), BlockRecord::new(100)).into();
        let metadata = derive_metadata(&ctx, "transfers", Labels::new()).unwrap();
        assert_eq!(metadata.block_number, 100);
        assert_eq!(metadata.transaction_index, NO_INDEX);
        assert_eq!(metadata.log_index, NO_INDEX);
        assert_eq!(metadata.contract_address, "0xABC");
        assert_eq!(metadata.chain_id, "1");
    }

    #[test]
    fn test_metadata_from_account() {
        let ctx: ExecutionContext = AccountContext::new("Sol111").into();
        let metadata = derive_metadata(&ctx, "balance", labels(&[("token", "SOL")])).unwrap();
        assert_eq!(
            metadata,
            RecordMetadata {
                contract_address: "Sol111".into(),
                block_number: 0,
                transaction_index: 0,
                log_index: 0,
                chain_id: "SOL:mainnet".into(),
                name: "balance".into(),
                labels: labels(&[("token", "SOL")]),
            }
        );
    }

    #[test]
    fn test_metadata_without_scope_fails() {
        let ctx: ExecutionContext = ChainLogContext::new(1, contract(), None, None).into();
        let err = derive_metadata(&ctx, "transfers", Labels::new()).unwrap_err();
        assert!(matches!(err, MeterError::UnsupportedContextVariant(_)));
    }

    #[test]
    fn test_counter_and_gauge_append_in_order() {
        let ctx = log_ctx();
        let meter = ctx.meter();
        meter.counter("c").add(1u64, Labels::new()).unwrap();
        meter.gauge("g").record(2u64, Labels::new()).unwrap();

        let counters = ctx.counters();
        let gauges = ctx.gauges();
        assert_eq!(counters.len(), 1);
        assert_eq!(gauges.len(), 1);
        assert_eq!(counters[0].metadata.name, "c");
        assert_eq!(counters[0].metric_value, MetricValue::BigInteger("1".into()));
        assert!(counters[0].add);
        assert!(counters[0].runtime_info.is_none());
        assert_eq!(gauges[0].metadata.name, "g");
        assert_eq!(gauges[0].metadata.log_index, 5);
        assert_eq!(gauges[0].metric_value, MetricValue::BigInteger("2".into()));
    }

    #[test]
    fn test_counters_are_not_memoized() {
        let ctx = log_ctx();
        let meter = ctx.meter();
        let first = meter.counter("c");
        let second = meter.counter("c");
        first.add(1u8, Labels::new()).unwrap();
        second.sub(2.5f64, labels(&[("side", "sell")])).unwrap();
        first.add(3u8, Labels::new()).unwrap();

        let counters = ctx.take_counters();
        let adds: Vec<bool> = counters.iter().map(|c| c.add).collect();
        assert_eq!(adds, [true, false, true]);
        assert_eq!(counters[1].metric_value, MetricValue::DoubleValue(2.5));
        assert_eq!(counters[1].metadata.labels, labels(&[("side", "sell")]));
        assert!(ctx.counters().is_empty());
    }

    #[test]
    fn test_failed_record_is_not_buffered() {
        let ctx: ExecutionContext = ChainLogContext::new(1, contract(), None, None).into();
        assert!(ctx.meter().counter("c").add(1u8, Labels::new()).is_err());
        assert!(ctx.meter().gauge("g").record(1u8, Labels::new()).is_err());
        assert!(ctx.counters().is_empty());
        assert!(ctx.gauges().is_empty());
    }

    #[test]
    fn test_concurrent_appends_keep_every_record() {
        let ctx = log_ctx();
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let counter = ctx.meter().counter("c");
                    for i in 0..25u32 {
                        counter.add(i, Labels::new()).unwrap();
                    }
                });
            }
        });
        assert_eq!(ctx.counters().len(), 100);
    }

    #[test]
    fn test_counter_wire_shape() {
        let ctx = log_ctx();
        ctx.meter().counter("c").add(1u8, Labels::new()).unwrap();
        let json = serde_json::to_value(&ctx.counters()[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "metadata": {
                    "contractAddress": "0xABC",
                    "blockNumber": 100,
                    "transactionIndex": 2,
                    "logIndex": 5,
                    "chainId": "1",
                    "name": "c",
                    "labels": {},
                },
                "metricValue": { "bigInteger": "1" },
                "add": true,
            })
        );
    }
}
