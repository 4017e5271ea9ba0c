//! Conversions from alloy RPC types into context records.

use alloy_rpc_types_eth::{Header, Log};
use chainmeter::context::{BlockRecord, LogRecord};

/// Error converting an RPC log into a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RpcRecordError {
    /// The log is pending and lacks a position field.
    #[error("log is missing {0}")]
    MissingField(&'static str),
    /// An index does not fit the record's index type.
    #[error("{0} out of range")]
    IndexOutOfRange(&'static str),
}

fn index(value: Option<u64>, field: &'static str) -> Result<u32, RpcRecordError> {
    let value = value.ok_or(RpcRecordError::MissingField(field))?;
    u32::try_from(value).map_err(|_| RpcRecordError::IndexOutOfRange(field))
}

/// Extracts the chain position of a mined log.
///
/// # Errors
///
/// Returns [`RpcRecordError`] for pending logs or out-of-range indices.
pub fn log_record<T>(log: &Log<T>) -> Result<LogRecord, RpcRecordError> {
    Ok(LogRecord {
        block_number: log
            .block_number
            .ok_or(RpcRecordError::MissingField("block_number"))?,
        transaction_index: index(log.transaction_index, "transaction_index")?,
        log_index: index(log.log_index, "log_index")?,
    })
}

/// Extracts number and timestamp from a block header.
#[must_use]
pub fn block_record(header: &Header) -> BlockRecord {
    BlockRecord {
        number: header.inner.number,
        timestamp: Some(header.inner.timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mined_log() {
        let log: Log = Log {
            block_number: Some(100),
            transaction_index: Some(2),
            log_index: Some(5),
            ..Log::default()
        };
        assert_eq!(
            log_record(&log).unwrap(),
            LogRecord {
                block_number: 100,
                transaction_index: 2,
                log_index: 5,
            }
        );
    }

    #[test]
    fn test_pending_log() {
        let log: Log = Log {
            transaction_index: Some(2),
            log_index: Some(5),
            ..Log::default()
        };
        assert_eq!(
            log_record(&log),
            Err(RpcRecordError::MissingField("block_number"))
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let log: Log = Log {
            block_number: Some(1),
            transaction_index: Some(u64::MAX),
            log_index: Some(0),
            ..Log::default()
        };
        assert_eq!(
            log_record(&log),
            Err(RpcRecordError::IndexOutOfRange("transaction_index"))
        );
    }
}
