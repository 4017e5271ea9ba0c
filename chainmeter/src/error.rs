//! Error types for contract binding and metric recording.

use crate::networks::UnresolvableNetwork;

/// Errors raised while computing identity keys or contract names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The binding's network could not be mapped to a chain id.
    #[error("{0}")]
    UnresolvableNetwork(#[from] UnresolvableNetwork),
}

/// Errors raised while deriving metric record metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MeterError {
    /// The execution context carries no scope a record can be attributed to.
    ///
    /// Raised for a chain-log context that has neither a log nor a block.
    #[error("unsupported context variant: {0}")]
    UnsupportedContextVariant(&'static str),
}

/// Errors raised while loading a [`BindConfig`](crate::config::BindConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_error_is_copy() {
        let err = MeterError::UnsupportedContextVariant("ChainLog");
        let copied = err;
        assert_eq!(err, copied);
        assert_eq!(err.to_string(), "unsupported context variant: ChainLog");
    }
}
