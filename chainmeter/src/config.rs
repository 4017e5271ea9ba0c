//! Binding configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! default_network = "mainnet"
//! name_sequence_start = 1
//! ```
//!
//! # Environment Variables
//!
//! - `CHAINMETER_CONFIG` - Path to configuration file (default: `chainmeter.toml`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::networks::Network;

/// Settings shared by every binding call of a [`Binder`](crate::binds::Binder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Network assumed when a binding does not name one (default: chain `1`).
    #[serde(default)]
    pub default_network: Network,

    /// First sequence number handed out by each ABI's name allocator (default: `0`).
    #[serde(default)]
    pub name_sequence_start: u64,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            default_network: Network::default(),
            name_sequence_start: 0,
        }
    }
}

impl BindConfig {
    /// Loads configuration from the path given by the `CHAINMETER_CONFIG`
    /// environment variable, falling back to `chainmeter.toml` in the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("CHAINMETER_CONFIG").unwrap_or_else(|_| "chainmeter.toml".to_owned());
        Self::load_from(path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = if path.exists() {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };
        let config = Self::from_toml_str(&content)?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            path = %path.display(),
            default_network = %config.default_network,
            name_sequence_start = config.name_sequence_start,
            "Loaded bind configuration"
        );

        Ok(config)
    }

    /// Parses configuration from TOML text after expanding environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(content);
        Ok(toml::from_str(&expanded)?)
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match std::env::var(&var_name) {
            Ok(val) if !var_name.is_empty() => result.push_str(&val),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}
