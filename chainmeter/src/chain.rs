//! Chain identifiers.
//!
//! - [`ChainId`] - A CAIP-2 compliant chain identifier (e.g., `eip155:1` for Ethereum)
//!
//! Chain ids are the canonical form every network identifier is resolved to
//! before it participates in an [`IdentityKey`](crate::binds::IdentityKey).

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// CAIP-2 namespace for EIP-155 (EVM) chains.
pub const EIP155_NAMESPACE: &str = "eip155";

/// CAIP-2 namespace for Solana clusters.
pub const SOLANA_NAMESPACE: &str = "solana";

/// A CAIP-2 compliant blockchain identifier.
///
/// The format is `namespace:reference` where:
///
/// - `namespace` identifies the blockchain family (e.g., `eip155`, `solana`)
/// - `reference` identifies the specific chain within that family
///
/// # Serialization
///
/// Serializes to/from a colon-separated string: `"eip155:1"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId {
    namespace: String,
    reference: String,
}

impl ChainId {
    /// Creates a new chain ID from namespace and reference components.
    pub fn new<N: Into<String>, R: Into<String>>(namespace: N, reference: R) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Creates an EIP-155 chain ID from a numeric chain id.
    #[must_use]
    pub fn eip155(chain_id: u64) -> Self {
        Self::new(EIP155_NAMESPACE, chain_id.to_string())
    }

    /// Returns the namespace component of the chain ID.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the reference component of the chain ID.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the numeric EIP-155 chain id, if this is an EVM chain.
    #[must_use]
    pub fn as_eip155(&self) -> Option<u64> {
        if self.namespace == EIP155_NAMESPACE {
            self.reference.parse().ok()
        } else {
            None
        }
    }

    /// Consumes the chain ID and returns its (namespace, reference) components.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.namespace, self.reference)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.to_string()
    }
}

/// Error returned when parsing an invalid chain ID string.
///
/// A valid chain ID must be in the format `namespace:reference` where both
/// components are non-empty strings.
#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id format {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, reference)) if !namespace.is_empty() && !reference.is_empty() => {
                Ok(Self::new(namespace, reference))
            }
            _ => Err(ChainIdFormatError(s.into())),
        }
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_serialize_eip155() {
        let chain_id = ChainId::eip155(1);
        let serialized = serde_json::to_string(&chain_id).unwrap();
        assert_eq!(serialized, "\"eip155:1\"");
    }

    #[test]
    fn test_chain_id_deserialize_solana() {
        let chain_id: ChainId =
            serde_json::from_str("\"solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp\"").unwrap();
        assert_eq!(chain_id.namespace(), "solana");
        assert_eq!(chain_id.reference(), "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp");
        assert_eq!(chain_id.as_eip155(), None);
    }

    #[test]
    fn test_chain_id_deserialize_invalid_format() {
        assert!(serde_json::from_str::<ChainId>("\"invalid\"").is_err());
        assert!(serde_json::from_str::<ChainId>("\":1\"").is_err());
        assert!(serde_json::from_str::<ChainId>("\"eip155:\"").is_err());
    }

    #[test]
    fn test_as_eip155() {
        assert_eq!(ChainId::eip155(137).as_eip155(), Some(137));
        assert_eq!(ChainId::new("eip155", "abc").as_eip155(), None);
    }
}
