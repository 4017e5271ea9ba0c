//! EVM chain id helpers.

use chainmeter::chain::{ChainId, EIP155_NAMESPACE};

/// An EIP-155 chain ID (e.g., 1 for Ethereum, 137 for Polygon).
pub type Eip155ChainId = u64;

/// Formats a chain ID as a CAIP-2 identifier.
///
/// Example: `caip2(137)` returns `eip155:137`.
#[must_use]
pub fn caip2(chain_id: Eip155ChainId) -> ChainId {
    ChainId::eip155(chain_id)
}

/// Parses a CAIP-2 identifier into an EIP-155 chain ID.
///
/// Returns `None` if the input is not a valid `eip155:` prefixed string.
#[must_use]
pub fn parse_caip2(caip: &str) -> Option<Eip155ChainId> {
    caip.strip_prefix(EIP155_NAMESPACE)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|s| s.parse().ok())
}
