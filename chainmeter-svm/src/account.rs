//! Solana accounts as execution contexts and binding identities.

use chainmeter::binds::Binder;
use chainmeter::context::{AccountContext, ExecutionContext};
use chainmeter::error::BindError;
use chainmeter::networks::{Network, NetworkResolver};
use solana_pubkey::Pubkey;

use crate::networks::solana_mainnet;

/// Creates an execution context for a Solana account.
#[must_use]
pub fn account_context(account: &Pubkey) -> ExecutionContext {
    AccountContext::new(account.to_string()).into()
}

/// Returns the display name of a program bound under `idl_name`.
///
/// Unlike EVM bindings, a missing network means Solana mainnet rather than
/// the binder's default network.
///
/// # Errors
///
/// Returns [`BindError::UnresolvableNetwork`] if the network is unknown.
pub fn program_name<P: ?Sized, C: ?Sized, R: NetworkResolver>(
    binder: &Binder<P, C, R>,
    idl_name: &str,
    program_id: &Pubkey,
    network: Option<&Network>,
    name: Option<&str>,
) -> Result<String, BindError> {
    let mainnet = Network::Chain(solana_mainnet());
    let network = network.unwrap_or(&mainnet);
    let name = binder.contract_name(idl_name, name, &program_id.to_string(), Some(network))?;

    #[cfg(feature = "telemetry")]
    tracing::debug!(idl = idl_name, program = %program_id, name = %name, "Named Solana program");

    Ok(name)
}
