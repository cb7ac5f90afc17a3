//! Response hook that purges Stellate after successful handlers.
//!
//! Handlers are registered in a [`PurgeRegistry`] at setup; the
//! [`PurgeInterceptor`] wraps their execution and dispatches the declared
//! purges once they succeed.

pub mod interceptor;

use std::sync::Arc;

pub use interceptor::{HandlerFuture, PurgeInterceptor};
pub use stellate_client::{PurgeClient, PurgeError, PurgeOutcome, Purger};
pub use stellate_core::{HandlerId, PurgeConfig, PurgeRegistry, PurgeTypeDeclaration};

/// Build an interceptor backed by a [`PurgeClient`] for `config`.
///
/// Missing credentials yield a disabled, pass-through interceptor rather than an error.
pub fn install(config: &PurgeConfig, registry: PurgeRegistry) -> Result<PurgeInterceptor, PurgeError> {
    let client = PurgeClient::new(config)?;

    tracing::info!(
        handlers = registry.len(),
        enabled = client.is_enabled(),
        "Stellate purge interceptor installed"
    );

    Ok(PurgeInterceptor::new(Arc::new(registry), Arc::new(client)).with_debug(config.debug))
}
