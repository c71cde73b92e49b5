//! Builders wiring the configured thread store into HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::info;

use thread_gate::domain::ports::{ThreadCommands, ThreadStore};
use thread_gate::domain::{IdentityResolver, ThreadService};
use thread_gate::inbound::http::state::HttpState;
use thread_gate::outbound::agent_store::HttpThreadStore;
use thread_gate::outbound::memory::InMemoryThreadStore;

use super::config::StoreTarget;

/// Build the thread store adapter selected by `target`.
///
/// # Errors
///
/// Returns an error when the HTTP client for a remote store cannot be built.
pub(super) fn build_thread_store(target: &StoreTarget) -> io::Result<Arc<dyn ThreadStore>> {
    match target {
        StoreTarget::InMemory => {
            info!("using in-memory thread store");
            Ok(Arc::new(InMemoryThreadStore::default()))
        }
        StoreTarget::Remote { base, timeout } => {
            info!(%base, timeout_secs = timeout.as_secs(), "using remote agent thread store");
            let store = HttpThreadStore::new(base.clone(), *timeout).map_err(|error| {
                io::Error::other(format!("failed to build thread store client: {error}"))
            })?;
            Ok(Arc::new(store))
        }
    }
}

/// Wrap `store` in the thread command service and expose it as HTTP state.
pub(super) fn build_http_state(store: Arc<dyn ThreadStore>) -> web::Data<HttpState> {
    let commands: Arc<dyn ThreadCommands> =
        Arc::new(ThreadService::new(store, IdentityResolver::default()));
    web::Data::new(HttpState::new(commands))
}
