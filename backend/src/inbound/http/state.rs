//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::ThreadCommands;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Thread deletion and search commands.
    pub threads: Arc<dyn ThreadCommands>,
}

impl HttpState {
    /// Construct state around the thread command port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use thread_gate::domain::{IdentityResolver, ThreadService};
    /// use thread_gate::inbound::http::state::HttpState;
    /// use thread_gate::outbound::memory::InMemoryThreadStore;
    ///
    /// let service = ThreadService::new(
    ///     Arc::new(InMemoryThreadStore::default()),
    ///     IdentityResolver::default(),
    /// );
    /// let state = HttpState::new(Arc::new(service));
    /// let _threads = state.threads.clone();
    /// ```
    pub fn new(threads: Arc<dyn ThreadCommands>) -> Self {
        Self { threads }
    }
}
