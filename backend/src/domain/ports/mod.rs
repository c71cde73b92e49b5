//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_context;
mod thread_commands;
mod thread_store;

#[cfg(test)]
pub use auth_context::MockAuthContext;
pub use auth_context::{AuthContext, AuthContextError, FixtureAuthContext};
pub use thread_commands::ThreadCommands;
#[cfg(test)]
pub use thread_store::MockThreadStore;
pub use thread_store::{StoredThread, ThreadStore, ThreadStoreError};
