//! Outbound adapters implementing the thread store port.
//!
//! - **memory**: in-process store used when no remote store is configured.
//! - **agent_store**: reqwest client for a remote agent thread store.
//!
//! Adapters translate between transport representations and domain types.
//! They contain no command logic.

pub mod agent_store;
pub mod memory;
