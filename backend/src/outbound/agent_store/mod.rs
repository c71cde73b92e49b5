//! Remote agent thread store adapter.
//!
//! Thin HTTP implementation of the `ThreadStore` port.

mod dto;
mod http_store;

pub use http_store::HttpThreadStore;
