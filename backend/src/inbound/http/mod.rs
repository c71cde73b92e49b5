//! HTTP inbound adapter exposing the thread commands as REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod threads;

pub use error::ApiResult;
