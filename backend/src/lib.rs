//! Identity-gated command layer for AI conversation threads.
//!
//! The [`domain`] module holds the commands, the identity gate and the error
//! taxonomy; [`inbound`] and [`outbound`] adapt them to HTTP and to concrete
//! thread stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
