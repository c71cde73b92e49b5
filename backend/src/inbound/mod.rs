//! Inbound adapters that translate external requests into thread commands
//! while keeping framework details at the edge.

pub mod http;
