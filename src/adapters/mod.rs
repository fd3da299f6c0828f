//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports (SQLite store, CSV source).

pub mod inbound;
pub mod outbound;
