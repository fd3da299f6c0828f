//! Application Layer
//!
//! Use cases orchestrating the domain through its ports.

mod import_service;
mod lookup_service;

pub use import_service::{ImportFailure, ImportService, IngestError};
pub use lookup_service::{LookupError, LookupService};
