//! Domain Layer
//!
//! Entities, pure services and the ports the outer layers implement.

pub mod entities;
pub mod ports;
pub mod services;
