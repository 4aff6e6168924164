//! Domain layer - Core types and port definitions
//!
//! This module defines the SCM data model and the traits (ports) that host
//! adapters implement.

pub mod ports;

pub use ports::*;
