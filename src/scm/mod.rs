//! SCM Module
//!
//! Storage-class memory provisioning: command execution, region state
//! inspection, namespace management and the prepare/reset state machine.

pub mod command;
pub mod config;
pub mod namespace;
pub mod provider;
pub mod provisioner;
pub mod region;

#[cfg(test)]
pub(crate) mod testing;

pub use command::*;
pub use config::*;
pub use namespace::*;
pub use provider::*;
pub use provisioner::*;
pub use region::*;
