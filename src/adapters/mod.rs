//! Driven adapters.
//!
//! Real deployments supply a 1-Wire bus driver, GPIO outputs, and an NVS
//! key/value store behind the port traits. This module ships the
//! simulation backends used for host-side development and the test suites.

mod sim;

pub use sim::{MemBindingStore, SimBus};
