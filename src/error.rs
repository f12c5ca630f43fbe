//! Typed errors for the collaborator ports.
//!
//! All variants are `Copy` so they can be passed through the acquisition
//! and control paths without allocation. Recoverable conditions (a failed
//! bus cycle, a full hand-off slot) never escape their subsystem as `Err`;
//! they degrade the data and self-heal on the next cycle.

use core::fmt;

/// Errors from the 1-Wire sensor bus collaborator.
///
/// Bus errors are transient by contract: the acquisition pipeline degrades
/// the current sample to "no sensors", backs off, and retries forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The bus did not respond within the driver's timeout.
    Timeout,
    /// Enumeration found no devices on the bus.
    NoDevices,
    /// A device's scratchpad failed its CRC check.
    Crc,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "bus timeout"),
            Self::NoDevices => write!(f, "no devices on bus"),
            Self::Crc => write!(f, "CRC mismatch"),
        }
    }
}

/// Errors from the key/value binding-store collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested slot has never been written.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "slot not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
