//! Port traits — the boundary between the control core and the outside world.
//!
//! ```text
//!   SensorBus ──▶ AcquisitionPipeline ──▶ hand-off ──▶ ControlLoop ──▶ OutputDriver
//!                                                          │
//!                                                     BindingStore
//! ```
//!
//! Driven adapters (the 1-Wire driver, relay/SSR GPIO outputs, the NVS-style
//! key/value store) implement these traits. The core consumes them via
//! generics, so it never touches hardware directly and every test runs
//! against recording mocks.

use heapless::Vec;

use crate::error::{BusError, StorageError};
use crate::sample::{MAX_BUS_SENSORS, SensorId};
use crate::temp::Temperature;

// ───────────────────────────────────────────────────────────────
// Sensor bus port (driven adapter: hardware → acquisition)
// ───────────────────────────────────────────────────────────────

/// The 1-Wire temperature sensor bus.
///
/// Both operations are bounded by driver-level timeouts; a failure of either
/// degrades the whole acquisition cycle, never blocks it.
pub trait SensorBus {
    /// Enumerate the sensor identities currently present on the bus.
    /// Devices beyond [`MAX_BUS_SENSORS`] are truncated by the adapter.
    fn scan(&mut self) -> Result<Vec<SensorId, MAX_BUS_SENSORS>, BusError>;

    /// Trigger a simultaneous measurement on `ids` and read every result
    /// into `readings` (same length, slot for slot). A single device
    /// failing its read fails the whole call.
    fn measure_and_read(
        &mut self,
        ids: &[SensorId],
        readings: &mut [Temperature],
    ) -> Result<(), BusError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: control → relay/SSR GPIO)
// ───────────────────────────────────────────────────────────────

/// Compressor relay and heater SSR outputs, one pair per zone.
///
/// Calls are idempotent and assumed infallible at this layer; the control
/// loop re-asserts the commanded level every tick. `zone` is `0..ZONE_COUNT`.
pub trait OutputDriver {
    /// Energise (`true`) or release (`false`) a zone's compressor relay.
    fn set_relay(&mut self, zone: usize, on: bool);

    /// Energise (`true`) or release (`false`) a zone's heater SSR.
    fn set_heater(&mut self, zone: usize, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Binding store port (driven adapter: control ↔ non-volatile storage)
// ───────────────────────────────────────────────────────────────

/// Persistent key/value store for sensor-role bindings.
///
/// One 64-bit identity per slot; slots are `zone * 3 + role` across both
/// zones. Loaded once at startup, written only when a binding changes.
pub trait BindingStore {
    /// Read the identity stored in `slot`.
    /// A slot that has never been written yields [`StorageError::NotFound`].
    fn load(&self, slot: u8) -> Result<SensorId, StorageError>;

    /// Write the identity for `slot` (zero identity = unbound).
    fn store(&mut self, slot: u8, id: SensorId) -> Result<(), StorageError>;
}
