//! Sensor role bindings.
//!
//! Each zone binds up to three logical roles to physical sensor identities.
//! Bindings are edited by the display/encoder collaborator between control
//! ticks and persisted through the [`BindingStore`] port, one 64-bit
//! identity per flat slot (`zone * 3 + role`), so a store keyed by small
//! integers can hold the whole table.

use log::info;

use crate::config::ZONE_COUNT;
use crate::error::StorageError;
use crate::ports::BindingStore;
use crate::sample::{SensorId, TemperatureSample};
use crate::temp::Temperature;

/// Logical sensor roles per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorRole {
    /// The beverage (primary) sensor inside the fermenter.
    Beverage = 0,
    /// The enclosure air sensor — cooling reference.
    Air = 1,
    /// The heater-proximity sensor — heating reference.
    Heater = 2,
}

impl SensorRole {
    pub const COUNT: usize = 3;
    pub const ALL: [SensorRole; Self::COUNT] =
        [SensorRole::Beverage, SensorRole::Air, SensorRole::Heater];

    fn index(self) -> usize {
        self as usize
    }
}

/// One zone's role→identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorBindings {
    ids: [SensorId; SensorRole::COUNT],
}

impl SensorBindings {
    /// The identity bound to `role` ([`SensorId::NONE`] when unbound).
    pub fn get(&self, role: SensorRole) -> SensorId {
        self.ids[role.index()]
    }

    /// Bind `role` to `id` (the zero identity unbinds).
    pub fn set(&mut self, role: SensorRole, id: SensorId) {
        self.ids[role.index()] = id;
    }

    /// Resolve `role` against a sample: identity match over the physical
    /// slots, [`Temperature::UNDEFINED`] when unbound or disconnected.
    pub fn resolve(&self, sample: &TemperatureSample, role: SensorRole) -> Temperature {
        sample.reading_for(self.get(role))
    }
}

/// Flat store slot for a zone/role pair.
fn slot(zone: usize, role: SensorRole) -> u8 {
    debug_assert!(zone < ZONE_COUNT);
    (zone * SensorRole::COUNT + role.index()) as u8
}

/// Load one zone's bindings from the store.
///
/// Slots that have never been written read as unbound; any other storage
/// failure is surfaced to the caller.
pub fn load_bindings(
    store: &impl BindingStore,
    zone: usize,
) -> Result<SensorBindings, StorageError> {
    let mut bindings = SensorBindings::default();
    for role in SensorRole::ALL {
        match store.load(slot(zone, role)) {
            Ok(id) => bindings.set(role, id),
            Err(StorageError::NotFound) => bindings.set(role, SensorId::NONE),
            Err(e) => return Err(e),
        }
    }
    Ok(bindings)
}

/// Persist a single changed binding.
pub fn persist_binding(
    store: &mut impl BindingStore,
    zone: usize,
    role: SensorRole,
    id: SensorId,
) -> Result<(), StorageError> {
    store.store(slot(zone, role), id)?;
    info!("zone {}: bound {:?} to {}", zone, role, id);
    Ok(())
}
