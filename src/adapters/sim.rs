//! Simulation backends for the collaborator ports.
//!
//! `SimBus` models a 1-Wire bus with injectable readings and failures;
//! `MemBindingStore` models the key/value store with an in-memory map.
//! Both mirror the behaviour contracts of the real drivers closely enough
//! for the control core's tests to exercise every degradation path.

use std::collections::HashMap;

use heapless::Vec;

use crate::error::{BusError, StorageError};
use crate::ports::{BindingStore, SensorBus};
use crate::sample::{MAX_BUS_SENSORS, SensorId};
use crate::temp::Temperature;

// ───────────────────────────────────────────────────────────────
// SimBus
// ───────────────────────────────────────────────────────────────

/// Simulated sensor bus with failure injection.
pub struct SimBus {
    sensors: std::vec::Vec<(SensorId, Temperature)>,
    fail_scan: bool,
    fail_read: bool,
}

impl SimBus {
    pub fn new() -> Self {
        Self {
            sensors: std::vec::Vec::new(),
            fail_scan: false,
            fail_read: false,
        }
    }

    /// Attach a sensor to the simulated bus.
    pub fn add_sensor(&mut self, id: SensorId, reading: Temperature) {
        self.sensors.push((id, reading));
    }

    /// Detach a sensor (simulates unplugging).
    pub fn remove_sensor(&mut self, id: SensorId) {
        self.sensors.retain(|(sensor, _)| *sensor != id);
    }

    /// Change an attached sensor's reading.
    pub fn set_reading(&mut self, id: SensorId, reading: Temperature) {
        for (sensor, value) in &mut self.sensors {
            if *sensor == id {
                *value = reading;
            }
        }
    }

    /// Make every scan fail with a timeout until cleared.
    pub fn fail_scan(&mut self, fail: bool) {
        self.fail_scan = fail;
    }

    /// Make every measurement fail with a CRC error until cleared.
    pub fn fail_read(&mut self, fail: bool) {
        self.fail_read = fail;
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBus for SimBus {
    fn scan(&mut self) -> Result<Vec<SensorId, MAX_BUS_SENSORS>, BusError> {
        if self.fail_scan {
            return Err(BusError::Timeout);
        }
        let mut ids = Vec::new();
        for (id, _) in &self.sensors {
            // a real driver stops enumerating once its buffer is full
            if ids.push(*id).is_err() {
                break;
            }
        }
        Ok(ids)
    }

    fn measure_and_read(
        &mut self,
        ids: &[SensorId],
        readings: &mut [Temperature],
    ) -> Result<(), BusError> {
        debug_assert_eq!(ids.len(), readings.len());
        if self.fail_read {
            return Err(BusError::Crc);
        }
        for (slot, id) in ids.iter().enumerate() {
            let reading = self
                .sensors
                .iter()
                .find(|(sensor, _)| sensor == id)
                .map(|(_, value)| *value)
                .ok_or(BusError::Timeout)?;
            readings[slot] = reading;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// MemBindingStore
// ───────────────────────────────────────────────────────────────

/// In-memory binding store; values are postcard blobs like the NVS backend
/// would hold.
pub struct MemBindingStore {
    store: HashMap<u8, std::vec::Vec<u8>>,
}

impl MemBindingStore {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl Default for MemBindingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore for MemBindingStore {
    fn load(&self, slot: u8) -> Result<SensorId, StorageError> {
        let bytes = self.store.get(&slot).ok_or(StorageError::NotFound)?;
        postcard::from_bytes(bytes).map_err(|_| StorageError::IoError)
    }

    fn store(&mut self, slot: u8, id: SensorId) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(&id).map_err(|_| StorageError::IoError)?;
        self.store.insert(slot, bytes);
        Ok(())
    }
}
