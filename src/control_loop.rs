//! Per-tick control orchestration.
//!
//! [`ControlLoop`] ties the sample hand-off, per-zone configuration, demand
//! decisions, and the two power state machines together. Each tick it
//! drains the hand-off (keeping the previous sample when none is pending),
//! resolves every zone's sensor roles, computes demand, steps the state
//! machines, and re-asserts both output levels through the
//! [`OutputDriver`].
//!
//! The loop and the display/encoder collaborator share one thread: config
//! and binding edits go through the setters here, between ticks, so the
//! state machines never see a half-applied change.

use embassy_time::{Duration, Instant, Timer};
use log::info;

use crate::acquisition::SampleHandoff;
use crate::config::{SystemConfig, ZONE_COUNT, ZoneConfig};
use crate::demand::{cooling_demand, heating_demand};
use crate::error::StorageError;
use crate::ports::{BindingStore, OutputDriver};
use crate::power::{DwellTimes, ZonePower, ZonePowerState};
use crate::sample::{SensorId, TemperatureSample};
use crate::sensor_map::{self, SensorBindings, SensorRole};

struct ZoneRuntime {
    config: ZoneConfig,
    bindings: SensorBindings,
    power: ZonePower,
}

/// The control-thread orchestrator.
pub struct ControlLoop<'a> {
    handoff: &'a SampleHandoff,
    sample: TemperatureSample,
    zones: [ZoneRuntime; ZONE_COUNT],
}

impl<'a> ControlLoop<'a> {
    pub fn new(system: &SystemConfig, handoff: &'a SampleHandoff) -> Self {
        let dwell = DwellTimes::from_config(system);
        Self {
            handoff,
            sample: TemperatureSample::empty(),
            zones: core::array::from_fn(|zone| ZoneRuntime {
                config: ZoneConfig::default(),
                bindings: SensorBindings::default(),
                power: ZonePower::new(zone, dwell),
            }),
        }
    }

    /// Load every zone's sensor bindings from the store. Call once at
    /// startup, before the first tick.
    pub fn load_bindings(&mut self, store: &impl BindingStore) -> Result<(), StorageError> {
        for (zone, runtime) in self.zones.iter_mut().enumerate() {
            runtime.bindings = sensor_map::load_bindings(store, zone)?;
        }
        Ok(())
    }

    /// One control tick.
    ///
    /// Never blocks on the pipeline: a stale or missing sample leaves the
    /// previous local copy in effect, and the demand logic already treats
    /// missing readings as disconnected sensors.
    pub fn tick(&mut self, now: Instant, out: &mut impl OutputDriver) {
        if let Some(sample) = self.handoff.take() {
            self.sample = sample;
        }

        for (zone, runtime) in self.zones.iter_mut().enumerate() {
            let beverage = runtime.bindings.resolve(&self.sample, SensorRole::Beverage);
            let air = runtime.bindings.resolve(&self.sample, SensorRole::Air);
            let heater = runtime.bindings.resolve(&self.sample, SensorRole::Heater);

            let cool = cooling_demand(
                runtime.config.set_temp,
                runtime.config.cool_offset,
                beverage,
                air,
            );
            let heat = heating_demand(
                runtime.config.set_temp,
                runtime.config.heat_offset,
                beverage,
                heater,
            );

            runtime.power.update(cool, heat, now);
            out.set_relay(zone, runtime.power.relay_on());
            out.set_heater(zone, runtime.power.heater_on());
        }
    }

    /// Forever-task wrapping [`tick`](Self::tick). Spawn on the control
    /// executor.
    pub async fn run(mut self, mut out: impl OutputDriver, period: Duration) -> ! {
        loop {
            self.tick(Instant::now(), &mut out);
            Timer::after(period).await;
        }
    }

    // ── Display collaborator surface (read side) ──────────────

    /// The most recently drained sample.
    pub fn latest_sample(&self) -> &TemperatureSample {
        &self.sample
    }

    /// A zone's power state, for the status glyph.
    pub fn zone_state(&self, zone: usize) -> ZonePowerState {
        self.zones[zone].power.state()
    }

    pub fn zone_config(&self, zone: usize) -> &ZoneConfig {
        &self.zones[zone].config
    }

    pub fn bindings(&self, zone: usize) -> &SensorBindings {
        &self.zones[zone].bindings
    }

    // ── Display collaborator surface (write side, between ticks) ──

    /// Replace a zone's thermostat settings. Takes effect on the next tick.
    pub fn set_zone_config(&mut self, zone: usize, config: ZoneConfig) {
        info!(
            "zone {}: set {} cool-offset {} heat-offset {}",
            zone, config.set_temp, config.cool_offset, config.heat_offset
        );
        self.zones[zone].config = config;
    }

    /// Bind a zone's sensor role and persist the change. A no-op when the
    /// binding is unchanged, so the store is written only on real edits.
    pub fn bind_sensor(
        &mut self,
        zone: usize,
        role: SensorRole,
        id: SensorId,
        store: &mut impl BindingStore,
    ) -> Result<(), StorageError> {
        if self.zones[zone].bindings.get(role) == id {
            return Ok(());
        }
        self.zones[zone].bindings.set(role, id);
        sensor_map::persist_binding(store, zone, role, id)
    }
}
