//! Integration tests: bus → acquisition → hand-off → control loop → outputs.

use brewfridge::acquisition::{AcquisitionPipeline, CyclePace, SampleHandoff};
use brewfridge::adapters::{MemBindingStore, SimBus};
use brewfridge::config::{SystemConfig, ZoneConfig};
use brewfridge::control_loop::ControlLoop;
use brewfridge::ports::OutputDriver;
use brewfridge::power::ZonePowerState;
use brewfridge::sample::SensorId;
use brewfridge::sensor_map::SensorRole;
use brewfridge::temp::Temperature;
use embassy_time::Instant;

// ── Recording output driver ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputCall {
    Relay { zone: usize, on: bool },
    Heater { zone: usize, on: bool },
}

#[derive(Default)]
struct RecordingOutputs {
    calls: Vec<OutputCall>,
    relay: [bool; 2],
    heater: [bool; 2],
}

impl OutputDriver for RecordingOutputs {
    fn set_relay(&mut self, zone: usize, on: bool) {
        self.relay[zone] = on;
        self.calls.push(OutputCall::Relay { zone, on });
    }
    fn set_heater(&mut self, zone: usize, on: bool) {
        self.heater[zone] = on;
        self.calls.push(OutputCall::Heater { zone, on });
    }
}

fn at(secs: u64) -> Instant {
    Instant::from_secs(secs)
}

const BEV0: SensorId = SensorId(0x28_0000_0000_0001);
const AIR0: SensorId = SensorId(0x28_0000_0000_0002);
const BEV1: SensorId = SensorId(0x28_0000_0000_0003);

fn t(tenths: i16) -> Temperature {
    Temperature::from_tenths(tenths)
}

/// Wire a full rig: two sensors in zone 0, one in zone 1.
fn rig(
    handoff: &SampleHandoff,
) -> (
    AcquisitionPipeline<'_, SimBus>,
    ControlLoop<'_>,
    MemBindingStore,
    RecordingOutputs,
) {
    let mut bus = SimBus::new();
    bus.add_sensor(BEV0, t(250));
    bus.add_sensor(AIR0, t(240));
    bus.add_sensor(BEV1, t(180));
    let pipeline = AcquisitionPipeline::new(bus, handoff);

    let mut control = ControlLoop::new(&SystemConfig::default(), handoff);
    let mut store = MemBindingStore::new();
    control
        .bind_sensor(0, SensorRole::Beverage, BEV0, &mut store)
        .unwrap();
    control
        .bind_sensor(0, SensorRole::Air, AIR0, &mut store)
        .unwrap();
    control
        .bind_sensor(1, SensorRole::Beverage, BEV1, &mut store)
        .unwrap();

    (pipeline, control, store, RecordingOutputs::default())
}

#[test]
fn end_to_end_cooling_engages_after_request_tick() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, _store, mut out) = rig(&handoff);

    // default set point 23.0: zone 0 air reads 24.0 -> cooling wanted
    assert_eq!(pipeline.run_cycle(), CyclePace::Normal);
    control.tick(at(0), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::CoolRequested);
    assert!(!out.relay[0]);

    assert_eq!(pipeline.run_cycle(), CyclePace::Normal);
    control.tick(at(1), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::Cooling);
    assert!(out.relay[0]);

    // zone 1 beverage reads 18.0 -> heating wanted, engages a tick later
    assert_eq!(control.zone_state(1), ZonePowerState::Heating);
    assert!(out.heater[1]);
    assert!(!out.relay[1]);
}

#[test]
fn outputs_are_reasserted_every_tick() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, _store, mut out) = rig(&handoff);

    for tick in 0..5 {
        let _ = pipeline.run_cycle();
        control.tick(at(tick), &mut out);
    }
    // 2 zones x 2 outputs x 5 ticks
    assert_eq!(out.calls.len(), 20);
    // the last tick re-asserted the same engaged level
    assert!(out.calls.contains(&OutputCall::Relay { zone: 0, on: true }));
    assert!(out.relay[0]);
}

#[test]
fn control_keeps_last_sample_when_pipeline_backs_off() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, _store, mut out) = rig(&handoff);

    let _ = pipeline.run_cycle();
    control.tick(at(0), &mut out);
    let _ = pipeline.run_cycle();
    control.tick(at(1), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::Cooling);

    // Bus failure: the pipeline publishes a degraded sample and backs off.
    pipeline.bus_mut().fail_scan(true);
    assert_eq!(pipeline.run_cycle(), CyclePace::Backoff);
    control.tick(at(2), &mut out);

    // Demand dropped with the sensors, but the compressor honours its
    // minimum run rather than short-cycling.
    assert_eq!(control.zone_state(0), ZonePowerState::CoolOverrun);
    assert!(out.relay[0]);
    assert_eq!(control.latest_sample().physical_count(), 0);

    // Pipeline stalls entirely: ticks keep reusing the degraded copy.
    control.tick(at(3), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::CoolOverrun);

    // Minimum run (60 s) elapses; the zone shuts down cleanly.
    control.tick(at(70), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::Off);
    assert!(!out.relay[0]);
}

#[test]
fn zones_are_controlled_independently() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, _store, mut out) = rig(&handoff);

    // Zone 1 disabled: its beverage sensor reading no longer matters.
    control.set_zone_config(
        1,
        ZoneConfig {
            set_temp: Temperature::UNDEFINED,
            ..ZoneConfig::default()
        },
    );

    for tick in 0..3 {
        let _ = pipeline.run_cycle();
        control.tick(at(tick), &mut out);
    }
    assert_eq!(control.zone_state(0), ZonePowerState::Cooling);
    assert_eq!(control.zone_state(1), ZonePowerState::Off);
    assert!(!out.heater[1]);
}

#[test]
fn offset_policy_goes_safe_when_reference_disconnects() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, _store, mut out) = rig(&handoff);

    // Offset cooling on zone 0: beverage above set, air within band.
    control.set_zone_config(
        0,
        ZoneConfig {
            set_temp: t(230),
            cool_offset: t(20),
            heat_offset: Temperature::UNDEFINED,
        },
    );

    let _ = pipeline.run_cycle();
    control.tick(at(0), &mut out);
    let _ = pipeline.run_cycle();
    control.tick(at(1), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::Cooling);

    // The air sensor drops off the bus: an offset policy must not run
    // blind, so demand clears and the zone overruns to its minimum.
    pipeline.bus_mut().remove_sensor(AIR0);
    let _ = pipeline.run_cycle();
    control.tick(at(2), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::CoolOverrun);
}

#[test]
fn rebinding_a_role_takes_effect_next_tick() {
    let handoff = SampleHandoff::new();
    let (mut pipeline, mut control, mut store, mut out) = rig(&handoff);

    let _ = pipeline.run_cycle();
    control.tick(at(0), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::CoolRequested);

    // Unbind both zone-0 roles between ticks: no usable sensor, request
    // cancels.
    control
        .bind_sensor(0, SensorRole::Beverage, SensorId::NONE, &mut store)
        .unwrap();
    control
        .bind_sensor(0, SensorRole::Air, SensorId::NONE, &mut store)
        .unwrap();

    let _ = pipeline.run_cycle();
    control.tick(at(1), &mut out);
    assert_eq!(control.zone_state(0), ZonePowerState::Off);
    assert!(!out.relay[0]);
}
