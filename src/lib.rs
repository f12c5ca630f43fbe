//! Brewfridge control core.
//!
//! Dual-zone fermentation-fridge thermostat engine: per-zone power state
//! machines with compressor-protective dwell times, sensor-availability-aware
//! demand decisions, and a non-blocking acquisition pipeline feeding the
//! control loop through a single-slot hand-off.
//!
//! ```text
//!  bus ──▶ AcquisitionPipeline ──▶ SampleHandoff ──▶ ControlLoop
//!                                                       │
//!                                  SensorBindings ──▶ demand ──▶ ZonePower
//!                                                       │
//!                                                  OutputDriver
//! ```
//!
//! Hardware (1-Wire driver, relay/SSR GPIO, key/value storage) and the
//! display/encoder UI are external collaborators behind the traits in
//! [`ports`]; everything here runs host-side under test.

#![deny(unused_must_use)]

pub mod acquisition;
pub mod adapters;
pub mod config;
pub mod control_loop;
pub mod demand;
pub mod error;
pub mod ports;
pub mod power;
pub mod sample;
pub mod sensor_map;
pub mod temp;
