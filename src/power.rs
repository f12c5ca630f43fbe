//! Per-zone power state machine.
//!
//! Gates compressor relay and heater SSR activation against the dwell-time
//! constraints that protect the hardware: a compressor must rest between
//! cycles (`min_off`), must run a minimum once started (`min_cooling`), and
//! must be forced to rest after a maximum continuous run (`max_cooling`).
//! Heating has no minimum run, but restarting the compressor after a heating
//! cycle shares the same recovery gap.
//!
//! ```text
//!            cool            now >= earliest_cooling_start
//!   OFF ──────────▶ COOL_REQUESTED ──────────▶ COOLING ◀─┐
//!    ▲   !cool          │                        │  │     │ cool
//!    └──────────────────┘                 !cool  │  │ now >= latest_cooling_stop
//!    ▲                                           ▼  ▼
//!    │◀────── now >= earliest_cooling_stop ─ COOL_OVERRUN
//!    │
//!    │   heat            now >= earliest_heating_start
//!    ├──────────▶ HEAT_REQUESTED ──────────▶ HEATING ── !heat ──▶ OFF
//!    └───────────────────┘ !heat
//! ```
//!
//! Driven once per control tick by [`ZonePower::update`]; the commanded
//! output levels are exposed for the control loop to re-assert through the
//! output driver every tick.

use core::fmt;

use embassy_time::{Duration, Instant};
use log::info;

use crate::config::SystemConfig;

/// Enumeration of the per-zone power states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePowerState {
    /// Both outputs released; demands may arm a request.
    Off,
    /// Cooling wanted, waiting out the recovery gap.
    CoolRequested,
    /// Compressor relay energised.
    Cooling,
    /// Demand ended but the compressor runs on to honour its minimum run.
    CoolOverrun,
    /// Heating wanted, waiting out the recovery gap.
    HeatRequested,
    /// Heater SSR energised.
    Heating,
}

impl ZonePowerState {
    /// One-character status glyph for the display collaborator.
    pub fn glyph(self) -> char {
        match self {
            Self::Off => ' ',
            Self::CoolRequested => 'c',
            Self::Cooling => 'C',
            Self::CoolOverrun => 'o',
            Self::HeatRequested => 'h',
            Self::Heating => 'H',
        }
    }
}

impl fmt::Display for ZonePowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// The three dwell intervals, resolved from [`SystemConfig`] at startup.
#[derive(Debug, Clone, Copy)]
pub struct DwellTimes {
    /// Recovery gap after any compressor/heater cycle.
    pub min_off: Duration,
    /// Minimum compressor run once started.
    pub min_cooling: Duration,
    /// Maximum continuous compressor run before a forced rest.
    pub max_cooling: Duration,
}

impl DwellTimes {
    pub fn from_config(cfg: &SystemConfig) -> Self {
        Self {
            min_off: Duration::from_secs(u64::from(cfg.min_off_secs)),
            min_cooling: Duration::from_secs(u64::from(cfg.min_cooling_secs)),
            max_cooling: Duration::from_secs(u64::from(cfg.max_cooling_secs)),
        }
    }
}

/// One zone's power state machine and dwell bookkeeping.
pub struct ZonePower {
    zone: usize,
    dwell: DwellTimes,
    state: ZonePowerState,
    relay_on: bool,
    heater_on: bool,
    earliest_cooling_start: Instant,
    earliest_cooling_stop: Instant,
    latest_cooling_stop: Instant,
    earliest_heating_start: Instant,
}

impl ZonePower {
    /// A fresh machine in `Off` with every deadline already satisfied, so
    /// the first request of either function may engage without waiting.
    pub fn new(zone: usize, dwell: DwellTimes) -> Self {
        Self {
            zone,
            dwell,
            state: ZonePowerState::Off,
            relay_on: false,
            heater_on: false,
            earliest_cooling_start: Instant::MIN,
            earliest_cooling_stop: Instant::MIN,
            latest_cooling_stop: Instant::MIN,
            earliest_heating_start: Instant::MIN,
        }
    }

    /// Advance the machine by one control tick.
    ///
    /// At most one transition per call; a request engages its output on the
    /// tick after it was armed, once the relevant deadline has passed.
    /// Simultaneous cool and heat demand is contradictory input and leaves
    /// the machine `Off` until the conflict clears.
    pub fn update(&mut self, cool_demand: bool, heat_demand: bool, now: Instant) {
        match self.state {
            ZonePowerState::Off => {
                if cool_demand && heat_demand {
                    // contradictory demands: stay off
                } else if cool_demand {
                    self.transition(ZonePowerState::CoolRequested);
                } else if heat_demand {
                    self.transition(ZonePowerState::HeatRequested);
                }
            }

            ZonePowerState::CoolRequested => {
                if !cool_demand {
                    // cancel request
                    self.transition(ZonePowerState::Off);
                } else if now >= self.earliest_cooling_start {
                    // start cooling
                    self.earliest_cooling_stop = now + self.dwell.min_cooling;
                    self.latest_cooling_stop = now + self.dwell.max_cooling;
                    self.relay_on = true;
                    self.transition(ZonePowerState::Cooling);
                }
            }

            ZonePowerState::Cooling => {
                if !cool_demand {
                    self.transition(ZonePowerState::CoolOverrun);
                } else if now >= self.latest_cooling_stop {
                    // reached the maximum continuous run
                    self.relay_on = false;
                    self.earliest_cooling_start = now + self.dwell.min_off;
                    self.earliest_heating_start = now + self.dwell.min_off;
                    self.transition(ZonePowerState::Off);
                }
            }

            ZonePowerState::CoolOverrun => {
                if cool_demand {
                    // demand came back before the minimum run elapsed
                    self.transition(ZonePowerState::Cooling);
                } else if now >= self.earliest_cooling_stop {
                    // stop cooling
                    self.relay_on = false;
                    self.earliest_cooling_start = now + self.dwell.min_off;
                    self.earliest_heating_start = now + self.dwell.min_off;
                    self.transition(ZonePowerState::Off);
                }
            }

            ZonePowerState::HeatRequested => {
                if !heat_demand {
                    // cancel request
                    self.transition(ZonePowerState::Off);
                } else if now >= self.earliest_heating_start {
                    // start heating
                    self.heater_on = true;
                    self.transition(ZonePowerState::Heating);
                }
            }

            ZonePowerState::Heating => {
                if !heat_demand {
                    // stop heating; the compressor shares the recovery gap
                    self.heater_on = false;
                    self.earliest_cooling_start = now + self.dwell.min_off;
                    self.transition(ZonePowerState::Off);
                }
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> ZonePowerState {
        self.state
    }

    /// Commanded compressor relay level.
    pub fn relay_on(&self) -> bool {
        self.relay_on
    }

    /// Commanded heater SSR level.
    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    fn transition(&mut self, next: ZonePowerState) {
        info!("zone {}: {:?} -> {:?}", self.zone, self.state, next);
        self.state = next;
    }
}
