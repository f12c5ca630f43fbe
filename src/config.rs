//! System and per-zone configuration parameters.
//!
//! Timing constants are fixed for the lifetime of the process: they are
//! validated once at startup and never reconfigured at runtime. Zone set
//! points and offsets are edited by the display/encoder collaborator
//! between control ticks.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::temp::Temperature;

/// Number of independently controlled zones.
pub const ZONE_COUNT: usize = 2;

/// Per-zone thermostat settings.
///
/// An undefined `set_temp` disables the zone entirely. An undefined offset
/// selects single-sensor control (see the demand ladder in
/// [`demand`](crate::demand)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Target temperature; [`Temperature::UNDEFINED`] = zone disabled.
    pub set_temp: Temperature,
    /// Maximum cold bias below the set point for offset-based cooling.
    pub cool_offset: Temperature,
    /// Maximum warm bias above the set point for offset-based heating.
    pub heat_offset: Temperature,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            set_temp: Temperature::from_tenths(230), // 23.0 °C
            cool_offset: Temperature::UNDEFINED,
            heat_offset: Temperature::UNDEFINED,
        }
    }
}

/// Core timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Compressor / heater protection ---
    /// Recovery gap after any compressor or heater cycle (seconds).
    /// Gates restarts of *both* functions after a cooling stop.
    pub min_off_secs: u32,
    /// Minimum compressor run once started (seconds).
    pub min_cooling_secs: u32,
    /// Maximum continuous compressor run before a forced rest (seconds).
    pub max_cooling_secs: u32,

    // --- Timing ---
    /// Sensor acquisition cycle period (milliseconds).
    pub sensor_cycle_ms: u32,
    /// Acquisition retry period after a bus failure (milliseconds).
    pub sensor_backoff_ms: u32,
    /// Control loop tick period (milliseconds).
    pub control_tick_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Compressor protection
            min_off_secs: 300,     // 5 min rest between cycles
            min_cooling_secs: 60,  // 1 min minimum run
            max_cooling_secs: 1800, // 30 min forced rest point

            // Timing
            sensor_cycle_ms: 250,
            sensor_backoff_ms: 750, // 3x normal pace after a bus error
            control_tick_ms: 250,
        }
    }
}

/// Range-check a configuration before the control core is built from it.
pub fn validate(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if cfg.min_off_secs == 0 {
        return Err(ConfigError::ValidationFailed("min_off_secs must be nonzero"));
    }
    if cfg.min_cooling_secs == 0 {
        return Err(ConfigError::ValidationFailed(
            "min_cooling_secs must be nonzero",
        ));
    }
    if cfg.min_cooling_secs >= cfg.max_cooling_secs {
        return Err(ConfigError::ValidationFailed(
            "min_cooling_secs must be < max_cooling_secs",
        ));
    }
    if cfg.sensor_cycle_ms == 0 {
        return Err(ConfigError::ValidationFailed(
            "sensor_cycle_ms must be nonzero",
        ));
    }
    if cfg.sensor_backoff_ms < cfg.sensor_cycle_ms {
        return Err(ConfigError::ValidationFailed(
            "sensor_backoff_ms must be >= sensor_cycle_ms",
        ));
    }
    if cfg.control_tick_ms == 0 {
        return Err(ConfigError::ValidationFailed(
            "control_tick_ms must be nonzero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(validate(&c).is_ok());
        assert!(c.min_cooling_secs < c.max_cooling_secs);
        assert!(c.sensor_backoff_ms >= c.sensor_cycle_ms);
    }

    #[test]
    fn default_zone_targets_cellar_temperature() {
        let z = ZoneConfig::default();
        assert_eq!(z.set_temp, Temperature::from_tenths(230));
        assert!(!z.cool_offset.is_defined());
        assert!(!z.heat_offset.is_defined());
    }

    #[test]
    fn rejects_min_cooling_at_or_above_max() {
        let cfg = SystemConfig {
            min_cooling_secs: 1800,
            max_cooling_secs: 1800,
            ..Default::default()
        };
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_backoff_shorter_than_cycle() {
        let cfg = SystemConfig {
            sensor_cycle_ms: 250,
            sensor_backoff_ms: 100,
            ..Default::default()
        };
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_zero_dwell() {
        let cfg = SystemConfig {
            min_off_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.min_off_secs, c2.min_off_secs);
        assert_eq!(c.max_cooling_secs, c2.max_cooling_secs);
        assert_eq!(c.sensor_backoff_ms, c2.sensor_backoff_ms);
    }

    #[test]
    fn postcard_roundtrip() {
        let z = ZoneConfig {
            set_temp: Temperature::from_tenths(45),
            cool_offset: Temperature::from_tenths(20),
            heat_offset: Temperature::UNDEFINED,
        };
        let bytes = postcard::to_allocvec(&z).unwrap();
        let z2: ZoneConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(z, z2);
    }
}
