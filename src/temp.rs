//! Fixed-point temperature representation.
//!
//! All temperatures and offsets are carried as signed tenths of a degree
//! Celsius. The settings UI and the sensor pipeline share one sentinel,
//! [`Temperature::UNDEFINED`], meaning "no reading / not configured";
//! displays render it as `--.-`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A temperature (or temperature offset) in tenths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Temperature(pub i16);

impl Temperature {
    /// Sentinel for "no reading / not configured". Displayed as `--.-`.
    pub const UNDEFINED: Temperature = Temperature(-999);

    /// Construct from tenths of a degree (e.g. `234` = 23.4 °C).
    pub const fn from_tenths(tenths: i16) -> Self {
        Temperature(tenths)
    }

    /// Raw value in tenths of a degree.
    pub const fn tenths(self) -> i16 {
        self.0
    }

    /// `false` for the [`UNDEFINED`](Self::UNDEFINED) sentinel.
    pub fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_defined() {
            return write!(f, "--.-");
        }
        let tenths = i32::from(self.0);
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}
