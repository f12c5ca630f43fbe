//! Cool/heat demand decisions.
//!
//! Pure functions turning a zone's settings and its two relevant sensor
//! readings into a demand boolean. The graceful-degradation ladder is the
//! policy contract:
//!
//! 1. undefined set point — zone disabled, never demand;
//! 2. offset defined — dual-sensor control, refuses to run unless *both*
//!    sensors are present (an offset policy must not run blind);
//! 3. reference sensor alone — plain set-point control on the reference;
//! 4. primary (beverage) sensor alone — fallback set-point control;
//! 5. no usable sensor — demand off.
//!
//! All comparisons are strict: a reading exactly at a boundary does not
//! demand.

use crate::temp::Temperature;

/// Should this zone's compressor run?
///
/// `primary_temp` is the beverage sensor; `reference_temp` is the air
/// (cooling-reference) sensor. With a defined `cool_offset`, cooling runs
/// only while the beverage is above the set point *and* the air is above
/// `set_point - cool_offset`, so the air may be driven at most `cool_offset`
/// below the target.
pub fn cooling_demand(
    set_point: Temperature,
    cool_offset: Temperature,
    primary_temp: Temperature,
    reference_temp: Temperature,
) -> bool {
    if !set_point.is_defined() {
        return false;
    }

    if cool_offset.is_defined() {
        if !primary_temp.is_defined() || !reference_temp.is_defined() {
            return false;
        }
        let min_temp = set_point.tenths() - cool_offset.tenths();
        return primary_temp.tenths() > set_point.tenths() && reference_temp.tenths() > min_temp;
    }

    if reference_temp.is_defined() {
        // manage the reference (air) temperature only
        return reference_temp.tenths() > set_point.tenths();
    }

    if primary_temp.is_defined() {
        // fall back to managing the beverage temperature
        return primary_temp.tenths() > set_point.tenths();
    }

    false
}

/// Should this zone's heater run?
///
/// Mirror of [`cooling_demand`] with inverted comparisons:
/// `reference_temp` is the heater-proximity sensor and the guard band is
/// `set_point + heat_offset`, capping how far the heater surface may be
/// driven above the target.
pub fn heating_demand(
    set_point: Temperature,
    heat_offset: Temperature,
    primary_temp: Temperature,
    reference_temp: Temperature,
) -> bool {
    if !set_point.is_defined() {
        return false;
    }

    if heat_offset.is_defined() {
        if !primary_temp.is_defined() || !reference_temp.is_defined() {
            return false;
        }
        let max_temp = set_point.tenths() + heat_offset.tenths();
        return primary_temp.tenths() < set_point.tenths() && reference_temp.tenths() < max_temp;
    }

    if reference_temp.is_defined() {
        // manage the heater temperature only
        return reference_temp.tenths() < set_point.tenths();
    }

    if primary_temp.is_defined() {
        // fall back to managing the beverage temperature
        return primary_temp.tenths() < set_point.tenths();
    }

    false
}
