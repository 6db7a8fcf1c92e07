//! Alert evaluation
//!
//! Pure threshold check over a single sample. There is deliberately no
//! hysteresis or debounce: every sample re-evaluates the condition
//! independently, so values oscillating near a threshold toggle the flag
//! every sample. Latency wins over flicker suppression here.

use crate::domain::Sample;

/// Heart rate above this value (beats/min) raises the alert
pub const HR_ALERT_ABOVE: u16 = 100;

/// Temperature at or above this value (°C) raises the alert
pub const TEMP_ALERT_AT_OR_ABOVE: f64 = 37.1;

/// Evaluates the alert condition for one sample
///
/// `alert = hr > 100 || temp >= 37.1`. A missing field never satisfies its
/// clause, so a sample with no vitals at all evaluates to `false`.
pub fn evaluate(sample: &Sample) -> bool {
    let hr_breach = sample.hr.is_some_and(|hr| hr > HR_ALERT_ABOVE);
    let temp_breach = sample.temp.is_some_and(|t| t >= TEMP_ALERT_AT_OR_ABOVE);
    hr_breach || temp_breach
}
