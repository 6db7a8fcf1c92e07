//! Synthetic sample generation
//!
//! Clamped random walk over the previous sample, used when no live feed is
//! available (demo/offline mode). Pure with respect to engine state: the
//! caller owns the RNG and decides when to tick, so the walk is testable
//! without a scheduler.

use crate::domain::Sample;
use chrono::Utc;
use rand::Rng;

/// Random-walk parameters for one vital
#[derive(Debug, Clone, Copy)]
pub struct VitalSpec {
    /// Maximum per-tick drift magnitude
    pub step: f64,
    /// Lower clamp bound
    pub min: f64,
    /// Upper clamp bound
    pub max: f64,
    /// Resting value used when no prior reading exists
    pub baseline: f64,
}

/// Heart rate walk, beats/min
pub const HR_SPEC: VitalSpec = VitalSpec {
    step: 2.0,
    min: 60.0,
    max: 120.0,
    baseline: 78.0,
};

/// SpO2 walk, percent
pub const SPO2_SPEC: VitalSpec = VitalSpec {
    step: 0.4,
    min: 92.0,
    max: 100.0,
    baseline: 98.0,
};

/// Systolic pressure walk, mmHg
pub const SYS_SPEC: VitalSpec = VitalSpec {
    step: 1.0,
    min: 90.0,
    max: 160.0,
    baseline: 121.0,
};

/// Diastolic pressure walk, mmHg
pub const DIA_SPEC: VitalSpec = VitalSpec {
    step: 1.0,
    min: 50.0,
    max: 100.0,
    baseline: 79.0,
};

/// Temperature walk, °C
pub const TEMP_SPEC: VitalSpec = VitalSpec {
    step: 0.025,
    min: 35.8,
    max: 39.0,
    baseline: 36.6,
};

/// One clamped random-walk step: `clamp(prev + uniform(-1,1) * step, min, max)`
fn drift<R: Rng>(rng: &mut R, prev: f64, spec: &VitalSpec) -> f64 {
    let next = prev + rng.gen_range(-1.0..1.0) * spec.step;
    next.clamp(spec.min, spec.max)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The resting sample used to start a walk when no prior sample exists
pub fn baseline_sample(timestamp_ms: i64) -> Sample {
    Sample {
        timestamp_ms,
        hr: Some(HR_SPEC.baseline as u16),
        spo2: Some(SPO2_SPEC.baseline as u8),
        sys: Some(SYS_SPEC.baseline as u16),
        dia: Some(DIA_SPEC.baseline as u16),
        temp: Some(TEMP_SPEC.baseline),
    }
}

/// Produces exactly one new sample from the previous one
///
/// Each vital drifts independently within its clamp bounds. A vital missing
/// from the previous sample walks from its baseline instead. The timestamp
/// is the generation instant.
pub fn next_sample<R: Rng>(rng: &mut R, prev: &Sample) -> Sample {
    let hr = drift(rng, prev.hr.map_or(HR_SPEC.baseline, f64::from), &HR_SPEC);
    let spo2 = drift(
        rng,
        prev.spo2.map_or(SPO2_SPEC.baseline, f64::from),
        &SPO2_SPEC,
    );
    let sys = drift(rng, prev.sys.map_or(SYS_SPEC.baseline, f64::from), &SYS_SPEC);
    let dia = drift(rng, prev.dia.map_or(DIA_SPEC.baseline, f64::from), &DIA_SPEC);
    let temp = drift(rng, prev.temp.unwrap_or(TEMP_SPEC.baseline), &TEMP_SPEC);

    Sample {
        timestamp_ms: Utc::now().timestamp_millis(),
        hr: Some(hr.round() as u16),
        spo2: Some(spo2.round() as u8),
        sys: Some(sys.round() as u16),
        dia: Some(dia.round() as u16),
        temp: Some(round1(temp)),
    }
}

/// Builds an `n`-step walk history starting from the baseline, oldest-first
///
/// Used to pre-fill a demo patient's window so sparklines have a past to
/// draw before live ticking begins.
pub fn seed_series<R: Rng>(rng: &mut R, n: usize) -> Vec<Sample> {
    let now_ms = Utc::now().timestamp_millis();
    let mut series = Vec::with_capacity(n.max(1));
    series.push(baseline_sample(now_ms));
    for _ in 1..n {
        let prev = *series.last().expect("series is never empty");
        series.push(next_sample(rng, &prev));
    }
    series
}
