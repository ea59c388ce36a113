use chrono::Duration;

use crate::bar::SBar;

pub(crate) fn approx_eq_f64(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON
}

/// Finite value or zero.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Median positive gap between consecutive bar timestamps.
pub(crate) fn nominal_interval(sbars: &[SBar]) -> Option<Duration> {
    let mut gaps: Vec<Duration> = sbars
        .windows(2)
        .map(|pair| pair[1].datetime - pair[0].datetime)
        .filter(|gap| *gap > Duration::zero())
        .collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort();
    Some(gaps[gaps.len() / 2])
}
