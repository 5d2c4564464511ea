//! Weighted, re-normalized scoring of check components

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One score component: a value in [0,1] and its declared weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub value: f64,
    pub weight: f64,
}

impl ScoreComponent {
    /// Builds a component with its value clamped to [0,1].
    pub fn new(value: f64, weight: f64) -> Self {
        Self {
            value: clamp_unit(value),
            weight,
        }
    }

    pub fn from_bool(passed: bool, weight: f64) -> Self {
        Self::new(if passed { 1.0 } else { 0.0 }, weight)
    }
}

/// NaN counts as 0.
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Convex combination of clamped component values.
///
/// Weights are re-normalized by their sum, so callers need not pre-normalize.
/// Negative weights count as zero; when every weight is zero the total
/// defaults to 1.0 and the score is 0.
pub fn weighted_score(components: &IndexMap<String, ScoreComponent>) -> f64 {
    let total: f64 = components.values().map(|c| c.weight.max(0.0)).sum();
    let total = if total > 0.0 { total } else { 1.0 };

    components
        .values()
        .map(|c| clamp_unit(c.value) * (c.weight.max(0.0) / total))
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

/// User-facing 0-100 score. Halves round away from zero (62.5 -> 63).
pub fn to_percent(score: f64) -> u8 {
    (clamp_unit(score) * 100.0).round() as u8
}
