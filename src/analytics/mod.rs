//! Analytics computed from stored plant readings.
//!
//! Every computation is a pure function of the record set the reading store
//! returned for one request. The async wrappers only add the fetch.

mod growth;
mod optimal;
mod yield_forecast;

pub use growth::{compute_growth, CorrelationAlignment, GrowthReport};
pub use optimal::{compute_optimal_conditions, OptimalReport};
pub use yield_forecast::{compute_yield, YieldReport};

// ---

/// Arithmetic mean, or `None` for an empty slice.
fn mean(values: &[f64]) -> Option<f64> {
    // ---
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson correlation over the first `min(x.len(), y.len())` pairs.
///
/// `None` when fewer than two pairs exist or either series is constant.
/// The result is clamped to `[-1, 1]` to absorb rounding.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    // ---
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Round half away from zero to two decimal places.
fn round2(value: f64) -> f64 {
    // ---
    (value * 100.0).round() / 100.0
}
