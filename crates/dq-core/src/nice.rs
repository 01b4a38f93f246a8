//! "Nice number" axis bounds and ticks
//!
//! Values are snapped to the `{1, 2, 5, 10} × 10^k` lattice so axis labels
//! read as round numbers.

use serde::{Deserialize, Serialize};

/// Default number of ticks requested for a value axis
pub const DEFAULT_TICK_COUNT: usize = 4;

/// Half-width used to widen a zero-width range
const DEGENERATE_MARGIN: f64 = 0.5;

/// Result of [`nice_bounds`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub range: f64,
}

/// Snap a positive magnitude onto the `{1, 2, 5, 10} × 10^k` lattice.
///
/// With `round = false` the fraction is rounded up (inclusive thresholds
/// 1, 2, 5). With `round = true` it is rounded to the nearest lattice value
/// using the midpoints 1.5, 3 and 7.
///
/// `value` must be positive; zero, negative or NaN input yields NaN or an
/// otherwise meaningless result.
pub fn nice_number(value: f64, round: bool) -> f64 {
    let exponent = value.log10().floor();
    let magnitude = 10.0_f64.powf(exponent);
    let fraction = value / magnitude;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude
}

/// Expand `[start, end]` outward to round tick boundaries.
///
/// A zero-width range is widened by ±0.5 first. `tick_count` below 2 is
/// treated as 2.
pub fn nice_bounds(start: f64, end: f64, tick_count: usize) -> AxisBounds {
    let (mut start, mut end) = if start <= end { (start, end) } else { (end, start) };
    if start == end {
        start -= DEGENERATE_MARGIN;
        end += DEGENERATE_MARGIN;
    }

    let intervals = tick_count.max(2) - 1;
    let nice_range = nice_number(end - start, false);
    let step = nice_number(nice_range / intervals as f64, true);

    let min = (start / step).floor() * step;
    let max = (end / step).ceil() * step;

    AxisBounds {
        min,
        max,
        step,
        range: max - min,
    }
}

/// Tick values from the snapped minimum to the snapped maximum, inclusive.
pub fn nice_ticks(start: f64, end: f64, tick_count: usize) -> Vec<f64> {
    ticks_for_bounds(&nice_bounds(start, end, tick_count))
}

/// Walk `bounds.min..=bounds.max` in `bounds.step` increments
pub fn ticks_for_bounds(bounds: &AxisBounds) -> Vec<f64> {
    if !(bounds.step > 0.0) || !bounds.min.is_finite() || !bounds.max.is_finite() {
        return Vec::new();
    }

    // Multiplying instead of accumulating keeps the spacing exact.
    let tolerance = bounds.step * 1e-9;
    let mut ticks = Vec::new();
    let mut i = 0usize;
    loop {
        let tick = bounds.min + i as f64 * bounds.step;
        if tick > bounds.max + tolerance {
            break;
        }
        ticks.push(tick);
        i += 1;
    }
    ticks
}
