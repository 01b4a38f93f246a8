//! # dq-core
//!
//! Scaling engine for data-quality charts: nice-number axis bounds, linear
//! data↔pixel mapping, calendar-aware time ticks, smart time labels and the
//! viewport/drag-zoom state the chart canvas runs on.
//!
//! Everything here is plain Rust with no DOM access so it can be tested
//! natively; the Leptos components in `dq-charts` consume it.

pub mod axis;
pub mod error;
pub mod layout;
pub mod nice;
pub mod scale;
pub mod time_labels;
pub mod time_ticks;
pub mod transform;
pub mod viewport;

pub use axis::*;
pub use error::*;
pub use layout::*;
pub use nice::*;
pub use scale::*;
pub use time_labels::*;
pub use time_ticks::*;
pub use transform::*;
pub use viewport::*;

use serde::{Deserialize, Serialize};

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// Closed numeric interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const ZERO: Range = Range { min: 0.0, max: 0.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build a range from two values in any order
    pub fn ordered(a: f64, b: f64) -> Self {
        if a <= b { Self::new(a, b) } else { Self::new(b, a) }
    }

    /// Min/max over a set of values; `None` when the iterator is empty
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// A position in local SVG (pixel) space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A plotted sample. On time axes `x` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const SERIES: &str = "#2196f3";
    pub const PASSED: &str = "#4caf50";
    pub const FAILED: &str = "#ef5350";
    pub const WARNING: &str = "#ff9800";
    pub const BG_PANEL: &str = "#ffffff";
    pub const BG_TOOLTIP: &str = "#fafafa";
    pub const AXIS: &str = "#9e9e9e";
    pub const GRID: &str = "#eeeeee";
    pub const TEXT_PRIMARY: &str = "#212121";
    pub const TEXT_MUTED: &str = "#757575";
    pub const SELECTION: &str = "#1976d2";

    pub fn series_alpha(alpha: f64) -> String {
        format!("rgba(33, 150, 243, {:.2})", alpha)
    }

    pub fn selection_alpha(alpha: f64) -> String {
        format!("rgba(25, 118, 210, {:.2})", alpha)
    }
}
