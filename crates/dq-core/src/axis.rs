//! Axis options and tick models for the chart canvas

use crate::{
    DataPoint, Range, TickLabel, Viewport, format_smart_time_ticks, millisecond_ticks,
    nice::DEFAULT_TICK_COUNT, nice_bounds, plan_time_ticks, ticks_for_bounds, time_ticks::HOUR_MS,
};
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// Half-width used to widen a single-instant time axis
const DEGENERATE_TIME_MARGIN_MS: f64 = HOUR_MS as f64;
/// Half-width used to widen a single-value numeric axis
const DEGENERATE_VALUE_MARGIN: f64 = 0.5;

/// What values an axis carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisKind {
    #[default]
    Numeric,
    /// Epoch milliseconds with calendar-aware ticks
    Time,
}

/// Per-axis options supplied by the caller. Absent bounds are inferred from
/// the point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisConfig {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub label: Option<String>,
    #[serde(alias = "ticks_count")]
    pub ticks_count: Option<usize>,
    #[serde(alias = "render_line")]
    pub render_line: bool,
    #[serde(alias = "render_grid_lines")]
    pub render_grid_lines: bool,
    pub kind: AxisKind,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            label: None,
            ticks_count: None,
            render_line: true,
            render_grid_lines: false,
            kind: AxisKind::Numeric,
        }
    }
}

impl AxisConfig {
    pub fn numeric() -> Self {
        Self::default()
    }

    pub fn time() -> Self {
        Self {
            kind: AxisKind::Time,
            ..Self::default()
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_ticks_count(mut self, count: usize) -> Self {
        self.ticks_count = Some(count);
        self
    }

    pub fn with_grid_lines(mut self, enabled: bool) -> Self {
        self.render_grid_lines = enabled;
        self
    }

    pub fn with_line(mut self, enabled: bool) -> Self {
        self.render_line = enabled;
        self
    }

    pub fn has_label(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Data range with explicit bounds applied over the inferred ones
    fn resolve(&self, inferred: Option<Range>) -> Option<Range> {
        match (inferred, self.min, self.max) {
            (_, Some(min), Some(max)) => Some(Range::ordered(min, max)),
            (Some(r), min, max) => Some(Range::ordered(min.unwrap_or(r.min), max.unwrap_or(r.max))),
            (None, Some(v), None) | (None, None, Some(v)) => Some(Range::new(v, v)),
            (None, None, None) => None,
        }
    }
}

/// Options for both axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    pub x: AxisConfig,
    pub y: AxisConfig,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            x: AxisConfig::time(),
            y: AxisConfig::numeric(),
        }
    }
}

impl AxisOptions {
    pub fn new(x: AxisConfig, y: AxisConfig) -> Self {
        Self { x, y }
    }

    /// Viewport shown before any zoom.
    ///
    /// The value axis is expanded to nice bounds unless both ends are fixed;
    /// the X axis keeps the exact data extent. An empty point set without
    /// overrides yields zero-width ranges.
    pub fn initial_viewport(&self, points: &[DataPoint]) -> Viewport {
        let x = self
            .x
            .resolve(Range::from_values(points.iter().map(|p| p.x)))
            .map(|r| widen_degenerate(r, self.x.kind))
            .unwrap_or(Range::ZERO);

        let y = match self.y.resolve(Range::from_values(points.iter().map(|p| p.y))) {
            None => Range::ZERO,
            Some(r) if self.y.min.is_some() && self.y.max.is_some() => r,
            Some(r) => {
                let bounds = nice_bounds(r.min, r.max, self.y_tick_count());
                Range::ordered(
                    self.y.min.unwrap_or(bounds.min),
                    self.y.max.unwrap_or(bounds.max),
                )
            }
        };

        Viewport::new(x, y)
    }

    pub fn y_tick_count(&self) -> usize {
        self.y.ticks_count.unwrap_or(DEFAULT_TICK_COUNT)
    }
}

fn widen_degenerate(range: Range, kind: AxisKind) -> Range {
    if !range.is_degenerate() {
        return range;
    }
    let margin = match kind {
        AxisKind::Numeric => DEGENERATE_VALUE_MARGIN,
        AxisKind::Time => DEGENERATE_TIME_MARGIN_MS,
    };
    Range::new(range.min - margin, range.max + margin)
}

// ============================================================================
// TICK MODELS
// ============================================================================

/// Allowed tick count window for time axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBudget {
    pub min: usize,
    pub max: usize,
}

impl TickBudget {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Default for TickBudget {
    fn default() -> Self {
        Self::new(4, 8)
    }
}

/// A tick positioned in data space with its rendered label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: TickLabel,
}

/// Ticks for a value axis over the visible `range`
pub fn numeric_axis_ticks(range: Range, tick_count: usize) -> Vec<AxisTick> {
    if range.is_degenerate() {
        return Vec::new();
    }
    let bounds = nice_bounds(range.min, range.max, tick_count);
    let tolerance = bounds.step * 1e-9;

    ticks_for_bounds(&bounds)
        .into_iter()
        .filter(|v| *v >= range.min - tolerance && *v <= range.max + tolerance)
        .map(|value| AxisTick {
            value,
            label: TickLabel::Single(format_axis_value(value, bounds.step)),
        })
        .collect()
}

/// Ticks for a time axis over the visible `range` (epoch milliseconds)
pub fn time_axis_ticks<Tz: TimeZone>(range: Range, budget: TickBudget, tz: &Tz) -> Vec<AxisTick>
where
    Tz::Offset: std::fmt::Display,
{
    if range.is_degenerate() {
        return Vec::new();
    }
    let endpoints = [range.min.floor() as i64, range.max.ceil() as i64];
    let plan = plan_time_ticks(&endpoints, budget.min, budget.max, tz);

    let in_range = |ticks: Vec<i64>| -> Vec<i64> {
        ticks.into_iter().filter(|t| range.contains(*t as f64)).collect()
    };

    let mut ticks = in_range(plan.ticks);
    if ticks.len() < 2 {
        tracing::debug!(
            visible = ticks.len(),
            "calendar ticks too sparse for range, using millisecond step"
        );
        ticks = in_range(millisecond_ticks(endpoints[0], endpoints[1], budget.max));
    }

    let visible: Vec<_> = ticks
        .into_iter()
        .filter_map(|t| tz.timestamp_millis_opt(t).single())
        .collect();

    let labels = format_smart_time_ticks(&visible);
    visible
        .iter()
        .zip(labels)
        .map(|(tick, label)| AxisTick {
            value: tick.timestamp_millis() as f64,
            label,
        })
        .collect()
}

/// Ticks for either axis kind
pub fn axis_ticks<Tz: TimeZone>(
    config: &AxisConfig,
    range: Range,
    budget: TickBudget,
    tz: &Tz,
) -> Vec<AxisTick>
where
    Tz::Offset: std::fmt::Display,
{
    match config.kind {
        AxisKind::Numeric => {
            numeric_axis_ticks(range, config.ticks_count.unwrap_or(DEFAULT_TICK_COUNT))
        }
        AxisKind::Time => {
            let budget = config
                .ticks_count
                .map(|max| TickBudget::new(budget.min.min(max), max))
                .unwrap_or(budget);
            time_axis_ticks(range, budget, tz)
        }
    }
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Format a tick value with just enough decimals for `step`; large values
/// use K/M/B suffixes
pub fn format_axis_value(value: f64, step: f64) -> String {
    let value = if value.abs() < step.abs() * 1e-9 { 0.0 } else { value };
    let abs = value.abs();

    let (scaled, step, suffix) = if abs >= 1_000_000_000.0 {
        (value / 1_000_000_000.0, step / 1_000_000_000.0, "B")
    } else if abs >= 1_000_000.0 {
        (value / 1_000_000.0, step / 1_000_000.0, "M")
    } else if abs >= 10_000.0 {
        (value / 1_000.0, step / 1_000.0, "K")
    } else {
        (value, step, "")
    };

    format!("{:.prec$}{}", scaled, suffix, prec = step_decimals(step))
}

fn step_decimals(step: f64) -> usize {
    if !(step > 0.0) || step >= 1.0 {
        return 0;
    }
    let decimals = -step.log10().floor();
    // 0.25-style steps need one digit more than their magnitude
    let extra = if (step * 10_f64.powf(decimals)).fract().abs() > 1e-9 { 1.0 } else { 0.0 };
    (decimals + extra).clamp(0.0, 12.0) as usize
}
