//! # dq-state
//!
//! Reactive state for a mounted chart canvas.
//! Raw inputs live in Leptos signals; layout, ticks and the data → pixel
//! mapping are derived memos so a drag only re-renders what the viewport
//! touches.

pub mod computed;

pub use computed::*;

use dq_core::{
    AxisOptions, CanvasConfig, ChartViewport, DataPoint, HoverTarget, PixelPoint, PlotArea,
    ZoomOutcome,
};
use leptos::prelude::*;

/// Measured label widths closer than this to the current value are ignored
pub const MEASURE_EPSILON: f64 = 0.5;

// ============================================================================
// CANVAS STATE
// ============================================================================

/// Signals backing one chart canvas
#[derive(Clone, Copy)]
pub struct CanvasState {
    /// Layout configuration, fixed for the lifetime of the canvas
    pub config: StoredValue<CanvasConfig>,
    /// Axis options supplied by the caller
    pub axes: RwSignal<AxisOptions>,
    /// Plotted points
    pub points: RwSignal<Vec<DataPoint>>,
    /// Rendered canvas size (width, height)
    pub size: RwSignal<(f64, f64)>,
    /// Y tick label width measured from the DOM, if a pass has run
    pub measured_label_width: RwSignal<Option<f64>>,
    /// Viewport and interaction state machine
    pub viewport: RwSignal<ChartViewport>,
}

impl CanvasState {
    /// Create canvas state; the initial viewport is derived from `points`
    pub fn new(config: CanvasConfig, axes: AxisOptions, points: Vec<DataPoint>) -> Self {
        let initial = axes.initial_viewport(&points);
        let size = (config.width, config.height);
        Self {
            config: StoredValue::new(config),
            axes: RwSignal::new(axes),
            points: RwSignal::new(points),
            size: RwSignal::new(size),
            measured_label_width: RwSignal::new(None),
            viewport: RwSignal::new(ChartViewport::new(initial)),
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the point set. An active zoom is kept.
    pub fn set_points(&self, points: Vec<DataPoint>) {
        let initial = self.axes.with_untracked(|axes| axes.initial_viewport(&points));
        self.viewport.update(|vp| vp.refresh_initial(initial));
        self.points.set(points);
    }

    /// Replace axis options. Discards zoom and re-measures labels.
    pub fn set_axes(&self, axes: AxisOptions) {
        let initial = self.points.with_untracked(|points| axes.initial_viewport(points));
        tracing::debug!(x = ?initial.x, y = ?initial.y, "axis options changed");
        self.viewport.update(|vp| vp.reset(initial));
        self.measured_label_width.set(None);
        self.axes.set(axes);
    }

    /// Record the rendered size. Sub-pixel changes are ignored.
    pub fn resize(&self, width: f64, height: f64) {
        let (w, h) = self.size.get_untracked();
        if (w - width).abs() < MEASURE_EPSILON && (h - height).abs() < MEASURE_EPSILON {
            return;
        }
        self.size.set((width.max(0.0), height.max(0.0)));
    }

    /// Store a measured Y label width. Returns whether the layout changes.
    pub fn record_label_width(&self, width: f64) -> bool {
        if !width.is_finite() {
            return false;
        }
        let current = self.measured_label_width.get_untracked();
        if !width_changed(current, width) {
            return false;
        }
        tracing::trace!(width, "y label width measured");
        self.measured_label_width.set(Some(width));
        true
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    pub fn begin_drag(&self, point: PixelPoint, area: &PlotArea) -> bool {
        self.viewport
            .try_update(|vp| vp.begin_drag(point, area))
            .unwrap_or(false)
    }

    pub fn update_drag(&self, point: PixelPoint, area: &PlotArea) {
        if self.viewport.with_untracked(ChartViewport::is_dragging) {
            self.viewport.update(|vp| vp.update_drag(point, area));
        }
    }

    pub fn commit_drag(&self, area: &PlotArea) -> ZoomOutcome {
        self.viewport
            .try_update(|vp| vp.commit_drag(area))
            .unwrap_or(ZoomOutcome::Ignored)
    }

    pub fn cancel_drag(&self) {
        if self.viewport.with_untracked(ChartViewport::is_dragging) {
            self.viewport.update(ChartViewport::cancel_drag);
        }
    }

    /// Restore the initial viewport. Returns whether anything changed.
    pub fn autoscale(&self) -> bool {
        self.viewport.try_update(ChartViewport::autoscale).unwrap_or(false)
    }

    pub fn is_zoomed(&self) -> bool {
        self.viewport.with(ChartViewport::is_zoomed)
    }

    pub fn show_tooltip(&self, message: impl Into<String>, anchor: PixelPoint) {
        let target = HoverTarget {
            anchor,
            message: message.into(),
        };
        self.viewport.update(|vp| vp.hover(target));
    }

    pub fn hide_tooltip(&self) {
        if self.viewport.with_untracked(|vp| vp.hover_target().is_some()) {
            self.viewport.update(ChartViewport::leave);
        }
    }
}

/// Whether a newly measured width differs enough from the stored one
pub fn width_changed(current: Option<f64>, measured: f64) -> bool {
    current.is_none_or(|c| (c - measured).abs() >= MEASURE_EPSILON)
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide canvas state to the component subtree
pub fn provide_canvas_state(state: CanvasState) -> CanvasState {
    provide_context(state);
    state
}

/// Use canvas state from context
pub fn use_canvas_state() -> CanvasState {
    expect_context::<CanvasState>()
}

/// Try to get canvas state from context (returns None outside a canvas)
pub fn try_use_canvas_state() -> Option<CanvasState> {
    use_context::<CanvasState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_changed() {
        assert!(width_changed(None, 12.0));
        assert!(!width_changed(Some(12.0), 12.3));
        assert!(width_changed(Some(12.0), 12.5));
        assert!(width_changed(Some(12.0), 30.0));
    }
}
