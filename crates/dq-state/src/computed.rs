//! Derived canvas signals: layout, tick sets and the data → pixel mapping

use crate::CanvasState;
use chrono::Local;
use dq_core::{
    ApproxTextMeasure, AxisKind, AxisTick, ChartDimensions, DragSelection, HoverTarget, PlotArea,
    PlotMapper, Viewport, axis_ticks, widest_tick_label,
};
use leptos::prelude::*;

/// Lines reserved below the plot for X tick labels. Time labels may carry a
/// date line under the time, so two are always reserved and zooming never
/// shifts the plot.
pub fn reserved_x_label_lines(kind: AxisKind) -> usize {
    match kind {
        AxisKind::Numeric => 1,
        AxisKind::Time => 2,
    }
}

/// Computed canvas signals (derived from [`CanvasState`])
#[derive(Clone, Copy)]
pub struct CanvasComputed {
    /// Visible data ranges
    pub live: Memo<Viewport>,
    /// Viewport restored by autoscale
    pub initial: Memo<Viewport>,
    pub zoomed: Memo<bool>,
    /// Rectangle of an in-progress drag
    pub selection: Memo<Option<DragSelection>>,
    /// Tooltip target while hovering a marker
    pub tooltip: Memo<Option<HoverTarget>>,
    /// Y ticks of the initial viewport; the margin is sized for these
    pub label_probe: Memo<Vec<AxisTick>>,
    /// Measured Y label width, or an estimate before the first DOM pass
    pub y_label_width: Memo<f64>,
    pub dimensions: Memo<ChartDimensions>,
    pub plot_area: Memo<PlotArea>,
    pub mapper: Memo<PlotMapper>,
    pub x_ticks: Memo<Vec<AxisTick>>,
    pub y_ticks: Memo<Vec<AxisTick>>,
}

impl CanvasComputed {
    /// Create computed signals from canvas state
    pub fn new(state: &CanvasState) -> Self {
        let config = state.config;
        let axes = state.axes;
        let size = state.size;
        let measured = state.measured_label_width;
        let viewport = state.viewport;

        let live = Memo::new(move |_| viewport.with(|vp| vp.live()));
        let initial = Memo::new(move |_| viewport.with(|vp| vp.initial()));
        let zoomed = Memo::new(move |_| viewport.with(|vp| vp.is_zoomed()));
        let selection = Memo::new(move |_| viewport.with(|vp| vp.selection()));
        let tooltip = Memo::new(move |_| viewport.with(|vp| vp.hover_target().cloned()));

        let label_probe = Memo::new(move |_| {
            let range = initial.get().y;
            let budget = config.with_value(|c| c.time_ticks);
            axes.with(|a| axis_ticks(&a.y, range, budget, &Local))
        });

        let y_label_width = Memo::new(move |_| {
            measured.get().unwrap_or_else(|| {
                let font_size = config.with_value(|c| c.font_size);
                label_probe.with(|ticks| widest_tick_label(ticks, &ApproxTextMeasure::default(), font_size))
            })
        });

        let dimensions = Memo::new(move |_| {
            let (width, height) = size.get();
            let label_width = y_label_width.get();
            axes.with(|a| {
                let lines = reserved_x_label_lines(a.x.kind);
                config.with_value(|c| c.dimensions(width, height, a, label_width, lines))
            })
        });

        let plot_area = Memo::new(move |_| dimensions.get().plot_area());
        let mapper = Memo::new(move |_| PlotMapper::new(&plot_area.get(), &live.get()));

        let x_ticks = Memo::new(move |_| {
            let range = live.get().x;
            let budget = config.with_value(|c| c.time_ticks);
            axes.with(|a| axis_ticks(&a.x, range, budget, &Local))
        });

        let y_ticks = Memo::new(move |_| {
            let range = live.get().y;
            let budget = config.with_value(|c| c.time_ticks);
            axes.with(|a| axis_ticks(&a.y, range, budget, &Local))
        });

        Self {
            live,
            initial,
            zoomed,
            selection,
            tooltip,
            label_probe,
            y_label_width,
            dimensions,
            plot_area,
            mapper,
            x_ticks,
            y_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dq_core::{AxisConfig, AxisOptions, CanvasConfig, DataPoint, PixelPoint, Range, ZoomOutcome};
    use leptos::reactive::owner::Owner;

    fn numeric_state() -> CanvasState {
        let axes = AxisOptions::new(
            AxisConfig::numeric().with_min(0.0).with_max(10.0),
            AxisConfig::numeric().with_min(0.0).with_max(10.0),
        );
        let points = vec![DataPoint::new(2.0, 3.0), DataPoint::new(8.0, 7.0)];
        CanvasState::new(CanvasConfig::default(), axes, points)
    }

    #[test]
    fn test_reserved_lines() {
        assert_eq!(reserved_x_label_lines(AxisKind::Numeric), 1);
        assert_eq!(reserved_x_label_lines(AxisKind::Time), 2);
    }

    #[test]
    fn test_zoom_keeps_layout() {
        let owner = Owner::new();
        owner.with(|| {
            let state = numeric_state();
            let computed = CanvasComputed::new(&state);

            let before = computed.dimensions.get_untracked();
            let area = computed.plot_area.get_untracked();
            assert!(state.begin_drag(PixelPoint::new(area.left() + 1.0, area.top() + 1.0), &area));
            state.update_drag(PixelPoint::new(area.right() - 1.0, area.bottom() - 1.0), &area);
            assert!(matches!(state.commit_drag(&area), ZoomOutcome::Zoomed(_)));

            assert!(computed.zoomed.get_untracked());
            assert_eq!(computed.dimensions.get_untracked(), before);
            assert!(computed.live.get_untracked().x.span() < 10.0);

            assert!(state.autoscale());
            assert_eq!(computed.live.get_untracked().x, Range::new(0.0, 10.0));
        });
    }

    #[test]
    fn test_measured_width_drives_margin() {
        let owner = Owner::new();
        owner.with(|| {
            let state = numeric_state();
            let computed = CanvasComputed::new(&state);
            let estimated = computed.dimensions.get_untracked().margin.left;

            assert!(state.record_label_width(computed.y_label_width.get_untracked() + 20.0));
            let measured = computed.dimensions.get_untracked().margin.left;
            assert!((measured - estimated - 20.0).abs() < 1e-9);

            // Sub-pixel noise does not move the layout.
            let width = computed.y_label_width.get_untracked();
            assert!(!state.record_label_width(width + 0.2));
        });
    }

    #[test]
    fn test_axis_change_resets_zoom() {
        let owner = Owner::new();
        owner.with(|| {
            let state = numeric_state();
            let computed = CanvasComputed::new(&state);
            let area = computed.plot_area.get_untracked();
            state.begin_drag(PixelPoint::new(area.left() + 5.0, area.top() + 5.0), &area);
            state.update_drag(PixelPoint::new(area.left() + 50.0, area.top() + 50.0), &area);
            state.commit_drag(&area);
            assert!(computed.zoomed.get_untracked());

            state.set_axes(AxisOptions::new(
                AxisConfig::numeric().with_min(0.0).with_max(20.0),
                AxisConfig::numeric().with_min(0.0).with_max(20.0),
            ));
            assert!(!computed.zoomed.get_untracked());
            assert_eq!(computed.live.get_untracked().y, Range::new(0.0, 20.0));
        });
    }
}
