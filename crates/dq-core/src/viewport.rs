//! Viewport state and the drag-zoom / hover interaction machine
//!
//! ```text
//! Idle ──pointer-down──▶ DragZooming ──release──▶ Idle   (zoom or click)
//! Idle ──pointer-enter─▶ Hovering    ──leave────▶ Idle
//! ```

use crate::{PixelPoint, PlotArea, PlotMapper, Range};
use serde::{Deserialize, Serialize};

/// Visible data-space ranges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub x: Range,
    pub y: Range,
}

impl Viewport {
    pub const fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }
}

/// Rectangle being dragged out, in local SVG coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSelection {
    pub start: PixelPoint,
    pub current: PixelPoint,
}

impl DragSelection {
    pub fn new(start: PixelPoint) -> Self {
        Self { start, current: start }
    }

    pub fn left(&self) -> f64 {
        self.start.x.min(self.current.x)
    }

    pub fn top(&self) -> f64 {
        self.start.y.min(self.current.y)
    }

    pub fn width(&self) -> f64 {
        (self.current.x - self.start.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.current.y - self.start.y).abs()
    }

    /// A press and release at the same spot
    pub fn is_click(&self) -> bool {
        self.width() == 0.0 && self.height() == 0.0
    }
}

/// Marker currently under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub anchor: PixelPoint,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    DragZooming(DragSelection),
    Hovering(HoverTarget),
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutcome {
    /// The live viewport was replaced
    Zoomed(Viewport),
    /// Zero-size selection, treated as a click at this point
    Click(PixelPoint),
    /// No drag was in progress
    Ignored,
}

/// Live and initial viewports plus the current interaction mode
#[derive(Debug, Clone, PartialEq)]
pub struct ChartViewport {
    initial: Viewport,
    live: Viewport,
    zoomed: bool,
    interaction: Interaction,
}

impl ChartViewport {
    pub fn new(initial: Viewport) -> Self {
        Self {
            initial,
            live: initial,
            zoomed: false,
            interaction: Interaction::Idle,
        }
    }

    pub fn live(&self) -> Viewport {
        self.live
    }

    pub fn initial(&self) -> Viewport {
        self.initial
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selection(&self) -> Option<DragSelection> {
        match self.interaction {
            Interaction::DragZooming(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.selection().is_some()
    }

    pub fn hover_target(&self) -> Option<&HoverTarget> {
        match &self.interaction {
            Interaction::Hovering(target) => Some(target),
            _ => None,
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Replace the snapshot after an explicit axis change; discards zoom
    pub fn reset(&mut self, initial: Viewport) {
        self.initial = initial;
        self.live = initial;
        self.zoomed = false;
        self.interaction = Interaction::Idle;
    }

    /// Update the snapshot for new data. An active zoom is kept.
    pub fn refresh_initial(&mut self, initial: Viewport) {
        self.initial = initial;
        if !self.zoomed {
            self.live = initial;
        }
    }

    /// Restore the snapshot. Returns whether anything changed.
    pub fn autoscale(&mut self) -> bool {
        let changed = self.zoomed || self.live != self.initial;
        self.live = self.initial;
        self.zoomed = false;
        if changed {
            tracing::debug!(x = ?self.live.x, y = ?self.live.y, "autoscale");
        }
        changed
    }

    // ========================================================================
    // Drag to zoom
    // ========================================================================

    /// Start a selection if `point` lies inside the plot area
    pub fn begin_drag(&mut self, point: PixelPoint, area: &PlotArea) -> bool {
        if !area.contains(point) {
            return false;
        }
        self.interaction = Interaction::DragZooming(DragSelection::new(point));
        true
    }

    /// Track the pointer; positions are clamped to the plot area
    pub fn update_drag(&mut self, point: PixelPoint, area: &PlotArea) {
        if let Interaction::DragZooming(selection) = &mut self.interaction {
            selection.current = area.clamp(point);
        }
    }

    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            self.interaction = Interaction::Idle;
        }
    }

    /// Finish the gesture, replacing the live viewport with the selected
    /// data ranges. A zero-width or zero-height selection keeps that axis
    /// unchanged; a point selection is a click.
    pub fn commit_drag(&mut self, area: &PlotArea) -> ZoomOutcome {
        let Interaction::DragZooming(selection) = self.interaction else {
            return ZoomOutcome::Ignored;
        };
        self.interaction = Interaction::Idle;

        if selection.is_click() {
            return ZoomOutcome::Click(selection.start);
        }

        let mapper = PlotMapper::new(area, &self.live);
        let (x1, y1) = mapper.to_data(selection.start);
        let (x2, y2) = mapper.to_data(selection.current);

        let x = if selection.width() > 0.0 { Range::ordered(x1, x2) } else { self.live.x };
        let y = if selection.height() > 0.0 { Range::ordered(y1, y2) } else { self.live.y };

        self.live = Viewport::new(x, y);
        self.zoomed = true;
        tracing::debug!(x = ?x, y = ?y, "zoom committed");

        ZoomOutcome::Zoomed(self.live)
    }

    // ========================================================================
    // Hover
    // ========================================================================

    /// Show a tooltip for a marker; ignored while dragging
    pub fn hover(&mut self, target: HoverTarget) {
        if !self.is_dragging() {
            self.interaction = Interaction::Hovering(target);
        }
    }

    pub fn leave(&mut self) {
        if matches!(self.interaction, Interaction::Hovering(_)) {
            self.interaction = Interaction::Idle;
        }
    }
}

impl Default for ChartViewport {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
