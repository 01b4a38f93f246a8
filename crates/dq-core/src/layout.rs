//! Canvas geometry: margins, plot rectangle and the data → pixel mapping

use crate::{AxisOptions, AxisTick, DataPoint, PixelPoint, Range, ScaleMapping, TickBudget, Viewport, scale};

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Compact margins for sparklines
    pub const fn compact() -> Self {
        Self::new(2.0, 2.0, 2.0, 2.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::new(10.0, 16.0, 30.0, 40.0)
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        ViewBox::from(*self).to_string()
    }

    /// Corners of the margin-adjusted plotting rectangle
    pub fn plot_area(&self) -> PlotArea {
        let left = self.margin.left;
        let top = self.margin.top;
        PlotArea::from_bounds(left, top, left + self.inner_width(), top + self.inner_height())
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(600.0, 300.0)
    }
}

/// SVG `viewBox`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<ChartDimensions> for ViewBox {
    fn from(dims: ChartDimensions) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: dims.width,
            height: dims.height,
        }
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// The plotting rectangle in SVG pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotArea {
    pub top_left: PixelPoint,
    pub top_right: PixelPoint,
    pub bottom_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

impl PlotArea {
    pub fn from_bounds(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top_left: PixelPoint::new(left, top),
            top_right: PixelPoint::new(right, top),
            bottom_left: PixelPoint::new(left, bottom),
            bottom_right: PixelPoint::new(right, bottom),
        }
    }

    pub fn left(&self) -> f64 {
        self.top_left.x
    }

    pub fn right(&self) -> f64 {
        self.top_right.x
    }

    pub fn top(&self) -> f64 {
        self.top_left.y
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_left.y
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.left() && point.x <= self.right() && point.y >= self.top() && point.y <= self.bottom()
    }

    pub fn clamp(&self, point: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            point.x.clamp(self.left(), self.right().max(self.left())),
            point.y.clamp(self.top(), self.bottom().max(self.top())),
        )
    }

    /// Pixel interval for the X axis (left → right)
    pub fn x_pixels(&self) -> Range {
        Range::new(self.left(), self.right())
    }

    /// Pixel interval for the Y axis; data min maps to the bottom edge
    pub fn y_pixels(&self) -> Range {
        Range::new(self.bottom(), self.top())
    }
}

// ============================================================================
// DATA → PIXEL MAPPING
// ============================================================================

/// Maps data points into a plot area for a given viewport. A zero-width
/// data range maps to the middle of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotMapper {
    x: ScaleMapping,
    y: ScaleMapping,
    x_zero: f64,
    y_zero: f64,
}

impl PlotMapper {
    pub fn new(area: &PlotArea, viewport: &Viewport) -> Self {
        let x_pixels = area.x_pixels();
        let y_pixels = area.y_pixels();
        Self {
            x: ScaleMapping::new(viewport.x, x_pixels),
            y: ScaleMapping::new(viewport.y, y_pixels),
            x_zero: (x_pixels.min + x_pixels.max) / 2.0,
            y_zero: (y_pixels.min + y_pixels.max) / 2.0,
        }
    }

    pub fn x_to_pixel(&self, x: f64) -> f64 {
        scale(x, &self.x, self.x_zero)
    }

    pub fn y_to_pixel(&self, y: f64) -> f64 {
        scale(y, &self.y, self.y_zero)
    }

    pub fn to_pixel(&self, point: &DataPoint) -> PixelPoint {
        PixelPoint::new(self.x_to_pixel(point.x), self.y_to_pixel(point.y))
    }

    /// Pixel → data, used to recover zoom bounds from a selection
    pub fn to_data(&self, pixel: PixelPoint) -> (f64, f64) {
        let x = scale(pixel.x, &self.x.inverted(), self.x.old.min);
        let y = scale(pixel.y, &self.y.inverted(), self.y.old.min);
        (x, y)
    }
}

// ============================================================================
// TEXT MEASUREMENT & MARGINS
// ============================================================================

/// Text width measurement used for margin layout. The DOM pass replaces the
/// estimate with the rendered width.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Deterministic estimate: average glyph width as a fraction of font size
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    pub char_width_ratio: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self { char_width_ratio: 0.6 }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_ratio
    }
}

/// Widest line among tick labels
pub fn widest_tick_label(ticks: &[AxisTick], measure: &impl TextMeasure, font_size: f64) -> f64 {
    ticks
        .iter()
        .flat_map(|t| t.label.lines())
        .map(|line| measure.text_width(line, font_size))
        .fold(0.0, f64::max)
}

/// Canvas layout configuration
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub tick_length: f64,
    pub tick_label_gap: f64,
    /// Band reserved for a rotated/horizontal axis title
    pub axis_label_band: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub time_ticks: TickBudget,
    /// Distance between a hovered point and its tooltip
    pub tooltip_offset: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            font_size: 11.0,
            line_height: 13.0,
            tick_length: 5.0,
            tick_label_gap: 4.0,
            axis_label_band: 18.0,
            padding_top: 10.0,
            padding_right: 24.0,
            time_ticks: TickBudget::default(),
            tooltip_offset: 10.0,
        }
    }
}

impl CanvasConfig {
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self.line_height = (font_size * 1.2).round();
        self
    }

    pub fn time_ticks(mut self, min: usize, max: usize) -> Self {
        self.time_ticks = TickBudget::new(min, max);
        self
    }

    pub fn tooltip_offset(mut self, offset: f64) -> Self {
        self.tooltip_offset = offset;
        self
    }

    /// Margins for the given axes. Depends only on axis labels, the widest
    /// Y tick label and how many lines X tick labels use, never on zoom.
    pub fn margin(&self, axes: &AxisOptions, y_label_width: f64, x_label_lines: usize) -> ChartMargin {
        let tick_space = self.tick_length + self.tick_label_gap;

        let mut left = y_label_width.max(0.0) + tick_space + 4.0;
        if axes.y.has_label() {
            left += self.axis_label_band;
        }

        let mut bottom = tick_space + x_label_lines.max(1) as f64 * self.line_height;
        if axes.x.has_label() {
            bottom += self.axis_label_band;
        }

        ChartMargin::new(self.padding_top, self.padding_right, bottom, left)
    }

    /// Dimensions for a canvas of `width × height`
    pub fn dimensions(
        &self,
        width: f64,
        height: f64,
        axes: &AxisOptions,
        y_label_width: f64,
        x_label_lines: usize,
    ) -> ChartDimensions {
        ChartDimensions::new(width, height).with_margin(self.margin(axes, y_label_width, x_label_lines))
    }
}
