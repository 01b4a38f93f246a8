//! Line series renderer and a ready-made line chart
//!
//! Used for metric history charts: one value per run, plotted over time with
//! hoverable markers.

use crate::{
    ChartCanvas, ChartRenderer, RenderContext,
    chartkit::{LinePath, PathGenerator, StepPath, area_path},
    colors, renderer,
};
use dq_core::{AxisOptions, CanvasConfig, DataPoint, PixelPoint, Viewport, format_axis_value};
use leptos::prelude::*;

/// How consecutive points are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    #[default]
    Linear,
    Step,
}

impl Curve {
    fn generator(&self) -> Box<dyn PathGenerator> {
        match self {
            Self::Linear => Box::new(LinePath),
            Self::Step => Box::new(StepPath::default()),
        }
    }
}

/// Line series configuration
#[derive(Debug, Clone)]
pub struct LineSeriesConfig {
    pub stroke: String,
    pub stroke_width: f64,
    pub curve: Curve,
    pub show_markers: bool,
    pub marker_radius: f64,
    pub fill_area: bool,
}

impl Default for LineSeriesConfig {
    fn default() -> Self {
        Self {
            stroke: colors::SERIES.to_string(),
            stroke_width: 1.5,
            curve: Curve::Linear,
            show_markers: true,
            marker_radius: 3.0,
            fill_area: false,
        }
    }
}

impl LineSeriesConfig {
    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = color.into();
        self
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn markers(mut self, show: bool) -> Self {
        self.show_markers = show;
        self
    }

    pub fn fill_area(mut self, fill: bool) -> Self {
        self.fill_area = fill;
        self
    }
}

/// Tooltip text for a point: its label, or the formatted value
pub fn point_message(point: &DataPoint) -> String {
    point
        .label
        .clone()
        .unwrap_or_else(|| format_axis_value(point.y, value_precision(point.y)))
}

/// Step hint giving at most two decimals for fractional values
fn value_precision(value: f64) -> f64 {
    if value.fract() == 0.0 { 1.0 } else { 0.01 }
}

/// Renderer drawing `points` as a line with optional markers
pub fn line_series(
    points: Signal<Vec<DataPoint>>,
    config: LineSeriesConfig,
    on_point_click: Option<Callback<DataPoint>>,
) -> ChartRenderer {
    renderer(move |ctx: &RenderContext| {
        let mut data = points.get();
        data.sort_by(|a, b| a.x.total_cmp(&b.x));
        let pixels: Vec<PixelPoint> = data.iter().map(|p| ctx.get_point(p)).collect();

        let generator = config.curve.generator();
        let line = generator.generate(&pixels);
        let area = config
            .fill_area
            .then(|| area_path(&pixels, ctx.area.bottom(), generator.as_ref()));

        let tooltip = ctx.tooltip;
        let radius = config.marker_radius;
        let stroke = config.stroke.clone();

        let markers = config.show_markers.then(|| {
            data.into_iter()
                .zip(pixels.iter().copied())
                .filter(|(_, pixel)| ctx.in_plot(*pixel))
                .map(|(point, pixel)| {
                    let message = point_message(&point);
                    view! {
                        <circle
                            class="dq-marker"
                            cx=pixel.x
                            cy=pixel.y
                            r=radius
                            fill=colors::BG_PANEL
                            stroke=stroke.clone()
                            stroke-width="1.5"
                            on:mouseenter=move |_| tooltip.show(message.clone(), pixel)
                            on:mouseleave=move |_| tooltip.hide()
                            on:mousedown=|ev| ev.stop_propagation()
                            on:click=move |_| {
                                if let Some(cb) = on_point_click {
                                    cb.run(point.clone());
                                }
                            }
                        />
                    }
                })
                .collect_view()
        });

        view! {
            <g class="dq-line-series">
                {area.map(|d| view! {
                    <path d=d fill=config.stroke.clone() fill-opacity="0.12" stroke="none" />
                })}
                <path
                    d=line
                    fill="none"
                    stroke=config.stroke.clone()
                    stroke-width=config.stroke_width
                    stroke-linecap="round"
                    stroke-linejoin="round"
                />
                {markers}
            </g>
        }
        .into_any()
    })
}

/// Single-series line chart on a [`ChartCanvas`]
#[component]
pub fn LineChart(
    #[prop(into)] points: Signal<Vec<DataPoint>>,
    #[prop(into)] axes: Signal<AxisOptions>,
    #[prop(optional)] series: Option<LineSeriesConfig>,
    #[prop(optional)] config: Option<CanvasConfig>,
    #[prop(optional)] on_zoom: Option<Callback<Viewport>>,
    #[prop(optional)] on_autoscale: Option<Callback<Viewport>>,
    #[prop(optional)] on_point_click: Option<Callback<DataPoint>>,
    #[prop(optional)] on_click: Option<Callback<(f64, f64)>>,
) -> impl IntoView {
    let renderers = vec![line_series(points, series.unwrap_or_default(), on_point_click)];

    view! {
        <ChartCanvas
            points=points
            axes=axes
            config=config.unwrap_or_default()
            renderers=renderers
            on_zoom=on_zoom
            on_autoscale=on_autoscale
            on_click=on_click
        />
    }
}
