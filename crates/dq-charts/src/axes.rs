//! Axis lines, tick labels, grid lines and axis titles

use crate::{colors, coordinates::user_space_width};
use dq_core::TickLabel;
use dq_state::{CanvasComputed, CanvasState};
use leptos::prelude::*;

const FONT_FAMILY: &str = "Inter, Roboto, sans-serif";

/// Tick label lines as stacked `<tspan>`s anchored at `x`
fn label_lines(label: TickLabel, x: f64, line_height: f64) -> impl IntoView {
    label
        .lines()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let dy = if i == 0 { 0.0 } else { line_height };
            view! { <tspan x=x dy=dy>{line.to_string()}</tspan> }
        })
        .collect_view()
}

/// X and Y axes of a canvas
#[component]
pub fn ChartAxes(state: CanvasState, computed: CanvasComputed) -> impl IntoView {
    let (font_size, line_height, tick_length, gap) = state
        .config
        .with_value(|c| (c.font_size, c.line_height, c.tick_length, c.tick_label_gap));

    let x_axis = move || {
        let area = computed.plot_area.get();
        let mapper = computed.mapper.get();
        let height = computed.dimensions.get().height;
        let axis = state.axes.with(|a| a.x.clone());
        let ticks = computed.x_ticks.get();
        let label_y = area.bottom() + tick_length + gap;

        let grid = axis.render_grid_lines.then(|| {
            ticks
                .iter()
                .map(|tick| {
                    let x = mapper.x_to_pixel(tick.value);
                    view! {
                        <line
                            class="dq-grid"
                            x1=x y1=area.top()
                            x2=x y2=area.bottom()
                            stroke=colors::GRID
                            stroke-width="1"
                        />
                    }
                })
                .collect_view()
        });

        let line = axis.render_line.then(|| {
            view! {
                <line
                    x1=area.left() y1=area.bottom()
                    x2=area.right() y2=area.bottom()
                    stroke=colors::AXIS
                    stroke-width="1"
                />
            }
        });

        let title = axis.label.filter(|l| !l.is_empty()).map(|label| {
            view! {
                <text
                    class="dq-axis-title"
                    x=(area.left() + area.right()) / 2.0
                    y=height - 4.0
                    text-anchor="middle"
                    font-size=font_size
                    font-family=FONT_FAMILY
                    fill=colors::TEXT_PRIMARY
                >
                    {label}
                </text>
            }
        });

        view! {
            <g class="dq-axis dq-axis-x">
                {grid}
                {line}
                {ticks.into_iter().map(|tick| {
                    let x = mapper.x_to_pixel(tick.value);
                    view! {
                        <g class="dq-tick">
                            <line
                                x1=x y1=area.bottom()
                                x2=x y2=area.bottom() + tick_length
                                stroke=colors::AXIS
                            />
                            <text
                                x=x
                                y=label_y
                                text-anchor="middle"
                                dominant-baseline="hanging"
                                font-size=font_size
                                font-family=FONT_FAMILY
                                fill=colors::TEXT_MUTED
                            >
                                {label_lines(tick.label, x, line_height)}
                            </text>
                        </g>
                    }
                }).collect_view()}
                {title}
            </g>
        }
    };

    let y_axis = move || {
        let area = computed.plot_area.get();
        let mapper = computed.mapper.get();
        let axis = state.axes.with(|a| a.y.clone());
        let ticks = computed.y_ticks.get();
        let label_x = area.left() - tick_length - gap;

        let grid = axis.render_grid_lines.then(|| {
            ticks
                .iter()
                .map(|tick| {
                    let y = mapper.y_to_pixel(tick.value);
                    view! {
                        <line
                            class="dq-grid"
                            x1=area.left() y1=y
                            x2=area.right() y2=y
                            stroke=colors::GRID
                            stroke-width="1"
                        />
                    }
                })
                .collect_view()
        });

        let line = axis.render_line.then(|| {
            view! {
                <line
                    x1=area.left() y1=area.top()
                    x2=area.left() y2=area.bottom()
                    stroke=colors::AXIS
                    stroke-width="1"
                />
            }
        });

        let title = axis.label.filter(|l| !l.is_empty()).map(|label| {
            let x = font_size;
            let y = (area.top() + area.bottom()) / 2.0;
            view! {
                <text
                    class="dq-axis-title"
                    x=x
                    y=y
                    transform=format!("rotate(-90 {x} {y})")
                    text-anchor="middle"
                    font-size=font_size
                    font-family=FONT_FAMILY
                    fill=colors::TEXT_PRIMARY
                >
                    {label}
                </text>
            }
        });

        view! {
            <g class="dq-axis dq-axis-y">
                {grid}
                {line}
                {ticks.into_iter().map(|tick| {
                    let y = mapper.y_to_pixel(tick.value);
                    view! {
                        <g class="dq-tick">
                            <line
                                x1=area.left() - tick_length y1=y
                                x2=area.left() y2=y
                                stroke=colors::AXIS
                            />
                            <text
                                x=label_x
                                y=y
                                text-anchor="end"
                                dominant-baseline="middle"
                                font-size=font_size
                                font-family=FONT_FAMILY
                                fill=colors::TEXT_MUTED
                            >
                                {label_lines(tick.label, label_x, line_height)}
                            </text>
                        </g>
                    }
                }).collect_view()}
                {title}
            </g>
        }
    };

    view! {
        {x_axis}
        {y_axis}
    }
}

/// Invisible copy of the initial Y tick labels. Its rendered width sizes the
/// left margin, so zooming never moves the plot.
#[component]
pub fn LabelProbe(state: CanvasState, computed: CanvasComputed) -> impl IntoView {
    let font_size = state.config.with_value(|c| c.font_size);
    let probe_ref: NodeRef<leptos::svg::G> = NodeRef::new();

    Effect::new(move |_| {
        computed.label_probe.track();
        request_animation_frame(move || {
            match probe_ref.get_untracked().and_then(|g| user_space_width(&g)) {
                Some(width) => {
                    state.record_label_width(width);
                }
                None => tracing::warn!("label probe not measurable, keeping estimated margin"),
            }
        });
    });

    view! {
        <g node_ref=probe_ref class="dq-label-probe" visibility="hidden" aria-hidden="true">
            {move || {
                let ticks = computed.label_probe.get();
                let lines: Vec<String> = ticks
                    .iter()
                    .flat_map(|tick| tick.label.lines())
                    .map(str::to_owned)
                    .collect();
                lines.into_iter().enumerate().map(|(i, line)| {
                    view! {
                        <text
                            x="0"
                            y=i as f64 * font_size
                            font-size=font_size
                            font-family=FONT_FAMILY
                        >
                            {line}
                        </text>
                    }
                }).collect_view()
            }}
        </g>
    }
}
