//! Chart canvas coordinator
//!
//! Owns the canvas state for one chart: derives layout and ticks, renders
//! axes and series, and runs the drag-to-zoom gesture.
//!
//! ```text
//!  points + axes ──▶ CanvasState ──▶ CanvasComputed ──▶ axes / renderers
//!                        ▲                                   │
//!                        └──── drag, hover, autoscale ◀──────┘
//! ```

use crate::{
    axes::{ChartAxes, LabelProbe},
    colors,
    coordinates::{screen_to_svg_coordinates, touch_to_svg_coordinates},
    tooltip::ChartTooltip,
};
use dq_core::{
    AxisOptions, CanvasConfig, DataPoint, PixelPoint, PlotArea, PlotMapper, ViewBox, Viewport,
    ZoomOutcome,
};
use dq_state::{CanvasComputed, CanvasState, provide_canvas_state};
use leptos::{ev, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// RENDERER CONTRACT
// ============================================================================

/// Draws one layer of the chart for the current layout and viewport
pub type ChartRenderer = Arc<dyn Fn(&RenderContext) -> AnyView + Send + Sync>;

/// Wrap a closure as a [`ChartRenderer`]
pub fn renderer<F>(render: F) -> ChartRenderer
where
    F: Fn(&RenderContext) -> AnyView + Send + Sync + 'static,
{
    Arc::new(render)
}

/// Show/hide callbacks for the canvas tooltip
#[derive(Clone, Copy)]
pub struct TooltipHandle {
    show: Callback<(String, PixelPoint)>,
    hide: Callback<()>,
}

impl TooltipHandle {
    pub fn new(show: Callback<(String, PixelPoint)>, hide: Callback<()>) -> Self {
        Self { show, hide }
    }

    pub fn show(&self, message: impl Into<String>, point: PixelPoint) {
        self.show.run((message.into(), point));
    }

    pub fn hide(&self) {
        self.hide.run(());
    }
}

/// Everything a renderer needs to place its marks
#[derive(Clone)]
pub struct RenderContext {
    pub view_box: ViewBox,
    pub area: PlotArea,
    pub viewport: Viewport,
    pub mapper: PlotMapper,
    pub tooltip: TooltipHandle,
}

impl RenderContext {
    /// Pixel position of a data point
    pub fn get_point(&self, point: &DataPoint) -> PixelPoint {
        self.mapper.to_pixel(point)
    }

    /// Whether a pixel lies inside the plot rectangle
    pub fn in_plot(&self, pixel: PixelPoint) -> bool {
        self.area.contains(pixel)
    }
}

// ============================================================================
// WINDOW LISTENERS
// ============================================================================

/// Window listeners owned by one canvas
#[derive(Default)]
struct WindowListeners {
    resize: Option<WindowListenerHandle>,
    drag: Vec<WindowListenerHandle>,
}

impl WindowListeners {
    fn detach_drag(&mut self) {
        for handle in self.drag.drain(..) {
            handle.remove();
        }
    }

    fn detach_all(&mut self) {
        self.detach_drag();
        if let Some(handle) = self.resize.take() {
            handle.remove();
        }
    }
}

// ============================================================================
// CANVAS COMPONENT
// ============================================================================

/// Coordinate-scaling SVG canvas.
///
/// Layers are drawn by `renderers` in order, clipped to the plot area.
/// `on_zoom` fires with the new viewport after a drag, `on_autoscale` after
/// the autoscale button restores the initial viewport and `on_click` with
/// the data coordinates of a click inside the plot.
#[component]
pub fn ChartCanvas(
    #[prop(into)] points: Signal<Vec<DataPoint>>,
    #[prop(into)] axes: Signal<AxisOptions>,
    #[prop(optional)] config: Option<CanvasConfig>,
    #[prop(optional)] renderers: Vec<ChartRenderer>,
    #[prop(optional_no_strip)] on_zoom: Option<Callback<Viewport>>,
    #[prop(optional_no_strip)] on_autoscale: Option<Callback<Viewport>>,
    #[prop(optional_no_strip)] on_click: Option<Callback<(f64, f64)>>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let state = provide_canvas_state(CanvasState::new(
        config,
        axes.get_untracked(),
        points.get_untracked(),
    ));
    let computed = CanvasComputed::new(&state);
    provide_context(computed);

    let clip_id = format!("dq-clip-{}", Uuid::new_v4().simple());
    let renderers = StoredValue::new(renderers);
    let listeners = StoredValue::new_local(WindowListeners::default());

    let svg_ref: NodeRef<leptos::svg::Svg> = NodeRef::new();
    let container_ref: NodeRef<leptos::html::Div> = NodeRef::new();

    // ========================================================================
    // Inputs
    // ========================================================================

    Effect::new(move |_| {
        let next = points.get();
        if state.points.with_untracked(|current| current != &next) {
            state.set_points(next);
        }
    });

    Effect::new(move |_| {
        let next = axes.get();
        if state.axes.with_untracked(|current| current != &next) {
            state.set_axes(next);
        }
    });

    // ========================================================================
    // Size
    // ========================================================================

    let measure_container = move || {
        let Some(div) = container_ref.get_untracked() else {
            return;
        };
        let width = div.client_width() as f64;
        if width > 0.0 {
            let (_, height) = state.size.get_untracked();
            state.resize(width, height);
        }
    };

    Effect::new(move |_| {
        if container_ref.get().is_some() {
            measure_container();
        }
    });

    let resize = window_event_listener(ev::resize, move |_| measure_container());
    listeners.update_value(|l| l.resize = Some(resize));

    // ========================================================================
    // Drag to zoom
    // ========================================================================

    let finish_drag = move || {
        listeners.try_update_value(WindowListeners::detach_drag);
        let area = computed.plot_area.get_untracked();
        match state.commit_drag(&area) {
            ZoomOutcome::Zoomed(viewport) => {
                if let Some(cb) = on_zoom {
                    cb.run(viewport);
                }
            }
            ZoomOutcome::Click(pixel) => {
                let data = computed.mapper.get_untracked().to_data(pixel);
                if let Some(cb) = on_click {
                    cb.run(data);
                }
            }
            ZoomOutcome::Ignored => {}
        }
    };

    let cancel_drag = move || {
        listeners.try_update_value(WindowListeners::detach_drag);
        state.cancel_drag();
    };

    let attach_drag_listeners = move || {
        let handles = vec![
            window_event_listener(ev::mousemove, move |event| {
                let Some(svg) = svg_ref.get_untracked() else {
                    return;
                };
                if let Some(point) = screen_to_svg_coordinates(&svg, &event) {
                    state.update_drag(point, &computed.plot_area.get_untracked());
                }
            }),
            window_event_listener(ev::touchmove, move |event| {
                let Some(svg) = svg_ref.get_untracked() else {
                    return;
                };
                if let Some(point) = touch_to_svg_coordinates(&svg, &event) {
                    state.update_drag(point, &computed.plot_area.get_untracked());
                }
            }),
            window_event_listener(ev::mouseup, move |_| finish_drag()),
            window_event_listener(ev::touchend, move |_| finish_drag()),
            window_event_listener(ev::touchcancel, move |_| cancel_drag()),
            window_event_listener(ev::blur, move |_| cancel_drag()),
        ];
        listeners.update_value(|l| {
            l.detach_drag();
            l.drag = handles;
        });
    };

    let start_drag = move |point: Option<PixelPoint>| -> bool {
        let Some(point) = point else {
            tracing::warn!("svg has no screen transform, ignoring drag");
            return false;
        };
        let area = computed.plot_area.get_untracked();
        if !state.begin_drag(point, &area) {
            return false;
        }
        attach_drag_listeners();
        true
    };

    let on_mouse_down = move |event: ev::MouseEvent| {
        if event.button() != 0 {
            return;
        }
        let Some(svg) = svg_ref.get_untracked() else {
            return;
        };
        if start_drag(screen_to_svg_coordinates(&svg, &event)) {
            event.prevent_default();
        }
    };

    let on_touch_start = move |event: ev::TouchEvent| {
        if event.touches().length() != 1 {
            return;
        }
        let Some(svg) = svg_ref.get_untracked() else {
            return;
        };
        if start_drag(touch_to_svg_coordinates(&svg, &event)) {
            event.prevent_default();
        }
    };

    on_cleanup(move || {
        listeners.try_update_value(WindowListeners::detach_all);
    });

    // ========================================================================
    // Layers
    // ========================================================================

    let tooltip = TooltipHandle::new(
        Callback::new(move |(message, point): (String, PixelPoint)| {
            state.show_tooltip(message, point)
        }),
        Callback::new(move |_| state.hide_tooltip()),
    );

    let series = move || {
        let ctx = RenderContext {
            view_box: computed.dimensions.get().into(),
            area: computed.plot_area.get(),
            viewport: computed.live.get(),
            mapper: computed.mapper.get(),
            tooltip,
        };
        renderers.with_value(|layers| layers.iter().map(|render| render(&ctx)).collect_view())
    };

    let selection = move || {
        computed.selection.get().map(|s| {
            view! {
                <rect
                    class="dq-selection"
                    x=s.left()
                    y=s.top()
                    width=s.width()
                    height=s.height()
                    fill=colors::selection_alpha(0.12)
                    stroke=colors::SELECTION
                    stroke-width="1"
                    stroke-dasharray="4,3"
                    pointer-events="none"
                />
            }
        })
    };

    let autoscale = move |_| {
        if state.autoscale() {
            let viewport = state.viewport.with_untracked(|vp| vp.live());
            if let Some(cb) = on_autoscale {
                cb.run(viewport);
            }
        }
    };

    view! {
        <div
            node_ref=container_ref
            class="dq-chart-canvas"
            style="position: relative; width: 100%;"
        >
            <svg
                node_ref=svg_ref
                class="dq-chart"
                viewBox=move || computed.dimensions.get().viewbox()
                preserveAspectRatio="xMidYMid meet"
                style="width: 100%; height: auto; user-select: none; cursor: crosshair;"
                on:mousedown=on_mouse_down
                on:touchstart=on_touch_start
                on:mouseleave=move |_| state.hide_tooltip()
            >
                <defs>
                    <clipPath id=clip_id.clone()>
                        <rect
                            x=move || computed.plot_area.get().left()
                            y=move || computed.plot_area.get().top()
                            width=move || computed.plot_area.get().width()
                            height=move || computed.plot_area.get().height()
                        />
                    </clipPath>
                </defs>

                <ChartAxes state=state computed=computed />
                <LabelProbe state=state computed=computed />

                <g class="dq-series" clip-path=format!("url(#{clip_id})")>
                    {series}
                </g>

                {selection}
                <ChartTooltip state=state computed=computed />
            </svg>

            <Show when=move || computed.zoomed.get()>
                <button
                    class="dq-autoscale"
                    type="button"
                    title="Reset zoom"
                    style="position: absolute; top: 4px; right: 4px;"
                    on:click=autoscale
                >
                    "Autoscale"
                </button>
            </Show>
        </div>
    }
}
