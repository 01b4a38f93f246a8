//! Root component: host-driven chart with a standalone demo fallback

use crate::bridge::{API_VERSION, ChartArgs, ChartKind, HostBridge, HostEvent, HostMessage};
use chrono::{Duration, Utc};
use dq_charts::{Curve, LineChart, LineSeriesConfig};
use dq_core::{AxisConfig, AxisOptions, CanvasConfig, DataPoint, Viewport};
use leptos::prelude::*;

/// Thirty daily row counts ending today, shown until the host sends data
pub fn demo_args() -> ChartArgs {
    let end = Utc::now();
    let points = (0..30)
        .map(|day| {
            let at = end - Duration::days(29 - day);
            let trend = 1_200.0 + day as f64 * 35.0;
            let wobble = ((day * 7) % 11) as f64 * 18.0;
            let mut point = DataPoint::new(at.timestamp_millis() as f64, trend + wobble);
            if day % 9 == 4 {
                point = point.with_label(format!("{:.0} rows\nthreshold warning", trend + wobble));
            }
            point
        })
        .collect();

    ChartArgs {
        points,
        axes: AxisOptions::new(
            AxisConfig::time().with_label("Run date"),
            AxisConfig::numeric().with_label("Row count").with_grid_lines(true),
        ),
        kind: ChartKind::Line,
        title: Some("Row count".into()),
        height: None,
    }
}

fn series_config(kind: ChartKind) -> LineSeriesConfig {
    match kind {
        ChartKind::Line => LineSeriesConfig::default(),
        ChartKind::Step => LineSeriesConfig::default().curve(Curve::Step),
        ChartKind::Area => LineSeriesConfig::default().fill_area(true),
    }
}

/// Report the document height so the host can size the frame
fn report_frame_height(bridge: HostBridge) {
    request_animation_frame(move || {
        let height = document()
            .body()
            .map(|body| body.scroll_height() as f64)
            .unwrap_or_default();
        if height > 0.0 {
            bridge.notify(HostMessage::SetFrameHeight { height });
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    let bridge = HostBridge::default();
    let args = RwSignal::new(demo_args());

    let listener = StoredValue::new_local(Some(bridge.listen(move |event| match event {
        HostEvent::Render(next) => {
            tracing::debug!(points = next.points.len(), "render args received");
            args.set(next);
        }
    })));
    on_cleanup(move || {
        if let Some(Some(handle)) = listener.try_update_value(Option::take) {
            handle.remove();
        }
    });

    bridge.notify(HostMessage::ComponentReady { api_version: API_VERSION });

    Effect::new(move |_| {
        args.track();
        report_frame_height(bridge);
    });

    let points = Memo::new(move |_| args.with(|a| a.points.clone()));
    let axes = Memo::new(move |_| args.with(|a| a.axes.clone()));
    let kind = Memo::new(move |_| args.with(|a| a.kind));
    let title = Memo::new(move |_| args.with(|a| a.title.clone()));
    let height = Memo::new(move |_| args.with(|a| a.height));

    let on_zoom = Callback::new(move |viewport: Viewport| bridge.notify(HostMessage::ZoomChanged(viewport)));
    let on_autoscale = Callback::new(move |viewport: Viewport| bridge.notify(HostMessage::Autoscaled(viewport)));
    let on_point_click = Callback::new(move |point: DataPoint| {
        bridge.notify(HostMessage::PointClicked {
            x: point.x,
            y: point.y,
            label: point.label,
        })
    });

    let on_plot_click =
        Callback::new(move |(x, y): (f64, f64)| bridge.notify(HostMessage::PlotClicked { x, y }));

    view! {
        <div class="dq-app">
            {move || title.get().map(|t| view! { <h4 class="dq-title">{t}</h4> })}
            {move || {
                let config = height
                    .get()
                    .map(|h| CanvasConfig::default().height(h))
                    .unwrap_or_default();
                view! {
                    <LineChart
                        points=points
                        axes=axes
                        series=series_config(kind.get())
                        config=config
                        on_zoom=on_zoom
                        on_autoscale=on_autoscale
                        on_point_click=on_point_click
                        on_click=on_plot_click
                    />
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_args() {
        let args = demo_args();
        assert_eq!(args.points.len(), 30);
        assert!(args.points.windows(2).all(|w| w[0].x < w[1].x));
        assert!(args.points.iter().any(|p| p.label.is_some()));
    }

    #[test]
    fn test_series_config_by_kind() {
        assert_eq!(series_config(ChartKind::Step).curve, Curve::Step);
        assert!(series_config(ChartKind::Area).fill_area);
        assert!(!series_config(ChartKind::Line).fill_area);
    }
}
