//! Message bridge between the chart frame and its host page
//!
//! The host renders the chart inside an iframe and talks to it with
//! `postMessage`. Both directions use a `{"type": ..., "data": ...}`
//! envelope.

use dq_core::{AxisOptions, ChartError, ChartResult, DataPoint, Viewport};
use leptos::{ev, prelude::*};
use serde::{Deserialize, Serialize};

/// Protocol version announced in `componentReady`
pub const API_VERSION: u32 = 1;

// ============================================================================
// MESSAGE ENVELOPES
// ============================================================================

/// Messages sent from the chart to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HostMessage {
    ComponentReady {
        #[serde(rename = "apiVersion")]
        api_version: u32,
    },
    SetFrameHeight {
        height: f64,
    },
    ZoomChanged(Viewport),
    Autoscaled(Viewport),
    PointClicked {
        x: f64,
        y: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Click on empty plot space, in data coordinates
    PlotClicked {
        x: f64,
        y: f64,
    },
}

/// Messages received from the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HostEvent {
    Render(ChartArgs),
}

impl HostEvent {
    pub fn from_json(text: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// How the series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    #[default]
    Line,
    Step,
    Area,
}

/// Component arguments supplied by the host
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartArgs {
    pub points: Vec<DataPoint>,
    pub axes: AxisOptions,
    pub kind: ChartKind,
    pub title: Option<String>,
    /// Canvas height in pixels; the width follows the frame
    pub height: Option<f64>,
}

impl ChartArgs {
    pub fn from_json(text: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// HOST BRIDGE
// ============================================================================

/// Posts [`HostMessage`]s to the parent frame
#[derive(Debug, Clone, Copy)]
pub struct HostBridge {
    target_origin: &'static str,
}

impl Default for HostBridge {
    fn default() -> Self {
        Self { target_origin: "*" }
    }
}

impl HostBridge {
    /// Post a message to the parent frame
    pub fn send(&self, message: &HostMessage) -> ChartResult<()> {
        let json = serde_json::to_string(message).map_err(|e| ChartError::PostMessage(e.to_string()))?;
        let window = web_sys::window().ok_or(ChartError::Unavailable("window"))?;
        let parent = window
            .parent()
            .map_err(|e| ChartError::PostMessage(format!("{e:?}")))?
            .ok_or(ChartError::Unavailable("parent frame"))?;
        if js_sys::Object::is(&parent, &window) {
            return Err(ChartError::Unavailable("parent frame"));
        }
        let payload = js_sys::JSON::parse(&json).map_err(|e| ChartError::PostMessage(format!("{e:?}")))?;

        parent
            .post_message(&payload, self.target_origin)
            .map_err(|e| ChartError::PostMessage(format!("{e:?}")))
    }

    /// Post a message, logging failures
    pub fn notify(&self, message: HostMessage) {
        tracing::debug!(?message, "posting to host");
        match self.send(&message) {
            Ok(()) => {}
            Err(e @ ChartError::Unavailable(_)) => tracing::debug!("not embedded, {}", e),
            Err(e) => tracing::warn!("host message dropped: {}", e),
        }
    }

    /// Dispatch host events to `on_event` until the handle is removed
    pub fn listen(&self, on_event: impl Fn(HostEvent) + 'static) -> WindowListenerHandle {
        window_event_listener(ev::message, move |event| {
            let Some(text) = message_text(&event) else {
                tracing::trace!("ignoring non-JSON message");
                return;
            };
            match HostEvent::from_json(&text) {
                Ok(host_event) => on_event(host_event),
                Err(e) => tracing::warn!("failed to parse host message: {}", e),
            }
        })
    }
}

/// Message payload as JSON text; hosts may post strings or objects
fn message_text(event: &web_sys::MessageEvent) -> Option<String> {
    let data = event.data();
    data.as_string()
        .or_else(|| js_sys::JSON::stringify(&data).ok().map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dq_core::{AxisKind, Range};

    #[test]
    fn test_host_message_envelope() {
        let ready = serde_json::to_value(HostMessage::ComponentReady { api_version: API_VERSION }).unwrap();
        assert_eq!(ready, serde_json::json!({"type": "componentReady", "data": {"apiVersion": 1}}));

        let zoom = HostMessage::ZoomChanged(Viewport::new(Range::new(2.0, 6.0), Range::new(4.0, 8.0)));
        let value = serde_json::to_value(zoom).unwrap();
        assert_eq!(value["type"], "zoomChanged");
        assert_eq!(value["data"]["x"]["min"], 2.0);
        assert_eq!(value["data"]["y"]["max"], 8.0);

        let click = HostMessage::PointClicked { x: 1.0, y: 2.0, label: None };
        let value = serde_json::to_value(click).unwrap();
        assert!(value["data"].get("label").is_none());

        let plot_click = serde_json::to_value(HostMessage::PlotClicked { x: 3.5, y: 12.0 }).unwrap();
        assert_eq!(plot_click, serde_json::json!({"type": "plotClicked", "data": {"x": 3.5, "y": 12.0}}));
    }

    #[test]
    fn test_render_event() {
        let event = HostEvent::from_json(
            r#"{"type": "render", "data": {
                "points": [{"x": 1704067200000, "y": 12}, {"x": 1704153600000, "y": 15, "label": "15 rows"}],
                "axes": {"x": {"kind": "time", "label": "Run"}, "y": {"min": 0, "render_grid_lines": true}},
                "kind": "step",
                "height": 240
            }}"#,
        )
        .unwrap();

        let HostEvent::Render(args) = event;
        assert_eq!(args.points.len(), 2);
        assert_eq!(args.points[1].label.as_deref(), Some("15 rows"));
        assert_eq!(args.axes.x.kind, AxisKind::Time);
        assert!(args.axes.y.render_grid_lines);
        assert_eq!(args.kind, ChartKind::Step);
        assert_eq!(args.height, Some(240.0));
    }

    #[test]
    fn test_args_defaults() {
        let args = ChartArgs::from_json("{}").unwrap();
        assert!(args.points.is_empty());
        assert_eq!(args.kind, ChartKind::Line);
        assert_eq!(args.axes.x.kind, AxisKind::Time);
    }

    #[test]
    fn test_invalid_args() {
        let err = ChartArgs::from_json(r#"{"points": "nope"}"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidArgs(_)));
        assert!(err.to_string().starts_with("invalid chart arguments"));
    }
}
