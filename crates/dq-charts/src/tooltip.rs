//! Hover tooltip placed beside the hovered point

use crate::{colors, coordinates::user_space_width};
use dq_core::{ApproxTextMeasure, PixelPoint, PlotArea, TextMeasure};
use dq_state::{CanvasComputed, CanvasState};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const PADDING: f64 = 6.0;

/// Top-left corner for a `width × height` tooltip anchored at `anchor`.
///
/// The box sits `offset` to the right of the anchor and flips to the left
/// when it would cross the plot's right edge. Vertically it is centred on the
/// anchor and kept inside the plot where the plot is tall enough.
pub fn tooltip_placement(
    anchor: PixelPoint,
    width: f64,
    height: f64,
    offset: f64,
    area: &PlotArea,
) -> PixelPoint {
    let mut x = anchor.x + offset;
    if x + width > area.right() {
        x = anchor.x - offset - width;
    }

    let mut y = anchor.y - height / 2.0;
    if y + height > area.bottom() {
        y = area.bottom() - height;
    }
    if y < area.top() {
        y = area.top();
    }

    PixelPoint::new(x, y)
}

/// Tooltip for the canvas hover target
#[component]
pub fn ChartTooltip(state: CanvasState, computed: CanvasComputed) -> impl IntoView {
    let (offset, font_size, line_height) = state
        .config
        .with_value(|c| (c.tooltip_offset, c.font_size, c.line_height));
    let text_ref: NodeRef<leptos::svg::Text> = NodeRef::new();
    let measured_width = RwSignal::new(None::<f64>);

    // Measure once the text is laid out, then place the box.
    Effect::new(move |_| {
        let visible = computed.tooltip.with(Option::is_some);
        measured_width.set(None);
        if !visible {
            return;
        }
        Timeout::new(0, move || {
            let width = text_ref.get_untracked().and_then(|t| user_space_width(&t));
            if width.is_none() {
                tracing::trace!("tooltip text not measurable, using estimate");
            }
            let _ = measured_width.try_set(width);
        })
        .forget();
    });

    move || {
        computed.tooltip.get().map(|target| {
            let area = computed.plot_area.get();
            let lines: Vec<String> = target.message.lines().map(str::to_owned).collect();

            let estimated = lines
                .iter()
                .map(|l| ApproxTextMeasure::default().text_width(l, font_size))
                .fold(0.0, f64::max);
            let width = measured_width.get().unwrap_or(estimated) + 2.0 * PADDING;
            let height = lines.len().max(1) as f64 * line_height + 2.0 * PADDING;
            let origin = tooltip_placement(target.anchor, width, height, offset, &area);

            view! {
                <g
                    class="dq-tooltip"
                    pointer-events="none"
                    transform=format!("translate({:.2},{:.2})", origin.x, origin.y)
                >
                    <rect
                        width=width
                        height=height
                        rx="3"
                        fill=colors::BG_TOOLTIP
                        stroke=colors::AXIS
                        stroke-width="1"
                    />
                    <text
                        node_ref=text_ref
                        x=PADDING
                        y=PADDING
                        dominant-baseline="hanging"
                        font-size=font_size
                        fill=colors::TEXT_PRIMARY
                    >
                        {lines.into_iter().enumerate().map(|(i, line)| {
                            let dy = if i == 0 { 0.0 } else { line_height };
                            view! { <tspan x=PADDING dy=dy>{line}</tspan> }
                        }).collect_view()}
                    </text>
                </g>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea::from_bounds(40.0, 10.0, 240.0, 110.0)
    }

    #[test]
    fn test_tooltip_right_of_point() {
        let origin = tooltip_placement(PixelPoint::new(100.0, 60.0), 50.0, 20.0, 10.0, &area());
        assert_eq!(origin, PixelPoint::new(110.0, 50.0));
    }

    #[test]
    fn test_tooltip_flips_at_right_edge() {
        let origin = tooltip_placement(PixelPoint::new(220.0, 60.0), 50.0, 20.0, 10.0, &area());
        assert_eq!(origin.x, 160.0);
    }

    #[test]
    fn test_tooltip_stays_inside_vertically() {
        let top = tooltip_placement(PixelPoint::new(100.0, 12.0), 50.0, 20.0, 10.0, &area());
        assert_eq!(top.y, 10.0);
        let bottom = tooltip_placement(PixelPoint::new(100.0, 108.0), 50.0, 20.0, 10.0, &area());
        assert_eq!(bottom.y, 90.0);
    }
}
