//! Browser glue for mapping pointer events into SVG user space
//!
//! `offsetX`/`offsetY` ignore the `viewBox` scaling of a responsive SVG, so
//! positions are derived from client coordinates and the element's screen
//! CTM instead.

use dq_core::{Affine2, PixelPoint, screen_to_user_space};
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, SvgGraphicsElement, TouchEvent};

/// Screen transformation matrix of an SVG graphics element. `None` when the
/// element is not an SVG graphics element or is detached.
pub fn screen_ctm<E: JsCast>(element: &E) -> Option<Affine2> {
    let graphics = element.dyn_ref::<SvgGraphicsElement>()?;
    let m = graphics.get_screen_ctm()?;
    Some(Affine2::new(
        m.a() as f64,
        m.b() as f64,
        m.c() as f64,
        m.d() as f64,
        m.e() as f64,
        m.f() as f64,
    ))
}

/// Map the pointer position of `event` into `element`'s local coordinates
pub fn screen_to_svg_coordinates<E: JsCast>(element: &E, event: &MouseEvent) -> Option<PixelPoint> {
    let client = PixelPoint::new(event.client_x() as f64, event.client_y() as f64);
    client_to_svg_coordinates(element, client)
}

/// Map the first touch of `event` into `element`'s local coordinates.
/// On `touchend` the lifted finger is only in `changedTouches`.
pub fn touch_to_svg_coordinates<E: JsCast>(element: &E, event: &TouchEvent) -> Option<PixelPoint> {
    let touch = event.touches().get(0).or_else(|| event.changed_touches().get(0))?;
    let client = PixelPoint::new(touch.client_x() as f64, touch.client_y() as f64);
    client_to_svg_coordinates(element, client)
}

fn client_to_svg_coordinates<E: JsCast>(element: &E, client: PixelPoint) -> Option<PixelPoint> {
    let ctm = screen_ctm(element)?;
    screen_to_user_space(&ctm, client)
}

/// Rendered width of `element` in the user units of its own coordinate
/// system
pub fn user_space_width<E: JsCast>(element: &E) -> Option<f64> {
    let graphics = element.dyn_ref::<SvgGraphicsElement>()?;
    let ctm = screen_ctm(graphics)?;
    let scale_x = ctm.a.hypot(ctm.b);
    if scale_x == 0.0 {
        return None;
    }
    let width = graphics.get_bounding_client_rect().width();
    Some(width / scale_x)
}
