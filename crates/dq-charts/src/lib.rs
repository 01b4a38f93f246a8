//! # dq-charts
//!
//! SVG chart canvas built with Leptos.
//! The canvas owns layout, axes, drag-to-zoom and the tooltip; charts plug
//! in as renderer callbacks that map their data through the canvas scale.
//!
//! ## Modules
//!
//! - `canvas` - `ChartCanvas` coordinator and the renderer contract
//! - `axes` - axis lines, ticks, grid lines and label measurement
//! - `tooltip` - hover tooltip placement
//! - `coordinates` - pointer → SVG user-space mapping
//! - `chartkit` - SVG path primitives
//! - `line` - line series renderer and `LineChart`

pub mod axes;
pub mod canvas;
pub mod chartkit;
pub mod coordinates;
pub mod line;
pub mod tooltip;

pub use axes::*;
pub use canvas::*;
pub use chartkit::*;
pub use coordinates::*;
pub use line::*;
pub use tooltip::*;

// Re-export colors from dq-core for convenience
pub use dq_core::colors;
