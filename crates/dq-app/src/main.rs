//! # dq-app
//!
//! WASM entry point for the data-quality chart component.
//! Installs panic and logging hooks, then mounts the host-driven chart.

mod app;
mod bridge;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("mounting chart component");
    leptos::mount::mount_to_body(App);
}
