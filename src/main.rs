//! Dropbins Frontend Entry Point

mod models;
mod config;
mod host;
mod context;
mod store;
mod components;
mod app;
mod markdown;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger(200, "Dropbins") {
        web_sys::console::warn_1(&format!("[APP] Logger init failed: {}", e).into());
    }
    mount_to_body(App);
}
