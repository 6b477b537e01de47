//! Meal AI Web App (Leptos + WASM)

mod app;
mod auth;
mod components;
mod api;
mod image;
mod session;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
