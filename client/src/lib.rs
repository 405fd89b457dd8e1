//! # client
//!
//! Leptos front-end for the Lumina learning platform: the app shell, the
//! session context, the navigation header, and the login/register pages.
//!
//! The crate compiles twice: with `ssr` for server rendering inside the Axum
//! binary, and with `hydrate` for the WASM bundle that takes over in the
//! browser. Network calls only happen under `hydrate`.

pub mod app;
pub mod components;
pub mod consts;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: attach to the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
