//! # stockboard
//!
//! Leptos + WASM client for the Stockboard stock research dashboard.
//!
//! The crate's core is the authentication and session lifecycle subsystem
//! (`auth`, plus its storage/navigation capabilities in `util`): the
//! client-side half of the OAuth2 authorization-code handshake, bearer
//! credential ownership, navigation guarding, and durable session
//! preferences. Pages and the app shell are the thin presentation layer on
//! top of the REST backend.

pub mod app;
pub mod auth;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install panic/log hooks and hydrate the app.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(crate::app::App);
}
