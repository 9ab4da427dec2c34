//! Platform host bindings
//!
//! The browser host drives the core through `web::WarpHost`; the native
//! binary drives it directly from `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;
