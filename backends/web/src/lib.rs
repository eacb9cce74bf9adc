#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Web/WASM backend for the Tidemark watermark overlay.
//!
//! This crate hosts the browser half of Tidemark. An [`OverlaySurface`]
//! rasterizes the tiled watermark text into a portable data URI on an
//! offscreen canvas, and a [`WatermarkGuard`] mounts the result into a
//! container element and keeps it there: a pair of mutation observers
//! reverts style tampering on the overlay subtree and re-creates the node
//! whenever the page removes it.
//!
//! The high-level [`TidemarkApp`] entry point wires the two together for
//! JavaScript callers and is the only `wasm_bindgen` surface; everything
//! else is usable from Rust directly.

mod app;
mod dom;
mod error;
mod guard;
mod overlay;

pub use app::{TidemarkApp, TidemarkAppBuilder};
pub use dom::DomHost;
pub use error::WebError;
pub use guard::WatermarkGuard;
pub use overlay::OverlaySurface;
