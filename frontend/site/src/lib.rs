//! Behaviour for the portfolio pages.
//!
//! The state machines are plain Rust and tested natively, the `dom` module
//! binds them to the page when built for the browser.

pub mod carousel;
pub mod form;
pub mod gallery;
pub mod particles;
pub mod pointer;
pub mod scroll;
pub mod typing;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod tracing_wasm;
