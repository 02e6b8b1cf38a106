//! Infinite pan/zoom freehand drawing surface for the browser.
//!
//! This crate is compiled to WebAssembly and runs in the browser. Strokes are
//! recorded in world space, the viewport maps world space onto a `<canvas>`,
//! and repaints are coalesced to at most one per display frame. The DOM wiring
//! lives in [`host`]; everything else is plain Rust and tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input router, error boundary, and testable [`engine::EngineCore`] |
//! | [`doc`] | Stroke store: committed strokes plus the in-progress one |
//! | [`camera`] | Viewport transform and coordinate conversions |
//! | [`input`] | Tools, modifiers, buttons, and the gesture state machine |
//! | [`scheduler`] | Frame-coalesced redraw scheduling |
//! | [`render`] | Scene painting over the [`render::Surface`] trait |
//! | [`host`] | DOM listeners, `requestAnimationFrame`, and the mounted handle |
//! | [`config`] | Runtime tunables with JSON overrides |
//! | [`consts`] | Zoom limits, cull margin, and default colors |
//! | [`error`] | Host-side error type |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod host;
pub mod input;
pub mod render;
pub mod scheduler;

#[cfg(test)]
mod test_surface;
