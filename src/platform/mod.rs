//! Platform layer
//!
//! Browser glue on wasm32; a headless harness everywhere else. The
//! headless module is also what the native binary and whole-session tests
//! drive instead of real input devices.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;
