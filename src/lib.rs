//! Canvas Arcade core crate.
//!
//! Two small canvas games built for the browser through `wasm-bindgen`:
//!
//! - [`runner`]: a QWOP-style ragdoll runner (hip + two thigh/calf legs) driven
//!   by four muscle keys.
//! - [`catch`]: a catch / whack ball game where a pointer-driven bat deflects
//!   falling balls and fires shots at them.
//!
//! Each game is split into a pure simulation (native, unit tested) and a
//! `shell` that owns the canvas, DOM and animation-frame loop.

use wasm_bindgen::prelude::*;

pub mod catch;
mod dom;
pub mod error;
pub mod runner;

pub use catch::{CatchGame, CatchParams};
pub use error::{GameError, GameResult};
pub use runner::{Body, DriveInput, FallReason, Pose, RunnerParams, RunnerSim, StepOutcome};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    let _ = console_log::init_with_level(level);
}

/// Default entry point: the runner.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    runner::shell::start_runner()
}
