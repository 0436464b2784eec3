// Copyright (c) 2026 rezky_nightky

//! Full-screen falling glyph rain for the terminal.
//!
//! [`run_rain`] drives the crossterm surface; [`run_rain_on`] accepts any
//! [`Surface`], such as the in-memory [`fake::ScriptedSurface`].

pub mod cell;
pub mod charset;
pub mod column;
pub mod config;
pub mod engine;
pub mod error;
pub mod fake;
pub mod frame;
pub mod logging;
pub mod palette;
pub mod runtime;
pub mod surface;
pub mod terminal;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub use crate::cell::Tier;
pub use crate::column::{Column, TrailCell};
pub use crate::config::{RainConfig, RunBound};
pub use crate::engine::RainEngine;
pub use crate::error::EngineError;
pub use crate::runtime::{RainState, RunReport, StopReason};
pub use crate::surface::{Surface, SurfaceGuard};
pub use crate::terminal::TerminalSurface;

/// Runs the rain on the real terminal until a key press or the configured
/// bound.
pub fn run_rain(config: RainConfig) -> Result<(), EngineError> {
    run_rain_report(config).map(|_| ())
}

pub fn run_rain_report(config: RainConfig) -> Result<RunReport, EngineError> {
    let mut surface = TerminalSurface::new(config.palette);
    run_rain_on(&mut surface, config)
}

/// Like [`run_rain_report`], but also stops once `interrupt` is set.
pub fn run_rain_interruptible(
    config: RainConfig,
    interrupt: Arc<AtomicBool>,
) -> Result<RunReport, EngineError> {
    let mut surface = TerminalSurface::new(config.palette);
    RainEngine::new(config)?
        .with_interrupt(interrupt)
        .run(&mut surface)
}

pub fn run_rain_on<S: Surface + ?Sized>(
    surface: &mut S,
    config: RainConfig,
) -> Result<RunReport, EngineError> {
    RainEngine::new(config)?.run(surface)
}
