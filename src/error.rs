// Copyright (c) 2026 rezky_nightky

use std::io;

use thiserror::Error;

/// Errors surfaced by the rain engine and its surfaces.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The output cannot be driven as a raw, cell-addressable terminal.
    #[error("terminal surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The configuration was rejected before any terminal state changed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("engine failure: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn is_surface_unavailable(&self) -> bool {
        matches!(self, EngineError::SurfaceUnavailable(_))
    }
}
