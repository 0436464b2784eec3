// Copyright (c) 2026 rezky_nightky

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crossterm::event::KeyEvent;

use crate::cell::Tier;
use crate::error::EngineError;

/// A raw, cell-addressable display the rain can be drawn on.
pub trait Surface {
    /// Enters raw display mode and returns the grid size as `(width, height)`.
    fn initialize(&mut self) -> Result<(u16, u16), EngineError>;

    /// Waits up to `timeout` for a key press. Doubles as frame pacing.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, EngineError>;

    fn clear_frame(&mut self);

    /// Coordinates outside the grid are ignored.
    fn write_cell(&mut self, row: u16, col: u16, glyph: char, tier: Tier);

    fn present(&mut self) -> Result<(), EngineError>;

    /// Restores the display mode that was active before `initialize`.
    fn shutdown(&mut self) -> Result<(), EngineError>;
}

/// Holds an initialized surface and shuts it down exactly once, either
/// through [`SurfaceGuard::release`] or on drop.
pub struct SurfaceGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    released: bool,
}

impl<'a, S: Surface + ?Sized> SurfaceGuard<'a, S> {
    pub fn acquire(surface: &'a mut S) -> Result<(Self, (u16, u16)), EngineError> {
        let size = surface.initialize()?;
        Ok((
            Self {
                surface,
                released: false,
            },
            size,
        ))
    }

    pub fn release(mut self) -> Result<(), EngineError> {
        self.released = true;
        self.surface.shutdown()
    }
}

impl<S: Surface + ?Sized> Deref for SurfaceGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SurfaceGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.surface.shutdown() {
            tracing::warn!(error = %e, "failed to restore terminal during unwind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::ScriptedSurface;

    #[test]
    fn release_shuts_down_once() {
        let mut surface = ScriptedSurface::new(10, 5);
        let (guard, size) = SurfaceGuard::acquire(&mut surface).unwrap();
        assert_eq!(size, (10, 5));
        guard.release().unwrap();
        assert_eq!(surface.shutdowns(), 1);
    }

    #[test]
    fn drop_shuts_down_when_not_released() {
        let mut surface = ScriptedSurface::new(10, 5);
        {
            let (_guard, _) = SurfaceGuard::acquire(&mut surface).unwrap();
        }
        assert_eq!(surface.shutdowns(), 1);
    }

    #[test]
    fn failed_initialize_yields_no_guard() {
        let mut surface = ScriptedSurface::unavailable("not a tty");
        let err = SurfaceGuard::acquire(&mut surface).err().unwrap();
        assert!(err.is_surface_unavailable());
        assert_eq!(surface.shutdowns(), 0);
    }
}
