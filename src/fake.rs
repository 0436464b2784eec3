// Copyright (c) 2026 rezky_nightky

//! In-memory [`Surface`] with a fixed grid and scripted key input, used to
//! drive the engine without a tty.

use std::collections::BTreeSet;
use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cell::{Cell, Tier};
use crate::error::EngineError;
use crate::frame::Frame;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    pub row: u16,
    pub col: u16,
    pub glyph: char,
    pub tier: Tier,
}

pub struct ScriptedSurface {
    width: u16,
    height: u16,
    unavailable: Option<String>,
    key_polls: BTreeSet<u64>,
    fail_present_at: Option<u64>,
    paced: bool,

    frame: Frame,
    presented: Frame,
    writes: Vec<WriteRecord>,
    rejected_writes: usize,

    initialized: bool,
    polls: u64,
    clears: u64,
    presents: u64,
    shutdowns: u64,
}

impl ScriptedSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            unavailable: None,
            key_polls: BTreeSet::new(),
            fail_present_at: None,
            paced: false,
            frame: Frame::new(width, height),
            presented: Frame::new(width, height),
            writes: Vec::new(),
            rejected_writes: 0,
            initialized: false,
            polls: 0,
            clears: 0,
            presents: 0,
            shutdowns: 0,
        }
    }

    /// A surface whose `initialize` fails the way a non-interactive stdout does.
    pub fn unavailable(reason: &str) -> Self {
        let mut s = Self::new(0, 0);
        s.unavailable = Some(reason.to_string());
        s
    }

    /// Delivers a key press on the `poll`-th call to `poll_key` (0-based).
    pub fn with_key_at_poll(mut self, poll: u64) -> Self {
        self.key_polls.insert(poll);
        self
    }

    /// Makes the `n`-th call to `present` (0-based) fail with an I/O error.
    pub fn failing_present_at(mut self, n: u64) -> Self {
        self.fail_present_at = Some(n);
        self
    }

    /// Sleeps for the poll timeout like a real terminal would.
    pub fn paced(mut self) -> Self {
        self.paced = true;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn shutdowns(&self) -> u64 {
        self.shutdowns
    }

    /// Every write accepted since `initialize`, across all frames.
    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    /// Writes that fell outside the grid and were dropped.
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }

    /// The grid as of the last successful `present`.
    pub fn presented(&self) -> &Frame {
        &self.presented
    }
}

impl Surface for ScriptedSurface {
    fn initialize(&mut self) -> Result<(u16, u16), EngineError> {
        if let Some(reason) = &self.unavailable {
            return Err(EngineError::SurfaceUnavailable(reason.clone()));
        }
        self.initialized = true;
        Ok((self.width, self.height))
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, EngineError> {
        let n = self.polls;
        self.polls += 1;
        if self.key_polls.contains(&n) {
            return Ok(Some(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        }
        if self.paced {
            thread::sleep(timeout);
        }
        Ok(None)
    }

    fn clear_frame(&mut self) {
        self.clears += 1;
        self.frame.clear();
    }

    fn write_cell(&mut self, row: u16, col: u16, glyph: char, tier: Tier) {
        if self.frame.set(col, row, Cell::new(glyph, tier)) {
            self.writes.push(WriteRecord {
                row,
                col,
                glyph,
                tier,
            });
        } else {
            self.rejected_writes += 1;
        }
    }

    fn present(&mut self) -> Result<(), EngineError> {
        let n = self.presents;
        self.presents += 1;
        if self.fail_present_at == Some(n) {
            let e = io::Error::new(io::ErrorKind::BrokenPipe, "scripted present failure");
            return Err(e.into());
        }
        self.presented = self.frame.clone();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.shutdowns += 1;
        self.initialized = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_counted_not_stored() {
        let mut s = ScriptedSurface::new(3, 2);
        s.initialize().unwrap();
        s.write_cell(1, 2, 'a', Tier::Bright);
        s.write_cell(2, 0, 'b', Tier::Dim);
        s.write_cell(0, 3, 'c', Tier::Dim);
        assert_eq!(s.writes().len(), 1);
        assert_eq!(s.rejected_writes(), 2);
        s.present().unwrap();
        assert_eq!(s.presented().get(2, 1).unwrap().ch, 'a');
    }

    #[test]
    fn key_arrives_on_scripted_poll() {
        let mut s = ScriptedSurface::new(3, 2).with_key_at_poll(1);
        assert!(s.poll_key(Duration::ZERO).unwrap().is_none());
        assert!(s.poll_key(Duration::ZERO).unwrap().is_some());
        assert!(s.poll_key(Duration::ZERO).unwrap().is_none());
        assert_eq!(s.polls(), 3);
    }
}
