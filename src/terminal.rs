// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, IsTerminal, Result, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Tier};
use crate::error::EngineError;
use crate::frame::Frame;
use crate::palette::{Palette, TierStyle};
use crate::surface::Surface;

/// Crossterm-backed surface drawing on the alternate screen.
pub struct TerminalSurface {
    stdout: Stdout,
    palette: Palette,
    frame: Frame,
    last: Option<Frame>,
    raw: bool,
}

impl TerminalSurface {
    pub fn new(palette: Palette) -> Self {
        Self {
            stdout: stdout(),
            palette,
            frame: Frame::new(0, 0),
            last: None,
            raw: false,
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.stdout.execute(terminal::EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;
        let _ = self.stdout.execute(terminal::DisableLineWrap);
        self.stdout.execute(SetAttribute(Attribute::Reset))?;
        self.stdout.execute(ResetColor)?;
        self.stdout
            .execute(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.flush()
    }

    fn leave(&mut self) -> Result<()> {
        let steps: [Result<()>; 6] = [
            self.stdout.execute(SetAttribute(Attribute::Reset)).map(|_| ()),
            self.stdout.execute(ResetColor).map(|_| ()),
            self.stdout.execute(cursor::Show).map(|_| ()),
            self.stdout.execute(terminal::EnableLineWrap).map(|_| ()),
            self.stdout
                .execute(terminal::LeaveAlternateScreen)
                .map(|_| ()),
            terminal::disable_raw_mode(),
        ];
        let flushed = self.stdout.flush();
        steps.into_iter().chain([flushed]).collect()
    }

    fn queue_style(&mut self, cur: &mut Option<TierStyle>, tier: Tier) -> Result<()> {
        let want = self.palette.style(tier);
        let have = *cur;
        if have.map(|s| s.fg) != Some(want.fg) {
            self.stdout
                .queue(SetForegroundColor(want.fg.unwrap_or(Color::Reset)))?;
        }
        if have.map(|s| s.intensity) != Some(want.intensity) {
            self.stdout
                .queue(SetAttribute(Attribute::NormalIntensity))?;
            if want.intensity != Attribute::NormalIntensity {
                self.stdout.queue(SetAttribute(want.intensity))?;
            }
        }
        *cur = Some(want);
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let (width, height) = (self.frame.width, self.frame.height);
        let needs_full_redraw = self
            .last
            .as_ref()
            .map(|l| l.width != width || l.height != height)
            .unwrap_or(true);
        if needs_full_redraw {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(Frame::new(width, height));
        }
        let Some(last) = self.last.take() else {
            return Ok(());
        };

        let mut cur_style: Option<TierStyle> = None;
        let mut cur_pos: Option<(u16, u16)> = None;

        for y in 0..height {
            let mut x = 0u16;
            while x < width {
                let idx = y as usize * width as usize + x as usize;
                let cell = self.frame.cell_at_index(idx);
                let cw = cell.ch.width().unwrap_or(1).max(1) as u16;

                if cell != last.cell_at_index(idx) {
                    if cur_pos != Some((x, y)) {
                        self.stdout.queue(cursor::MoveTo(x, y))?;
                    }
                    self.queue_style(&mut cur_style, cell.tier)?;
                    self.stdout.queue(Print(cell.ch))?;
                    let next_x = x.saturating_add(cw);
                    cur_pos = (next_x < width).then_some((next_x, y));
                }

                // A wide glyph covers the cell to its right.
                x = x.saturating_add(if cell.is_blank() { 1 } else { cw });
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        let mut last = last;
        last.clone_from(&self.frame);
        self.last = Some(last);
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn initialize(&mut self) -> std::result::Result<(u16, u16), EngineError> {
        if !self.stdout.is_terminal() {
            return Err(EngineError::SurfaceUnavailable(
                "stdout is not an interactive terminal".to_string(),
            ));
        }
        let (w, h) = terminal::size().map_err(|e| {
            EngineError::SurfaceUnavailable(format!("cannot query terminal size: {}", e))
        })?;
        if w == 0 || h == 0 {
            return Err(EngineError::SurfaceUnavailable(format!(
                "terminal reports an unusable size {}x{}",
                w, h
            )));
        }

        terminal::enable_raw_mode().map_err(|e| {
            EngineError::SurfaceUnavailable(format!("cannot enable raw mode: {}", e))
        })?;
        self.raw = true;
        if let Err(e) = self.enter() {
            let _ = self.leave();
            self.raw = false;
            return Err(EngineError::SurfaceUnavailable(format!(
                "cannot enter alternate screen: {}",
                e
            )));
        }

        self.frame = Frame::new(w, h);
        self.last = None;
        tracing::debug!(width = w, height = h, "terminal surface initialized");
        Ok((w, h))
    }

    fn poll_key(&mut self, timeout: Duration) -> std::result::Result<Option<KeyEvent>, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(None);
            }
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    return Ok(Some(k));
                }
            }
        }
    }

    fn clear_frame(&mut self) {
        self.frame.clear();
    }

    fn write_cell(&mut self, row: u16, col: u16, glyph: char, tier: Tier) {
        self.frame.set(col, row, Cell::new(glyph, tier));
    }

    fn present(&mut self) -> std::result::Result<(), EngineError> {
        Ok(self.draw()?)
    }

    fn shutdown(&mut self) -> std::result::Result<(), EngineError> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        self.last = None;
        Ok(self.leave()?)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.raw {
            self.raw = false;
            let _ = self.leave();
        }
    }
}

/// Restores cooked mode from contexts that do not own the surface: panic
/// hooks and signal handlers.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
