// Copyright (c) 2026 rezky_nightky

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use rand::{rngs::StdRng, SeedableRng};

use crate::column::Column;
use crate::config::{RainConfig, RunBound};
use crate::error::EngineError;
use crate::runtime::{RainState, RunReport, StopReason};
use crate::surface::{Surface, SurfaceGuard};

/// Owns every column and drives the tick loop against a [`Surface`].
pub struct RainEngine {
    config: RainConfig,
    columns: Vec<Column>,
    width: u16,
    height: u16,
    frames: u64,
    state: RainState,
    rng: StdRng,
    interrupt: Option<Arc<AtomicBool>>,
}

impl RainEngine {
    pub fn new(config: RainConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            columns: Vec::new(),
            width: 0,
            height: 0,
            frames: 0,
            state: RainState::Running,
            rng,
            interrupt: None,
        })
    }

    /// Stops the loop at the next tick once `flag` is set, e.g. from a
    /// signal handler, so the surface is still released by the guard.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self) -> RainState {
        self.state
    }

    /// Creates one freshly reset column per slot: `x = 0, spacing, ...` below
    /// `width`.
    pub fn populate(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let spacing = usize::from(self.config.column_spacing.max(1));
        let Self {
            columns,
            config,
            rng,
            ..
        } = self;
        columns.clear();
        columns.extend((0..width).step_by(spacing).map(|x| {
            let mut col = Column::new(x);
            col.reset(height, &config.charset, &mut *rng);
            col
        }));
    }

    /// Decides whether the loop keeps running. An interrupt or a key arriving
    /// in this tick stops it in this tick; bounded runs stop once their budget
    /// is spent.
    pub fn evaluate(&self, key: Option<&KeyEvent>, elapsed: Duration) -> RainState {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            return RainState::Stopped(StopReason::Interrupted);
        }
        if key.is_some() {
            return RainState::Stopped(StopReason::KeyPressed);
        }
        match self.config.bound {
            Some(RunBound::Frames(max)) if self.frames >= u64::from(max) => {
                RainState::Stopped(StopReason::FrameBudget)
            }
            Some(RunBound::Duration(max)) if elapsed >= max => {
                RainState::Stopped(StopReason::TimeBudget)
            }
            _ => RainState::Running,
        }
    }

    /// Advances every column one tick and renders the result.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), EngineError> {
        surface.clear_frame();

        let height = self.height;
        let Self {
            columns,
            config,
            rng,
            ..
        } = self;
        for col in columns.iter_mut() {
            col.advance(1.0);
            col.maybe_mutate_glyphs(config.mutation_probability, &config.charset, rng);
            for cell in col.visible_cells(height) {
                surface.write_cell(cell.row, col.x(), cell.glyph, cell.tier);
            }
            if col.should_reset(height) {
                col.reset(height, &config.charset, rng);
                tracing::debug!(x = col.x(), length = col.length, "column reset");
            }
        }

        surface.present()?;
        self.frames += 1;
        Ok(())
    }

    /// Runs until a key press or the configured bound. The surface is shut
    /// down before this returns, on success and on error alike.
    pub fn run<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<RunReport, EngineError> {
        let (mut guard, (width, height)) = SurfaceGuard::acquire(surface)?;
        self.populate(width, height);
        self.frames = 0;
        self.state = RainState::Running;
        tracing::info!(
            width,
            height,
            columns = self.columns.len(),
            tick_ms = self.config.tick_interval.as_millis() as u64,
            bound = ?self.config.bound,
            "rain started"
        );

        let started = Instant::now();
        let tick_interval = self.config.tick_interval;
        while self.state.is_running() {
            let key = guard.poll_key(tick_interval)?;
            self.state = self.evaluate(key.as_ref(), started.elapsed());
            if !self.state.is_running() {
                break;
            }
            self.tick(&mut *guard)?;
        }

        guard.release()?;

        let RainState::Stopped(stop_reason) = self.state else {
            return Err(EngineError::Internal(
                "tick loop exited while still running".to_string(),
            ));
        };
        let report = RunReport {
            frames: self.frames,
            columns: self.columns.len(),
            stop_reason,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            frames = report.frames,
            reason = %stop_reason,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "rain stopped"
        );
        Ok(report)
    }
}
