// Copyright (c) 2026 rezky_nightky

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::cell::Tier;

pub const MIN_SPEED: f64 = 0.3;
pub const MAX_SPEED: f64 = 1.2;
pub const MIN_LENGTH: usize = 5;

/// One rendered cell of a column's trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailCell {
    pub row: u16,
    pub tier: Tier,
    pub glyph: char,
}

/// A single falling drop anchored at a fixed horizontal slot.
#[derive(Clone, Debug)]
pub struct Column {
    x: u16,
    pub y: f64,
    pub speed: f64,
    pub length: usize,
    pub buffer: Vec<char>,
    pub active: bool,
}

pub fn max_length(height: u16) -> usize {
    (height as usize / 2).max(MIN_LENGTH)
}

fn draw_glyph<R: Rng>(charset: &[char], rng: &mut R) -> char {
    charset.choose(rng).copied().unwrap_or('0')
}

impl Column {
    /// Column at `x` with placeholder state. Call [`Column::reset`] before use.
    pub fn new(x: u16) -> Self {
        Self {
            x,
            y: 0.0,
            speed: MIN_SPEED,
            length: MIN_LENGTH,
            buffer: vec!['0'; MIN_LENGTH],
            active: true,
        }
    }

    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn reset<R: Rng>(&mut self, height: u16, charset: &[char], rng: &mut R) {
        let h = f64::from(height.max(1));
        self.y = rng.random_range(-h..0.0);
        self.speed = rng.random_range(MIN_SPEED..=MAX_SPEED);
        self.length = rng.random_range(MIN_LENGTH..=max_length(height));
        self.buffer.clear();
        self.buffer
            .extend((0..self.length).map(|_| draw_glyph(charset, &mut *rng)));
    }

    pub fn advance(&mut self, dt_ticks: f64) {
        self.y += self.speed * dt_ticks;
    }

    /// Re-rolls each glyph independently with probability `p`, visible or
    /// not. Returns how many entries were re-rolled.
    pub fn maybe_mutate_glyphs<R: Rng>(
        &mut self,
        p: f64,
        charset: &[char],
        rng: &mut R,
    ) -> usize {
        let p = p.clamp(0.0, 1.0);
        let mut rolled = 0;
        for glyph in &mut self.buffer {
            if rng.random_bool(p) {
                *glyph = draw_glyph(charset, rng);
                rolled += 1;
            }
        }
        rolled
    }

    pub fn head_row(&self) -> i64 {
        self.y.floor() as i64
    }

    pub fn tier_at(&self, i: usize) -> Tier {
        if i == 0 {
            Tier::Bright
        } else if i < self.length / 3 {
            Tier::Medium
        } else {
            Tier::Dim
        }
    }

    /// Trail cells from the head upward, skipping rows outside `[0, height)`.
    pub fn visible_cells(&self, height: u16) -> impl Iterator<Item = TrailCell> + '_ {
        let head = self.head_row();
        (0..self.length).filter_map(move |i| {
            let row = head - i as i64;
            if row < 0 || row >= i64::from(height) {
                return None;
            }
            Some(TrailCell {
                row: row as u16,
                tier: self.tier_at(i),
                glyph: self.buffer[i],
            })
        })
    }

    pub fn should_reset(&self, height: u16) -> bool {
        self.head_row() - self.length as i64 > i64::from(height)
    }
}
