// Copyright (c) 2026 rezky_nightky

/// Brightness band of a rendered glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Bright,
    Medium,
    Dim,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tier: Tier,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        tier: Tier::Dim,
    };

    pub fn new(ch: char, tier: Tier) -> Self {
        Self { ch, tier }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}
