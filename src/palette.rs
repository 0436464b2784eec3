// Copyright (c) 2026 rezky_nightky

use std::env;

use crossterm::style::{Attribute, Color};

use crate::cell::Tier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Green,
    Amber,
    Blue,
    Mono,
}

/// Rendering style of a single tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierStyle {
    pub fg: Option<Color>,
    pub intensity: Attribute,
}

impl TierStyle {
    const fn new(fg: Option<Color>, intensity: Attribute) -> Self {
        Self { fg, intensity }
    }
}

/// Three-band brightness scheme: head, upper trail, lower trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bright: TierStyle,
    pub medium: TierStyle,
    pub dim: TierStyle,
}

impl Palette {
    pub fn style(&self, tier: Tier) -> TierStyle {
        match tier {
            Tier::Bright => self.bright,
            Tier::Medium => self.medium,
            Tier::Dim => self.dim,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        build_palette(Theme::Green)
    }
}

pub fn build_palette(theme: Theme) -> Palette {
    let (head, body, tail) = match theme {
        Theme::Green => (Color::White, Color::Green, Color::DarkGreen),
        Theme::Amber => (Color::White, Color::Yellow, Color::DarkYellow),
        Theme::Blue => (Color::White, Color::Cyan, Color::DarkBlue),
        Theme::Mono => {
            return Palette {
                bright: TierStyle::new(None, Attribute::Bold),
                medium: TierStyle::new(None, Attribute::NormalIntensity),
                dim: TierStyle::new(None, Attribute::Dim),
            }
        }
    };
    Palette {
        bright: TierStyle::new(Some(head), Attribute::Bold),
        medium: TierStyle::new(Some(body), Attribute::Bold),
        dim: TierStyle::new(Some(tail), Attribute::Dim),
    }
}

/// Applies the environment's color opt-outs to a requested theme.
pub fn effective_theme(requested: Theme) -> Theme {
    if env::var_os("NO_COLOR").is_some() {
        return Theme::Mono;
    }
    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return Theme::Mono;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_is_bold_and_tail_is_dim() {
        for theme in [Theme::Green, Theme::Amber, Theme::Blue, Theme::Mono] {
            let p = build_palette(theme);
            assert_eq!(p.style(Tier::Bright).intensity, Attribute::Bold);
            assert_eq!(p.style(Tier::Dim).intensity, Attribute::Dim);
        }
    }

    #[test]
    fn mono_uses_default_foreground() {
        let p = build_palette(Theme::Mono);
        assert!(p.bright.fg.is_none() && p.medium.fg.is_none() && p.dim.fg.is_none());
    }
}
