// Copyright (c) 2026 rezky_nightky

use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::charset::{
    build_chars, charset_from_str, default_chars, parse_user_chars, widest_glyph, PRESETS,
};
use crate::error::EngineError;
use crate::palette::{build_palette, effective_theme, Palette, Theme};

pub const DEFAULT_TICK: Duration = Duration::from_millis(50);
pub const DEFAULT_SPACING: u16 = 2;
pub const DEFAULT_MUTATION_PROBABILITY: f64 = 0.05;

/// Set to a frame count (or any non-empty value) to run without a keypress.
pub const TEST_MODE_ENV: &str = "GLYPHFALL_TEST_MODE";
pub const TEST_MODE_DEFAULT_FRAMES: u32 = 100;

/// Forces termination without user input. Used by automated callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunBound {
    Frames(u32),
    Duration(Duration),
}

#[derive(Clone, Debug)]
pub struct RainConfig {
    /// Poll timeout per tick; this is the frame period.
    pub tick_interval: Duration,
    /// Distance between neighbouring columns, in terminal cells.
    pub column_spacing: u16,
    pub charset: Vec<char>,
    pub mutation_probability: f64,
    pub bound: Option<RunBound>,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK,
            column_spacing: DEFAULT_SPACING,
            charset: default_chars(),
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
            bound: None,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl RainConfig {
    pub fn bounded(mut self, bound: RunBound) -> Self {
        self.bound = Some(bound);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_interval.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.column_spacing == 0 {
            return Err(EngineError::InvalidConfig(
                "column spacing must be at least 1".to_string(),
            ));
        }
        if self.charset.is_empty() {
            return Err(EngineError::InvalidConfig(
                "rain character set is empty".to_string(),
            ));
        }
        let widest = widest_glyph(&self.charset);
        if self.column_spacing < widest {
            return Err(EngineError::InvalidConfig(format!(
                "column spacing {} is narrower than the widest glyph ({} cells)",
                self.column_spacing, widest
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "mutation probability {} is outside [0, 1]",
                self.mutation_probability
            )));
        }
        Ok(())
    }

    pub fn from_args(args: &Args, test_mode: Option<&str>) -> Result<Self, String> {
        let tick_ms = require_range("--tick-ms", args.tick_ms, 1, 1000)?;
        let spacing = require_range("--spacing", args.spacing, 1, 16)?;
        let mutation_pct = require_finite("--mutation-pct", args.mutation_pct)?;
        let mutation_pct = require_range("--mutation-pct", mutation_pct, 0.0, 100.0)?;

        let charset = match &args.chars {
            Some(s) => parse_user_chars(s)?,
            None => build_chars(charset_from_str(&args.charset)?),
        };

        let bound = match (args.frames, args.duration_ms) {
            (Some(n), _) => Some(RunBound::Frames(n)),
            (None, Some(ms)) => Some(RunBound::Duration(Duration::from_millis(u64::from(ms)))),
            (None, None) => test_mode_bound(test_mode),
        };

        let config = Self {
            tick_interval: Duration::from_millis(tick_ms),
            column_spacing: spacing,
            charset,
            mutation_probability: mutation_pct / 100.0,
            bound,
            seed: args.seed,
            palette: build_palette(effective_theme(args.theme)),
        };
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// Bound implied by the test-mode environment value, if set.
pub fn test_mode_bound(value: Option<&str>) -> Option<RunBound> {
    let v = value?.trim();
    if v.is_empty() || v == "0" {
        return None;
    }
    let frames = v
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(TEST_MODE_DEFAULT_FRAMES);
    Some(RunBound::Frames(frames))
}

fn require_finite(name: &str, v: f64) -> Result<f64, String> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("failed to apply {} {} (must be a finite number)", name, v))
    }
}

fn require_range<T: PartialOrd + Display + Copy>(
    name: &str,
    v: T,
    min: T,
    max: T,
) -> Result<T, String> {
    if v < min || v > max {
        return Err(format!(
            "failed to apply {} {} (min {} max {})",
            name, v, min, max
        ));
    }
    Ok(v)
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "glyphfall",
    about = "Full-screen falling glyph rain. Press any key to exit.",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(
        long = "tick-ms",
        default_value_t = 50,
        help_heading = "TIMING",
        help = "Frame period in milliseconds (min 1 max 1000)"
    )]
    pub tick_ms: u64,

    #[arg(
        long = "frames",
        conflicts_with = "duration_ms",
        help_heading = "TIMING",
        help = "Stop after N frames without waiting for a key"
    )]
    pub frames: Option<u32>,

    #[arg(
        long = "duration-ms",
        help_heading = "TIMING",
        help = "Stop after N milliseconds without waiting for a key"
    )]
    pub duration_ms: Option<u32>,

    #[arg(
        long = "spacing",
        default_value_t = DEFAULT_SPACING,
        help_heading = "APPEARANCE",
        help = "Cells between columns (min 1 max 16, at least the glyph width)"
    )]
    pub spacing: u16,

    #[arg(
        short = 't',
        long = "theme",
        value_enum,
        default_value_t = Theme::Green,
        help_heading = "APPEARANCE",
        help = "Color theme; NO_COLOR or TERM=dumb force mono"
    )]
    pub theme: Theme,

    #[arg(
        long = "mutation-pct",
        default_value_t = 5.0,
        help_heading = "APPEARANCE",
        help = "Per-glyph chance to change each frame, in percent (min 0 max 100)"
    )]
    pub mutation_pct: f64,

    #[arg(
        long = "charset",
        default_value = "matrix",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Literal glyphs to use instead of a preset"
    )]
    pub chars: Option<String>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write diagnostics to this file (filter via RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "stats",
        help_heading = "GENERAL",
        help = "Print a run summary after the terminal is restored"
    )]
    pub stats: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    for (name, desc) in PRESETS {
        println!("{:<12} {}", name, desc);
    }
}
