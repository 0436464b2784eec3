// Copyright (c) 2026 rezky_nightky

use std::collections::HashSet;

use unicode_width::UnicodeWidthChar;

/// Default rain glyphs: full-width katakana, latin capitals, digits and a
/// handful of symbols.
pub const RAIN_CHARS: &str = concat!(
    "アイウエオカキクケコサシスセソタチツテトナニヌネノ",
    "ハヒフヘホマミムメモヤユヨラリルレロワヲン",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "@#$%&*+=<>?/",
);

const KATAKANA: &str = concat!(
    "アイウエオカキクケコサシスセソタチツテトナニヌネノ",
    "ハヒフヘホマミムメモヤユヨラリルレロワヲン",
);
const SYMBOLS: &str = "@#$%&*+=<>?/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const KATAKANA: Charset = Charset(0x1);
    pub const LATIN_UPPER: Charset = Charset(0x2);
    pub const LATIN_LOWER: Charset = Charset(0x4);
    pub const DIGITS: Charset = Charset(0x8);
    pub const SYMBOLS: Charset = Charset(0x10);
    pub const PUNCTUATION: Charset = Charset(0x20);
    pub const BINARY: Charset = Charset(0x40);
    pub const HEX: Charset = Charset(0x80);

    pub const MATRIX: Charset =
        Charset(Self::KATAKANA.0 | Self::LATIN_UPPER.0 | Self::DIGITS.0 | Self::SYMBOLS.0);
    pub const LATIN: Charset = Charset(Self::LATIN_UPPER.0 | Self::LATIN_LOWER.0);
    pub const ASCII: Charset = Charset(Self::LATIN.0 | Self::DIGITS.0 | Self::PUNCTUATION.0);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }
}

pub const PRESETS: &[(&str, &str)] = &[
    ("matrix", "Katakana + A-Z + digits + symbols (default)"),
    ("katakana", "Full-width katakana"),
    ("latin", "Letters only"),
    ("digits", "Digits only"),
    ("symbols", "The matrix symbol set"),
    ("binary", "0 and 1"),
    ("hex", "0-9 and A-F"),
    ("ascii", "Letters + digits + punctuation (single-width safe)"),
];

pub fn charset_from_str(name: &str) -> Result<Charset, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "matrix" | "default" => Ok(Charset::MATRIX),
        "katakana" => Ok(Charset::KATAKANA),
        "latin" | "english" => Ok(Charset::LATIN),
        "digits" | "dec" => Ok(Charset::DIGITS),
        "symbols" => Ok(Charset::SYMBOLS),
        "binary" | "bin" | "01" => Ok(Charset::BINARY),
        "hex" => Ok(Charset::HEX),
        "ascii" => Ok(Charset::ASCII),
        other => Err(format!(
            "unsupported charset: {} (see --list-charsets)",
            other
        )),
    }
}

fn push_range(out: &mut Vec<char>, start: char, end: char) {
    out.extend(start..=end);
}

pub fn build_chars(charset: Charset) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();

    if charset.contains(Charset::KATAKANA) {
        out.extend(KATAKANA.chars());
    }
    if charset.contains(Charset::LATIN_UPPER) {
        push_range(&mut out, 'A', 'Z');
    }
    if charset.contains(Charset::LATIN_LOWER) {
        push_range(&mut out, 'a', 'z');
    }
    if charset.contains(Charset::DIGITS) {
        push_range(&mut out, '0', '9');
    }
    if charset.contains(Charset::SYMBOLS) {
        out.extend(SYMBOLS.chars());
    }
    if charset.contains(Charset::PUNCTUATION) {
        push_range(&mut out, '!', '/');
        push_range(&mut out, ':', '@');
        push_range(&mut out, '[', '`');
        push_range(&mut out, '{', '~');
    }
    if charset.contains(Charset::BINARY) {
        push_range(&mut out, '0', '1');
    }
    if charset.contains(Charset::HEX) {
        push_range(&mut out, '0', '9');
        push_range(&mut out, 'A', 'F');
    }

    dedup_preserving_order(out)
}

/// Glyph list from a literal `--chars` string. Whitespace and control
/// characters are dropped, duplicates are kept once.
pub fn parse_user_chars(s: &str) -> Result<Vec<char>, String> {
    let out = dedup_preserving_order(
        s.chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect(),
    );
    if out.is_empty() {
        return Err("--chars: no printable characters given".to_string());
    }
    Ok(out)
}

fn dedup_preserving_order(chars: Vec<char>) -> Vec<char> {
    let mut seen = HashSet::with_capacity(chars.len());
    chars.into_iter().filter(|c| seen.insert(*c)).collect()
}

pub fn default_chars() -> Vec<char> {
    RAIN_CHARS.chars().collect()
}

/// Terminal cells taken by the widest glyph; at least 1.
pub fn widest_glyph(chars: &[char]) -> u16 {
    chars
        .iter()
        .map(|c| c.width().unwrap_or(1).max(1) as u16)
        .max()
        .unwrap_or(1)
}
