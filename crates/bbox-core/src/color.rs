//! Outline colour parsing.
//!
//! The host passes the box colour as a CSS colour string. Built on `winnow`
//! 0.7; accepts hex (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`), `rgb()` /
//! `rgba()` functional notation, and a small table of named colours.

use serde::{Deserialize, Serialize};
use winnow::ascii::space0;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb8(0, 0, 0)),
    ("white", Color::rgb8(255, 255, 255)),
    ("red", Color::rgb8(255, 0, 0)),
    ("lime", Color::rgb8(0, 255, 0)),
    ("green", Color::rgb8(0, 128, 0)),
    ("blue", Color::rgb8(0, 0, 255)),
    ("yellow", Color::rgb8(255, 255, 0)),
    ("cyan", Color::rgb8(0, 255, 255)),
    ("aqua", Color::rgb8(0, 255, 255)),
    ("magenta", Color::rgb8(255, 0, 255)),
    ("fuchsia", Color::rgb8(255, 0, 255)),
    ("orange", Color::rgb8(255, 165, 0)),
    ("purple", Color::rgb8(128, 0, 128)),
    ("pink", Color::rgb8(255, 192, 203)),
    ("gray", Color::rgb8(128, 128, 128)),
    ("grey", Color::rgb8(128, 128, 128)),
];

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse any supported CSS colour string. Surrounding whitespace is
    /// ignored; names are case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if let Some((_, c)) = NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Some(*c);
        }
        let mut input = trimmed;
        let color = alt((parse_hex_color, parse_functional))
            .parse_next(&mut input)
            .ok()?;
        input.is_empty().then_some(color)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        let (r, g, b, a) = match bytes.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            4 => (short(0)?, short(1)?, short(2)?, short(3)?),
            6 => (long(0)?, long(2)?, long(4)?, 255),
            8 => (long(0)?, long(2)?, long(4)?, long(6)?),
            _ => return None,
        };
        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Channels as 8-bit values.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// CSS string suitable for a Canvas2D stroke style.
    pub fn to_css(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb8(255, 0, 0)
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = '#'.parse_next(input)?;
    let digits: &str = take_while(3..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Color::from_hex(digits).ok_or_else(backtrack)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    }
    let matched = &start[..start.len() - input.len()];
    matched.parse::<f32>().map_err(|_| backtrack())
}

fn parse_comma(input: &mut &str) -> ModalResult<()> {
    (space0, ',', space0).void().parse_next(input)
}

fn parse_channel(input: &mut &str) -> ModalResult<f32> {
    let v = parse_number.parse_next(input)?;
    if v > 255.0 {
        return Err(backtrack());
    }
    Ok(v / 255.0)
}

/// `rgb(r, g, b)` or `rgba(r, g, b, a)`; alpha in [0, 1].
fn parse_functional(input: &mut &str) -> ModalResult<Color> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    let _ = (space0, '(', space0).parse_next(input)?;
    let r = parse_channel.parse_next(input)?;
    parse_comma.parse_next(input)?;
    let g = parse_channel.parse_next(input)?;
    parse_comma.parse_next(input)?;
    let b = parse_channel.parse_next(input)?;
    let a = opt(preceded(parse_comma, parse_number)).parse_next(input)?;
    let _ = (space0, ')').parse_next(input)?;
    let a = a.unwrap_or(1.0);
    if a > 1.0 {
        return Err(backtrack());
    }
    Ok(Color::rgba(r, g, b, a))
}
