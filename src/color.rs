//! Color mapping: user color specifications to gradient endpoints.
//!
//! Accepted forms (case-insensitive, surrounding whitespace ignored):
//! - `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)` with integer channels in `0..=255` and alpha either a
//!   number in `[0, 1]` or a percentage
//! - SVG/CSS color keywords (`red`, `cornflowerblue`, ...)
//!
//! Every resolved channel is an exact rescale of an 8-bit value.

use crate::foundation::core::RgbaColor;
use crate::foundation::error::{ForgeError, ForgeResult};

/// A user-facing color encoding, resolved lazily by [`ColorSpec::resolve`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ColorSpec(pub String);

impl ColorSpec {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into straight-alpha RGBA.
    pub fn resolve(&self) -> ForgeResult<RgbaColor> {
        let [r, g, b, a] = parse_rgba8(&self.0)
            .map_err(|why| ForgeError::invalid_color(format!("\"{}\": {why}", self.0)))?;
        Ok(RgbaColor::from_rgba8(r, g, b, a))
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered gradient endpoints. `start` lands on ramp stop 0, `end` on ramp stop 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientEndpoints {
    pub start: RgbaColor,
    pub end: RgbaColor,
}

impl GradientEndpoints {
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Resolve both color specs. Fails on the first unparsable one; never substitutes a default.
pub fn map_colors(start: &ColorSpec, end: &ColorSpec) -> ForgeResult<GradientEndpoints> {
    Ok(GradientEndpoints {
        start: start.resolve()?,
        end: end.resolve()?,
    })
}

fn parse_rgba8(raw: &str) -> Result<[u8; 4], String> {
    let s = raw.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err("empty color".to_owned());
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = functional_body(&s, "rgba") {
        return parse_rgb_fn(body, true);
    }
    if let Some(body) = functional_body(&s, "rgb") {
        return parse_rgb_fn(body, false);
    }

    palette::named::from_str(&s)
        .map(|c| [c.red, c.green, c.blue, 255])
        .ok_or_else(|| "not a hex code, rgb()/rgba() form or known color name".to_owned())
}

fn functional_body<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Result<[u8; 4], String> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digits \"{hex}\""));
    }

    let nibble = |i: usize| -> u8 {
        let v = u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
        v * 17
    };
    let byte = |i: usize| -> u8 { u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) };

    match hex.len() {
        3 => Ok([nibble(0), nibble(1), nibble(2), 255]),
        4 => Ok([nibble(0), nibble(1), nibble(2), nibble(3)]),
        6 => Ok([byte(0), byte(2), byte(4), 255]),
        8 => Ok([byte(0), byte(2), byte(4), byte(6)]),
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn parse_rgb_fn(body: &str, with_alpha: bool) -> Result<[u8; 4], String> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(format!("expected {expected} components, got {}", parts.len()));
    }

    let channel = |p: &str| -> Result<u8, String> {
        p.parse::<u8>()
            .map_err(|_| format!("channel \"{p}\" must be an integer in 0..=255"))
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha { parse_alpha(parts[3])? } else { 255 };
    Ok([r, g, b, a])
}

fn parse_alpha(p: &str) -> Result<u8, String> {
    let (value, scale) = match p.strip_suffix('%') {
        Some(pct) => (pct.trim(), 100.0),
        None => (p, 1.0),
    };
    let v: f64 = value
        .parse()
        .map_err(|_| format!("alpha \"{p}\" is not a number"))?;
    let unit = v / scale;
    if !(0.0..=1.0).contains(&unit) {
        return Err(format!("alpha \"{p}\" is out of range"));
    }
    Ok((unit * 255.0).round() as u8)
}

#[cfg(test)]
#[path = "../tests/unit/color.rs"]
mod tests;
