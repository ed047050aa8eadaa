use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{LumenError, LumenResult};

/// Straight-alpha color value.
///
/// `r`, `g`, `b` are in `0..=255` and may be fractional; `a` is in `0..=1`. Values are not
/// clamped on construction so that corrections applied by callers (for example the light bake's
/// channel scaling) survive untouched until rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255.0, 255.0, 255.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Build a color from channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same RGB with a replaced alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Multiply the RGB channels by `factor`, leaving alpha untouched.
    pub fn scale_rgb(self, factor: f64) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Quantize to premultiplied RGBA8, clamping every channel into range.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        let a = clamp_unit(self.a);
        let q = |c: f64| -> u8 {
            let c = if c.is_finite() { c.clamp(0.0, 255.0) } else { 0.0 };
            (c * a).round() as u8
        };
        Rgba8Premul {
            r: q(self.r),
            g: q(self.g),
            b: q(self.b),
            a: (a * 255.0).round() as u8,
        }
    }

    /// Linear interpolation in premultiplied space, returned as straight alpha.
    pub fn lerp_premul(self, other: Self, t: f64) -> Self {
        let t = clamp_unit(t);
        let (a0, a1) = (clamp_unit(self.a), clamp_unit(other.a));
        let a = a0 + (a1 - a0) * t;
        if a <= 0.0 {
            let mix = |c0: f64, c1: f64| c0 + (c1 - c0) * t;
            return Self::rgba(
                mix(self.r, other.r),
                mix(self.g, other.g),
                mix(self.b, other.b),
                0.0,
            );
        }
        let mix = |c0: f64, c1: f64| (c0 * a0 + (c1 * a1 - c0 * a0) * t) / a;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            a,
        )
    }
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 }
}

impl fmt::Display for Color {
    /// CSS-style `rgba(r, g, b, a)`; channels are printed unrounded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = LumenError;

    fn from_str(s: &str) -> LumenResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        let (body, expected) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(LumenError::validation(format!(
                "unsupported color syntax \"{s}\" (expected rgb(), rgba() or #hex)"
            )));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| LumenError::validation(format!("unterminated color \"{s}\"")))?;

        let parts = body
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| LumenError::validation(format!("invalid color channel \"{p}\"")))
            })
            .collect::<LumenResult<Vec<f64>>>()?;
        if parts.len() != expected {
            return Err(LumenError::validation(format!(
                "color \"{s}\" must have {expected} channels"
            )));
        }

        let a = if expected == 4 { parts[3] } else { 1.0 };
        Ok(Self::rgba(parts[0], parts[1], parts[2], a))
    }
}

fn parse_hex(s: &str) -> LumenResult<Color> {
    fn hex_byte(pair: &str) -> LumenResult<f64> {
        u8::from_str_radix(pair, 16)
            .map(f64::from)
            .map_err(|_| LumenError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.is_ascii() {
        return Err(LumenError::validation("hex color must be ASCII"));
    }
    match s.len() {
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])? / 255.0,
        )),
        _ => Err(LumenError::validation(
            "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
        )),
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
