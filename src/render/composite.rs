use serde::{Deserialize, Serialize};

use crate::foundation::error::{LumenError, LumenResult};

/// Premultiplied RGBA8 pixel as a plain array.
pub type PremulRgba8 = [u8; 4];

/// How a source layer is combined with the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// Porter-Duff source-over.
    #[default]
    Over,
    /// Saturating per-channel addition (`lighter`), the usual choice for lights.
    Additive,
}

/// Source-over of premultiplied pixels with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Saturating addition of premultiplied pixels with an extra opacity multiplier.
pub fn add(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;

    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(mul_div255(u16::from(src[i]), op), dst[i]);
    }
    out
}

/// Blend `src` into `dst` (equal-length RGBA8 buffers) with `mode`.
pub fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    mode: CompositeMode,
    opacity: f32,
) -> LumenResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LumenError::surface(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    let blend = match mode {
        CompositeMode::Over => over,
        CompositeMode::Additive => add,
    };
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
