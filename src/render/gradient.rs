use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{LumenError, LumenResult};

/// A single gradient stop. `offset` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient.
    pub offset: f64,
    /// Straight-alpha color at this position.
    pub color: Color,
}

/// Radial gradient between two concentric circles.
///
/// Sampling follows the 2D canvas rules for the concentric case: distances inside
/// `inner_radius` take the first stop, distances beyond `outer_radius` take the last one, and a
/// gradient whose radii are equal paints nothing. Colors interpolate in premultiplied space.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Create a gradient with no stops.
    pub fn new(center: Point, inner_radius: f64, outer_radius: f64) -> LumenResult<Self> {
        for (name, r) in [("inner", inner_radius), ("outer", outer_radius)] {
            if !r.is_finite() || r < 0.0 {
                return Err(LumenError::validation(format!(
                    "gradient {name} radius must be finite and >= 0 (got {r})"
                )));
            }
        }
        Ok(Self {
            center,
            inner_radius,
            outer_radius,
            stops: Vec::new(),
        })
    }

    /// Add a stop. Stops with equal offsets keep insertion order.
    pub fn add_color_stop(&mut self, offset: f64, color: Color) -> LumenResult<()> {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return Err(LumenError::validation(format!(
                "gradient stop offset must be within [0, 1] (got {offset})"
            )));
        }
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        Ok(())
    }

    /// Center shared by both circles.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radius where the first stop applies.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Radius where the last stop applies.
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Stops sorted by offset.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `p`, or `None` where the gradient paints nothing.
    pub fn sample(&self, p: Point) -> Option<Color> {
        let span = self.outer_radius - self.inner_radius;
        if span == 0.0 || self.stops.is_empty() {
            return None;
        }
        let d = (p - self.center).hypot();
        Some(self.color_at((d - self.inner_radius) / span))
    }

    /// Color at gradient parameter `t`, padded outside `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        // First stop strictly past `t`; the one before it is at or below `t`.
        let hi = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (self.stops[hi - 1], self.stops[hi]);
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return b.color;
        }
        a.color.lerp_premul(b.color, (t - a.offset) / span)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
