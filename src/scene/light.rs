use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::error::{LumenError, LumenResult};
use crate::render::framebuffer::Framebuffer;
use crate::render::gradient::RadialGradient;
use crate::render::surface::{Paint, RasterSurface};
use crate::scene::entity::{Positioned, point_xy};
use crate::scene::texture::Texture;

/// RGB scale applied to the inner gradient stop on every bake.
pub const BAKE_CORRECTION: f64 = 254.0 / 255.0;

/// Largest accepted light radius, in pixels.
pub const MAX_RADIUS: f64 = 4096.0;

/// Construction parameters for [`LightSource::new`].
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct LightSourceDesc {
    /// Name used to refer to the light.
    #[serde(default)]
    pub tag: String,
    /// Anchor in scene space.
    #[serde(default, with = "point_xy")]
    pub position: Point,
    /// Outer radius. Must be finite and > 0.
    pub radius: f64,
    /// Radius of the fully lit core. Defaults to 0.
    #[serde(default)]
    pub inner_radius: Option<f64>,
    /// Alpha of the core. Defaults to 1.
    #[serde(default)]
    pub intensity: Option<f64>,
    /// Tint. Defaults to opaque white.
    #[serde(default)]
    pub hue: Option<Color>,
}

impl LightSourceDesc {
    /// Light of `radius` anchored at `(x, y)` with default core, intensity and hue.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            tag: String::new(),
            position: Point::new(x, y),
            radius,
            inner_radius: None,
            intensity: None,
            hue: None,
        }
    }

    /// Return a descriptor with a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Return a descriptor with an explicit core radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Return a descriptor with an explicit intensity.
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Return a descriptor with a tint.
    pub fn with_hue(mut self, hue: Color) -> Self {
        self.hue = Some(hue);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Shape {
    radius: f64,
    inner_radius: f64,
    intensity: f64,
    hue: Color,
}

impl Shape {
    fn validate(self) -> LumenResult<Self> {
        let Self {
            radius,
            inner_radius,
            intensity,
            ..
        } = self;
        if !radius.is_finite() || radius <= 0.0 || radius > MAX_RADIUS {
            return Err(LumenError::invalid_geometry(format!(
                "radius must be finite and within (0, {MAX_RADIUS}] (got {radius})"
            )));
        }
        if !inner_radius.is_finite() || !(0.0..=radius).contains(&inner_radius) {
            return Err(LumenError::invalid_geometry(format!(
                "inner radius must be within [0, {radius}] (got {inner_radius})"
            )));
        }
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(LumenError::invalid_geometry(format!(
                "intensity must be finite and >= 0 (got {intensity})"
            )));
        }
        Ok(self)
    }

    fn effective_color(self) -> Color {
        self.hue.with_alpha(self.intensity)
    }
}

struct Baked {
    gradient: RadialGradient,
    light_map: Texture,
}

// The surface is `ceil(2r)` pixels wide but drawn at a logical `2r`, so the gradient is laid out
// in surface pixels (scaled by `side / 2r`) to stay centered once the framebuffer scales it back.
fn bake(shape: Shape) -> LumenResult<Baked> {
    let Shape {
        radius,
        inner_radius,
        ..
    } = shape;
    let diameter = radius * 2.0;
    let side = diameter.ceil();
    let mut surface = RasterSurface::new(side as u32, side as u32)?;
    surface.clear();

    let scale = side / diameter;
    let center = Point::new(side / 2.0, side / 2.0);
    let inner = shape.effective_color().scale_rgb(BAKE_CORRECTION);
    let mut gradient = RadialGradient::new(center, inner_radius * scale, radius * scale)?;
    gradient.add_color_stop(0.0, inner)?;
    gradient.add_color_stop(1.0, inner.with_alpha(0.0))?;

    surface.fill_circle(center, radius * scale, &Paint::Radial(gradient.clone()));

    Ok(Baked {
        gradient,
        light_map: Texture::from_surface(surface).with_size(radius * 2.0, radius * 2.0),
    })
}

/// Radial point light with a baked light map.
///
/// The light map is rebuilt on construction and by every setter that changes its look. When
/// following an object, the light moves with that object's center.
pub struct LightSource {
    tag: String,
    position: Point,
    shape: Shape,
    gradient: RadialGradient,
    light_map: Texture,
    follow: Option<Weak<RefCell<dyn Positioned>>>,
}

impl std::fmt::Debug for LightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightSource")
            .field("tag", &self.tag)
            .field("position", &self.position)
            .field("radius", &self.shape.radius)
            .field("inner_radius", &self.shape.inner_radius)
            .field("intensity", &self.shape.intensity)
            .field("hue", &self.shape.hue)
            .field("following", &self.is_following())
            .finish()
    }
}

impl LightSource {
    /// Validate `desc` and bake the light map.
    pub fn new(desc: LightSourceDesc) -> LumenResult<Self> {
        let shape = Shape {
            radius: desc.radius,
            inner_radius: desc.inner_radius.unwrap_or(0.0),
            intensity: desc.intensity.unwrap_or(1.0),
            hue: desc.hue.unwrap_or(Color::WHITE),
        }
        .validate()?;
        let Baked {
            gradient,
            light_map,
        } = bake(shape)?;
        tracing::debug!(tag = %desc.tag, radius = shape.radius, "light source created");

        Ok(Self {
            tag: desc.tag,
            position: desc.position,
            shape,
            gradient,
            light_map,
            follow: None,
        })
    }

    /// Rebuild the light map from the current parameters.
    ///
    /// Repeated calls with unchanged parameters produce identical pixels.
    #[tracing::instrument(skip(self), fields(tag = %self.tag, radius = self.shape.radius))]
    pub fn compute_light_map(&mut self) -> LumenResult<()> {
        let Baked {
            gradient,
            light_map,
        } = bake(self.shape)?;
        self.gradient = gradient;
        self.light_map = light_map;
        tracing::debug!("light map baked");
        Ok(())
    }

    fn reshape(&mut self, shape: Shape) -> LumenResult<()> {
        let prev = std::mem::replace(&mut self.shape, shape.validate()?);
        if let Err(e) = self.compute_light_map() {
            self.shape = prev;
            return Err(e);
        }
        Ok(())
    }

    /// Change the outer radius and re-bake.
    pub fn set_radius(&mut self, radius: f64) -> LumenResult<()> {
        self.reshape(Shape { radius, ..self.shape })
    }

    /// Change the core radius and re-bake.
    pub fn set_inner_radius(&mut self, inner_radius: f64) -> LumenResult<()> {
        self.reshape(Shape {
            inner_radius,
            ..self.shape
        })
    }

    /// Change the intensity and re-bake.
    pub fn set_intensity(&mut self, intensity: f64) -> LumenResult<()> {
        self.reshape(Shape {
            intensity,
            ..self.shape
        })
    }

    /// Change the tint and re-bake.
    pub fn set_hue(&mut self, hue: Color) -> LumenResult<()> {
        self.reshape(Shape { hue, ..self.shape })
    }

    /// Move the anchor. The light map is unaffected.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Track `target`'s center. The light holds no ownership of it.
    pub fn follow_object<T: Positioned + 'static>(&mut self, target: &Rc<RefCell<T>>) {
        let target: Rc<RefCell<dyn Positioned>> = target.clone();
        self.follow = Some(Rc::downgrade(&target));
    }

    /// Stop tracking.
    pub fn unfollow_object(&mut self) {
        self.follow = None;
    }

    /// Whether a live follow target is held.
    pub fn is_following(&self) -> bool {
        self.follow
            .as_ref()
            .is_some_and(|w| w.strong_count() > 0)
    }

    fn follow_center(&self) -> Option<Point> {
        let target = self.follow.as_ref()?.upgrade()?;
        target.try_borrow().ok().map(|t| t.center())
    }

    /// Where the light's center lands for a render at `(x, y)`.
    pub fn render_anchor(&self, x: f64, y: f64) -> Point {
        let mut offset = Vec2::new(x, y);
        if let Some(center) = self.follow_center() {
            offset += center - self.position;
        }
        offset.to_point()
    }

    /// Destination rectangle of the light map for a render at `(x, y)`.
    pub fn light_map_rect(&self, x: f64, y: f64) -> Rect {
        let r = self.shape.radius;
        Rect::from_center_size(self.render_anchor(x, y), Size::new(r * 2.0, r * 2.0))
    }

    /// Composite the light map onto `framebuffer`, centered on [`LightSource::render_anchor`].
    pub fn render<F: Framebuffer + ?Sized>(
        &self,
        x: f64,
        y: f64,
        framebuffer: &mut F,
    ) -> LumenResult<()> {
        let rect = self.light_map_rect(x, y);
        framebuffer.render_texture(&self.light_map, rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Name used to refer to the light.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Outer radius.
    pub fn radius(&self) -> f64 {
        self.shape.radius
    }

    /// Core radius.
    pub fn inner_radius(&self) -> f64 {
        self.shape.inner_radius
    }

    /// Core alpha.
    pub fn intensity(&self) -> f64 {
        self.shape.intensity
    }

    /// Tint.
    pub fn hue(&self) -> Color {
        self.shape.hue
    }

    /// Hue RGB with alpha equal to the intensity, before bake correction.
    pub fn effective_color(&self) -> Color {
        self.shape.effective_color()
    }

    /// Gradient used by the latest bake, in light-map surface pixels.
    pub fn gradient(&self) -> &RadialGradient {
        &self.gradient
    }

    /// The baked light map.
    pub fn light_map(&self) -> &Texture {
        &self.light_map
    }
}

impl Positioned for LightSource {
    /// The light's anchor.
    fn position(&self) -> Point {
        self.position
    }

    fn dimensions(&self) -> Size {
        let d = self.shape.radius * 2.0;
        Size::new(d, d)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/light.rs"]
mod tests;
