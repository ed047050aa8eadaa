use crate::foundation::core::{Point, Size, Vec2};

/// Something with a position and a bounding size in scene space.
///
/// `position` is the top-left corner of the bounding box.
pub trait Positioned {
    /// Top-left anchor.
    fn position(&self) -> Point;

    /// Bounding box size.
    fn dimensions(&self) -> Size;

    /// Center of the bounding box.
    fn center(&self) -> Point {
        let d = self.dimensions();
        self.position() + Vec2::new(d.width / 2.0, d.height / 2.0)
    }
}

/// Plain positioned entity, the minimal base for anything placed in a scene.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneObject {
    #[serde(default)]
    tag: String,
    #[serde(default, with = "point_xy")]
    position: Point,
    #[serde(default, with = "size_wh")]
    dimensions: Size,
}

impl SceneObject {
    /// Create an object at `position` with the given bounding `dimensions`.
    pub fn new(tag: impl Into<String>, position: Point, dimensions: Size) -> Self {
        Self {
            tag: tag.into(),
            position,
            dimensions,
        }
    }

    /// Name used to refer to this object.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Move the anchor to `position`.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Move the anchor by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl Positioned for SceneObject {
    fn position(&self) -> Point {
        self.position
    }

    fn dimensions(&self) -> Size {
        self.dimensions
    }
}

// Scene files write points as `[x, y]` and sizes as `[w, h]`.
pub(crate) mod point_xy {
    use crate::foundation::core::Point;
    use serde::Deserialize;

    pub(crate) fn deserialize<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        let [x, y] = <[f64; 2]>::deserialize(d)?;
        Ok(Point::new(x, y))
    }
}

pub(crate) mod size_wh {
    use crate::foundation::core::Size;
    use serde::Deserialize;

    pub(crate) fn deserialize<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Size, D::Error> {
        let [w, h] = <[f64; 2]>::deserialize(d)?;
        Ok(Size::new(w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
