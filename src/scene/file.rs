use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context as _;

use crate::assets::loader::TextureLoader;
use crate::foundation::color::Color;
use crate::foundation::error::{LumenError, LumenResult};
use crate::render::composite::CompositeMode;
use crate::render::framebuffer::{CpuFramebuffer, CpuFramebufferOpts, FrameRGBA};
use crate::scene::entity::SceneObject;
use crate::scene::light::{LightSource, LightSourceDesc};
use crate::scene::texture::{LoadState, Texture, TextureDesc};

/// JSON scene description: a canvas, an optional background image, objects and lights.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Clear color. Transparent when absent.
    #[serde(default)]
    pub clear: Option<Color>,
    /// How lights blend into the frame.
    #[serde(default)]
    pub mode: CompositeMode,
    /// Background image path, relative to the assets root.
    #[serde(default)]
    pub background: Option<String>,
    /// Objects lights may follow, looked up by tag.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Lights, drawn in order.
    #[serde(default)]
    pub lights: Vec<SceneLight>,
}

/// A light entry in a [`SceneFile`].
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SceneLight {
    /// Light parameters.
    #[serde(flatten)]
    pub light: LightSourceDesc,
    /// Tag of the object to follow.
    #[serde(default)]
    pub follow: Option<String>,
}

impl SceneFile {
    /// Read and validate a scene from a JSON file.
    pub fn from_path(path: &Path) -> LumenResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(text: &str) -> LumenResult<Self> {
        let scene: Self = serde_json::from_str(text)
            .map_err(|e| LumenError::validation(format!("scene json: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check canvas size and follow references.
    pub fn validate(&self) -> LumenResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LumenError::validation("scene width/height must be > 0"));
        }
        for l in &self.lights {
            if let Some(tag) = &l.follow
                && !self.objects.iter().any(|o| o.tag() == tag)
            {
                return Err(LumenError::validation(format!(
                    "light '{}' follows unknown object '{tag}'",
                    l.light.tag
                )));
            }
        }
        Ok(())
    }

    /// Render the scene once into a fresh [`CpuFramebuffer`].
    ///
    /// A background that fails to load is logged and left out.
    pub fn render(&self, loader: &TextureLoader) -> LumenResult<FrameRGBA> {
        self.validate()?;
        let opts = CpuFramebufferOpts::default()
            .with_clear_rgba(self.clear.map(|c| c.to_rgba8_premul().to_straight_rgba()))
            .with_mode(self.mode);
        let mut fb = CpuFramebuffer::new(self.width, self.height, opts)?;

        if let Some(path) = &self.background {
            let mut bg = Texture::new(TextureDesc::from_source(path.as_str()), loader);
            if bg.wait() == LoadState::Failed {
                tracing::warn!(background = %path, "scene background left out");
            }
            fb.draw_background(&bg)?;
        }

        let objects: HashMap<&str, Rc<RefCell<SceneObject>>> = self
            .objects
            .iter()
            .map(|o| (o.tag(), Rc::new(RefCell::new(o.clone()))))
            .collect();

        for entry in &self.lights {
            let mut light = LightSource::new(entry.light.clone())?;
            if let Some(target) = entry.follow.as_deref().and_then(|t| objects.get(t)) {
                light.follow_object(target);
            }
            let anchor = entry.light.position;
            light.render(anchor.x, anchor.y, &mut fb)?;
        }

        tracing::debug!(lights = self.lights.len(), "scene rendered");
        Ok(fb.frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/file.rs"]
mod tests;
