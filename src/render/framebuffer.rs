use crate::foundation::core::{Affine, Rgba8Premul, Vec2};
use crate::foundation::error::{LumenError, LumenResult};
use crate::render::composite::{CompositeMode, composite_in_place};
use crate::scene::texture::Texture;

/// Compositing target that draws textures into a frame.
///
/// How a texture is blended with what is already there is the implementation's business.
pub trait Framebuffer {
    /// Draw `texture` scaled into the destination rectangle `(x, y, width, height)`.
    ///
    /// Textures that are not loaded draw nothing.
    fn render_texture(
        &mut self,
        texture: &Texture,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> LumenResult<()>;
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data, suitable for PNG encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        self.data
            .chunks_exact(4)
            .flat_map(|px| Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]).to_straight_rgba())
            .collect()
    }
}

/// Options for [`CpuFramebuffer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFramebufferOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
    pub(crate) mode: CompositeMode,
}

impl CpuFramebufferOpts {
    /// Return options with a straight-alpha clear color (`None` clears to transparent).
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a different blend mode for [`Framebuffer::render_texture`].
    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// CPU framebuffer: each texture draw is rasterized by `vello_cpu` into a scratch pixmap and
/// blended into the frame with the configured [`CompositeMode`].
///
/// Draws are shifted by the texture's [`Texture::offset`].
pub struct CpuFramebuffer {
    width: u16,
    height: u16,
    opts: CpuFramebufferOpts,
    target: Vec<u8>,
    scratch: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuFramebuffer {
    /// Allocate a cleared framebuffer.
    pub fn new(width: u32, height: u32, opts: CpuFramebufferOpts) -> LumenResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| LumenError::surface("framebuffer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| LumenError::surface("framebuffer height exceeds u16"))?;

        let mut fb = Self {
            width: w,
            height: h,
            opts,
            target: vec![0u8; (width as usize) * (height as usize) * 4],
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: None,
        };
        fb.clear();
        Ok(fb)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Blend mode used for texture draws.
    pub fn mode(&self) -> CompositeMode {
        self.opts.mode
    }

    /// Reset to the configured clear color.
    pub fn clear(&mut self) {
        let premul = self
            .opts
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a).to_array())
            .unwrap_or([0, 0, 0, 0]);
        for px in self.target.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Draw a texture at its natural surface size with source-over, regardless of
    /// the configured mode. Used for backgrounds.
    pub fn draw_background(&mut self, texture: &Texture) -> LumenResult<()> {
        let Some(surface) = texture.surface() else {
            return Ok(());
        };
        let size = surface.size();
        self.draw(texture, 0.0, 0.0, size.width, size.height, CompositeMode::Over)
    }

    /// Premultiplied RGBA8 bytes of the frame.
    pub fn data(&self) -> &[u8] {
        &self.target
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let t = &self.target;
        Some(Rgba8Premul::from_array([t[i], t[i + 1], t[i + 2], t[i + 3]]))
    }

    /// Copy of the current frame.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.target.clone(),
            premultiplied: true,
        }
    }

    fn draw(
        &mut self,
        texture: &Texture,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: CompositeMode,
    ) -> LumenResult<()> {
        let Some(surface) = texture.surface() else {
            tracing::trace!(state = ?texture.state(), "skipping draw of unloaded texture");
            return Ok(());
        };
        let size = surface.size();
        let drawable = [x, y, width, height].iter().all(|v| v.is_finite())
            && width > 0.0
            && height > 0.0
            && !size.is_zero_area();
        if !drawable {
            return Ok(());
        }

        let paint = surface.image_paint()?.clone();
        let transform = Affine::translate(Vec2::new(x, y) + texture.offset())
            * Affine::scale_non_uniform(width / size.width, height / size.height);

        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, size.width, size.height));
        ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);
        self.ctx = Some(ctx);

        composite_in_place(&mut self.target, self.scratch.data_as_u8_slice(), mode, 1.0)
    }
}

impl Framebuffer for CpuFramebuffer {
    fn render_texture(
        &mut self,
        texture: &Texture,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> LumenResult<()> {
        self.draw(texture, x, y, width, height, self.opts.mode)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/framebuffer.rs"]
mod tests;
