use std::cell::OnceCell;
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Rgba8Premul, Size};
use crate::foundation::error::{LumenError, LumenResult};
use crate::render::composite::over;
use crate::render::gradient::RadialGradient;

/// Fill style for surface drawing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Uniform color.
    Solid(Color),
    /// Radial gradient evaluated per pixel center.
    Radial(RadialGradient),
}

impl Paint {
    fn sample(&self, p: Point) -> Option<Color> {
        match self {
            Self::Solid(c) => Some(*c),
            Self::Radial(g) => g.sample(p),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Self::Radial(g)
    }
}

/// Off-screen CPU raster surface, premultiplied RGBA8, row-major.
///
/// Dimensions are limited to `u16` so every surface can be handed to `vello_cpu` as an image
/// paint without further checks.
#[derive(Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    // Invalidated by every mutation.
    paint: OnceCell<vello_cpu::Image>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RasterSurface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> LumenResult<Self> {
        check_dim("width", width)?;
        check_dim("height", height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            paint: OnceCell::new(),
        })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_rgba8_premul(bytes: Vec<u8>, width: u32, height: u32) -> LumenResult<Self> {
        let mut surface = Self::new(width, height)?;
        if bytes.len() != surface.data.len() {
            return Err(LumenError::surface(format!(
                "rgba8 byte length {} does not match {width}x{height}",
                bytes.len()
            )));
        }
        surface.data = bytes;
        Ok(surface)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Raw premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        pixel_at(&self.data, self.width, self.height, x, y)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.touch();
        self.data.fill(0);
    }

    /// Reset pixels whose centers fall inside `rect` to transparent.
    pub fn clear_rect(&mut self, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        self.touch();
        let stride = self.width as usize * 4;
        for y in y0..y1 {
            let row = y as usize * stride;
            self.data[row + x0 as usize * 4..row + x1 as usize * 4].fill(0);
        }
    }

    /// Draw a decoded image with its top-left corner at `(dx, dy)` using source-over.
    pub fn draw_image(&mut self, image: &DecodedImage, dx: i64, dy: i64) -> LumenResult<()> {
        let src = image.rgba8_premul.as_slice();
        if src.len() != image.width as usize * image.height as usize * 4 {
            return Err(LumenError::surface("decoded image byte length mismatch"));
        }
        self.touch();

        let (sw, dw, dh) = (image.width as i64, self.width as i64, self.height as i64);
        let x_start = dx.max(0);
        let x_end = (dx + sw).min(dw);
        let y_start = dy.max(0);
        let y_end = (dy + image.height as i64).min(dh);
        for y in y_start..y_end {
            for x in x_start..x_end {
                let si = (((y - dy) * sw + (x - dx)) * 4) as usize;
                let di = ((y * dw + x) * 4) as usize;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, s, 1.0));
            }
        }
        Ok(())
    }

    /// Fill a circle with `paint`, anti-aliased over one pixel at the rim.
    pub fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let bounds = Rect::new(
            center.x - radius - 1.0,
            center.y - radius - 1.0,
            center.x + radius + 1.0,
            center.y + radius + 1.0,
        );
        let Some((x0, y0, x1, y1)) = self.pixel_span(bounds) else {
            return;
        };
        self.touch();

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let coverage = (radius + 0.5 - (p - center).hypot()).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let Some(color) = paint.sample(p) else {
                    continue;
                };
                let src = color.to_rgba8_premul().to_array();
                let di = ((y as usize) * (self.width as usize) + x as usize) * 4;
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, src, coverage as f32));
            }
        }
    }

    /// Snapshot of the full surface.
    pub fn pixel_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: Arc::new(self.data.clone()),
        }
    }

    /// The surface as a `vello_cpu` image paint, cached until the next mutation.
    pub(crate) fn image_paint(&self) -> LumenResult<&vello_cpu::Image> {
        if let Some(p) = self.paint.get() {
            return Ok(p);
        }
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(self.to_pixmap()?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        Ok(self.paint.get_or_init(|| paint))
    }

    fn to_pixmap(&self) -> LumenResult<vello_cpu::Pixmap> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| LumenError::surface("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| LumenError::surface("surface height exceeds u16"))?;

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(self.data.len() / 4);
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }
        Ok(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            w,
            h,
            may_have_opacities,
        ))
    }

    fn touch(&mut self) {
        self.paint.take();
    }

    /// Pixel index range `[x0, x1) x [y0, y1)` whose centers lie inside `rect`.
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let rect = rect.abs();
        let lo = |v: f64, max: u32| (v - 0.5).ceil().clamp(0.0, f64::from(max)) as u32;
        let (x0, x1) = (lo(rect.x0, self.width), lo(rect.x1, self.width));
        let (y0, y1) = (lo(rect.y0, self.height), lo(rect.y1, self.height));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

fn check_dim(name: &str, v: u32) -> LumenResult<()> {
    if v > u32::from(u16::MAX) {
        return Err(LumenError::surface(format!(
            "surface {name} {v} exceeds {}",
            u16::MAX
        )));
    }
    Ok(())
}

fn pixel_at(data: &[u8], width: u32, height: u32, x: u32, y: u32) -> Option<Rgba8Premul> {
    if x >= width || y >= height {
        return None;
    }
    let i = ((y as usize) * (width as usize) + x as usize) * 4;
    Some(Rgba8Premul::from_array([
        data[i],
        data[i + 1],
        data[i + 2],
        data[i + 3],
    ]))
}

/// Read-only snapshot of a surface's pixels (premultiplied RGBA8, row-major, tightly packed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl PixelBuffer {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        pixel_at(&self.data, self.width, self.height, x, y)
    }

    /// Copy of the pixels with premultiplication undone.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(
                &Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]).to_straight_rgba(),
            );
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
