use crate::assets::decode::DecodedImage;
use crate::assets::loader::{DecodeOutcome, PendingDecode, TextureLoader};
use crate::assets::source::ImageSource;
use crate::foundation::core::{Size, Vec2};
use crate::foundation::error::{LumenError, LumenResult};
use crate::render::surface::{PixelBuffer, RasterSurface};

/// Lifecycle of a [`Texture`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No source was given, or nothing was requested yet.
    #[default]
    Unloaded,
    /// A decode is in flight.
    Loading,
    /// Pixels are available.
    Loaded,
    /// Decoding failed. Terminal.
    Failed,
}

impl LoadState {
    /// `Loaded` and `Failed` never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// Construction parameters for [`Texture::new`].
#[derive(Clone, Debug, Default)]
pub struct TextureDesc {
    /// Encoded image to load. `None` leaves the texture unloaded.
    pub source: Option<ImageSource>,
    /// Local origin offset.
    pub offset: Vec2,
    /// Explicit logical width, overriding the decoded one.
    pub width: Option<f64>,
    /// Explicit logical height, overriding the decoded one.
    pub height: Option<f64>,
}

impl TextureDesc {
    /// Descriptor for `source` with no explicit size or offset.
    pub fn from_source(source: impl Into<ImageSource>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Return a descriptor with explicit logical dimensions.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Return a descriptor with a local origin offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug)]
struct Loaded {
    surface: RasterSurface,
    pixels: PixelBuffer,
    natural: Size,
}

/// Pixel-addressable raster, decoded from an image source or built from a surface.
///
/// Decoding happens off-thread. The owner drives completion with [`Texture::poll`] (or
/// [`Texture::wait`]), so the texture only ever changes on its owner's turn. Once `Loaded` or
/// `Failed` it never changes again.
#[derive(Debug)]
pub struct Texture {
    source: Option<ImageSource>,
    offset: Vec2,
    width: Option<f64>,
    height: Option<f64>,
    state: LoadState,
    pending: Option<PendingDecode>,
    loaded: Option<Loaded>,
    failure: Option<LumenError>,
}

impl Texture {
    /// Create a texture and, when `desc` names a source, request its decode from `loader`.
    ///
    /// Never fails: load errors surface later through [`Texture::state`] and
    /// [`Texture::failure`].
    pub fn new(desc: TextureDesc, loader: &TextureLoader) -> Self {
        let mut tex = Self::unloaded(desc);
        if let Some(source) = &tex.source {
            tex.pending = Some(loader.request(source));
            tex.state = LoadState::Loading;
            tracing::debug!(source = %source.label(), "texture loading");
        }
        tex
    }

    /// A texture with no source. Stays `Unloaded` and allocates nothing.
    pub fn empty() -> Self {
        Self::unloaded(TextureDesc::default())
    }

    /// A texture that is `Loaded` immediately with `surface` as its content.
    ///
    /// Logical size defaults to the surface size.
    pub fn from_surface(surface: RasterSurface) -> Self {
        let natural = surface.size();
        let pixels = surface.pixel_buffer();
        Self {
            state: LoadState::Loaded,
            loaded: Some(Loaded {
                surface,
                pixels,
                natural,
            }),
            ..Self::empty()
        }
    }

    /// Return the texture with explicit logical dimensions.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Return the texture with a local origin offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    fn unloaded(desc: TextureDesc) -> Self {
        Self {
            source: desc.source,
            offset: desc.offset,
            width: desc.width,
            height: desc.height,
            state: LoadState::Unloaded,
            pending: None,
            loaded: None,
            failure: None,
        }
    }

    /// Pick up a finished decode without blocking. Returns the state afterwards.
    pub fn poll(&mut self) -> LoadState {
        let outcome = self.pending.as_ref().and_then(PendingDecode::try_take);
        if let Some(outcome) = outcome {
            self.pending = None;
            self.apply_decoded(outcome);
        }
        self.state
    }

    /// Block until an in-flight decode finishes. Returns the state afterwards.
    pub fn wait(&mut self) -> LoadState {
        if let Some(pending) = self.pending.take() {
            self.apply_decoded(pending.wait());
        }
        self.state
    }

    /// Deliver a decode outcome.
    ///
    /// Outcomes arriving after the texture reached `Loaded` or `Failed` are ignored.
    pub fn apply_decoded(&mut self, outcome: DecodeOutcome) {
        let label = self.label().to_owned();
        if self.state.is_terminal() {
            tracing::warn!(source = %label, state = ?self.state, "texture: ignoring late decode outcome");
            return;
        }
        self.pending = None;

        match outcome.and_then(|img| Self::rasterize(&img)) {
            Ok(loaded) => {
                tracing::debug!(
                    source = %label,
                    width = loaded.natural.width,
                    height = loaded.natural.height,
                    "texture loaded"
                );
                self.loaded = Some(loaded);
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::error!(source = %label, error = %err, "texture: failed to load resource");
                self.failure = Some(err);
                self.state = LoadState::Failed;
            }
        }
    }

    fn rasterize(img: &DecodedImage) -> LumenResult<Loaded> {
        let mut surface = RasterSurface::new(img.width, img.height)?;
        surface.clear();
        surface.draw_image(img, 0, 0)?;
        Ok(Loaded {
            pixels: surface.pixel_buffer(),
            natural: surface.size(),
            surface,
        })
    }

    fn label(&self) -> &str {
        self.source.as_ref().map_or("<surface>", ImageSource::label)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether pixels are available.
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// The drawable surface, once loaded.
    pub fn surface(&self) -> Option<&RasterSurface> {
        self.loaded.as_ref().map(|l| &l.surface)
    }

    /// Pixel snapshot taken right after load, premultiplied RGBA8.
    pub fn pixel_data(&self) -> Option<&PixelBuffer> {
        self.loaded.as_ref().map(|l| &l.pixels)
    }

    /// Logical width: the explicit one, else the decoded one.
    pub fn width(&self) -> Option<f64> {
        self.width
            .or_else(|| self.loaded.as_ref().map(|l| l.natural.width))
    }

    /// Logical height: the explicit one, else the decoded one.
    pub fn height(&self) -> Option<f64> {
        self.height
            .or_else(|| self.loaded.as_ref().map(|l| l.natural.height))
    }

    /// Local origin offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Natural size of the decoded image.
    pub fn decoded_dimensions(&self) -> Option<Size> {
        self.loaded.as_ref().map(|l| l.natural)
    }

    /// Load error, kept when the texture is `Failed`.
    pub fn failure(&self) -> Option<&LumenError> {
        self.failure.as_ref()
    }

    /// Source this texture was created from.
    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/texture.rs"]
mod tests;
