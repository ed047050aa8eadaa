//! lumen2d loads bitmap textures off-thread and bakes radial light maps for 2D scenes.
//!
//! - Create a [`TextureLoader`] and build [`Texture`]s from [`TextureDesc`]s; drive their loads
//!   with [`Texture::poll`] or [`Texture::wait`]
//! - Create [`LightSource`]s, optionally follow a [`Positioned`] object
//! - Render lights into any [`Framebuffer`], for example a [`CpuFramebuffer`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image sources, decoding and the async loader.
pub mod assets;
/// Shared value types and errors.
pub mod foundation;
/// Raster surfaces, gradients, compositing and framebuffers.
pub mod render;
/// Entities, textures and light sources.
pub mod scene;

pub use crate::assets::loader::{PendingDecode, TextureLoader, TextureLoaderOpts};
pub use crate::assets::source::ImageSource;
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{LumenError, LumenResult};
pub use crate::render::composite::CompositeMode;
pub use crate::render::framebuffer::{CpuFramebuffer, CpuFramebufferOpts, FrameRGBA, Framebuffer};
pub use crate::render::gradient::RadialGradient;
pub use crate::render::surface::{Paint, PixelBuffer, RasterSurface};
pub use crate::scene::entity::{Positioned, SceneObject};
pub use crate::scene::file::{SceneFile, SceneLight};
pub use crate::scene::light::{LightSource, LightSourceDesc};
pub use crate::scene::texture::{LoadState, Texture, TextureDesc};
