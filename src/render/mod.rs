//! CPU raster primitives and the framebuffer collaborator.

/// Premultiplied RGBA8 blending.
pub mod composite;
/// Framebuffer trait and the CPU framebuffer.
pub mod framebuffer;
/// Radial gradients.
pub mod gradient;
/// Off-screen raster surfaces.
pub mod surface;
