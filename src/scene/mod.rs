//! Scene-level objects: positioned entities, textures and light sources.

/// Positioned-entity contract and the base scene object.
pub mod entity;
/// JSON scene files.
pub mod file;
/// Radial light sources with baked light maps.
pub mod light;
/// Textures decoded from image sources or built from surfaces.
pub mod texture;
