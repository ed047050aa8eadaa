//! Shared value types and the crate error.

/// Straight-alpha color value used for tints and gradient stops.
pub mod color;
/// Geometry re-exports and premultiplied pixel values.
pub mod core;
/// Error taxonomy.
pub mod error;
