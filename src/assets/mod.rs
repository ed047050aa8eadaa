//! Image sources, decoding, and the asynchronous decode loader.

/// Image decoding into premultiplied RGBA8.
pub mod decode;
/// Worker-pool loader issuing single-resolution decode requests.
pub mod loader;
/// Image source identifiers and asset path rules.
pub mod source;
