//! Core engine types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - [`ImageInput`]: Raw bytes of one image and their origin
//! - [`CompressionPolicy`]: Per-format thresholds and quality levels
//! - [`Technique`]: The twelve named techniques, three per format
//! - [`CompressionResult`] / [`CompressionBatch`]: What a request returns

mod input;
mod policy;
mod types;

pub use input::ImageInput;
pub use policy::{
    ChromaSubsampling, CompressionPolicy, JpegPolicy, PaletteMethod, PngPolicy, TiffCompression,
    TiffPolicy, WebpPolicy,
};
pub use types::{
    ColorMode, CompressionBatch, CompressionResult, Technique, TechniqueOutput, bit_depth,
};
pub use crate::utils::FormatTag;
