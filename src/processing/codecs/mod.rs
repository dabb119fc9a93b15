// src/processing/codecs/mod.rs

//! Encoders, resampling and palette reduction used by the techniques.
//!
//! # Architecture
//!
//! - [`formats`]: One in-memory encoder per container (`jpeg-encoder`, `png`, `webp`, `tiff`).
//! - [`resize`]: Lanczos3 halving via `fast_image_resize`, falling back to `image::imageops`.
//! - [`quantize`]: Adaptive (NeuQuant) and max-coverage (median cut) palettes.
//!
//! Nothing here mutates its input; every function returns a new buffer.

pub mod formats;
pub mod quantize;
pub mod resize;

use thiserror::Error;

/// Failure inside a single encode step.
///
/// The engine wraps this into [`crate::utils::EngineError::Technique`] together
/// with the technique that hit it.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JPEG encode failed: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    #[error("PNG encode failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("WebP encode failed: {0}")]
    Webp(String),

    #[error("TIFF encode failed: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Unsupported pixel layout: {0}")]
    Layout(String),
}

impl CodecError {
    pub fn webp<T: Into<String>>(msg: T) -> Self {
        Self::Webp(msg.into())
    }

    pub fn layout<T: Into<String>>(msg: T) -> Self {
        Self::Layout(msg.into())
    }
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
