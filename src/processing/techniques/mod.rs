// src/processing/techniques/mod.rs

//! The twelve technique executors, three per format.
//!
//! An executor reads the shared decoded image and returns one encoded buffer.
//! Executors never see each other's output and never mutate the image, so the
//! engine is free to run the three of a strategy in any order or in parallel.

pub mod jpeg;
pub mod png;
pub mod tiff;
pub mod webp;

use std::time::Instant;

use image::DynamicImage;
use tracing::debug;

use crate::core::{CompressionPolicy, CompressionResult, ImageInput, Technique, TechniqueOutput};
use crate::processing::codecs::CodecResult;
use crate::utils::{EngineError, EngineResult};

/// Everything an executor may read.
#[derive(Debug, Clone, Copy)]
pub struct TechniqueContext<'a> {
    /// Decoded source, shared read-only
    pub image: &'a DynamicImage,
    /// Original bytes; WEBP pass-through copies them verbatim
    pub input: &'a ImageInput,
    pub policy: &'a CompressionPolicy,
}

pub type Executor = fn(&TechniqueContext<'_>) -> CodecResult<TechniqueOutput>;

/// Runs one executor and tags its output (or failure) with `technique`.
pub fn run_technique(
    technique: Technique,
    executor: Executor,
    ctx: &TechniqueContext<'_>,
) -> EngineResult<CompressionResult> {
    let start = Instant::now();
    let output = executor(ctx).map_err(|e| EngineError::technique(technique, e))?;

    debug!(
        "{} → {} bytes, {}×{} in {:.1?}",
        technique,
        output.data.len(),
        output.width,
        output.height,
        start.elapsed()
    );

    Ok(CompressionResult::new(technique, output))
}
