// src/processing/engine.rs

//! Compression engine: detect, decode once, run the three techniques of the
//! format's strategy.
//!
//! Two entry points share the same pipeline:
//!
//! - [`CompressionEngine::compress`] runs everything on the calling thread.
//! - [`CompressionEngine::compress_concurrent`] decodes on tokio's blocking
//!   pool, then runs the three techniques on three blocking tasks that share
//!   the decoded image through an `Arc`.
//!
//! Any technique failure aborts the request; a batch always holds exactly
//! three results.

use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::core::{
    ColorMode, CompressionBatch, CompressionPolicy, CompressionResult, ImageInput, bit_depth,
};
use crate::utils::{EngineResult, validate_policy};

use super::decode::decode;
use super::detect::detect;
use super::strategy::Strategy;
use super::techniques::{TechniqueContext, run_technique};

/// Stateless engine holding one validated, immutable policy.
#[derive(Debug, Clone)]
pub struct CompressionEngine {
    policy: Arc<CompressionPolicy>,
}

impl CompressionEngine {
    /// Validates `policy` and builds an engine around it.
    pub fn new(policy: CompressionPolicy) -> EngineResult<Self> {
        validate_policy(&policy)?;
        Ok(Self {
            policy: Arc::new(policy),
        })
    }

    pub fn policy(&self) -> &CompressionPolicy {
        &self.policy
    }

    /// Compresses `input` with all three techniques of its format, in order.
    pub fn compress(&self, input: &ImageInput) -> EngineResult<CompressionBatch> {
        let start = Instant::now();
        let strategy = Strategy::for_format(detect(input.bytes())?);
        let image = decode(input.bytes(), strategy.format())?;

        let ctx = TechniqueContext {
            image: &image,
            input,
            policy: &self.policy,
        };
        let [t1, t2, t3] = strategy.techniques();
        let results = [
            run_technique(t1.0, t1.1, &ctx)?,
            run_technique(t2.0, t2.1, &ctx)?,
            run_technique(t3.0, t3.1, &ctx)?,
        ];

        let batch = build_batch(strategy, &image, input, results);
        log_batch(input, &batch, start);
        Ok(batch)
    }

    /// Same as [`compress`](Self::compress), with decode and each technique on
    /// tokio's blocking pool.
    ///
    /// Results are awaited in technique order. Dropping the future discards the
    /// whole batch.
    pub async fn compress_concurrent(&self, input: ImageInput) -> EngineResult<CompressionBatch> {
        let start = Instant::now();
        let strategy = Strategy::for_format(detect(input.bytes())?);
        let input = Arc::new(input);

        let image = {
            let input = Arc::clone(&input);
            tokio::task::spawn_blocking(move || decode(input.bytes(), strategy.format())).await??
        };
        let image = Arc::new(image);

        let handles = strategy.techniques().map(|(technique, executor)| {
            let image = Arc::clone(&image);
            let input = Arc::clone(&input);
            let policy = Arc::clone(&self.policy);
            tokio::task::spawn_blocking(move || {
                let ctx = TechniqueContext {
                    image: &image,
                    input: &input,
                    policy: &policy,
                };
                run_technique(technique, executor, &ctx)
            })
        });

        // An early error drops the remaining handles; their output is discarded with the batch
        let [h1, h2, h3] = handles;
        let results = [h1.await??, h2.await??, h3.await??];

        let batch = build_batch(strategy, &image, &input, results);
        log_batch(&input, &batch, start);
        Ok(batch)
    }
}

fn build_batch(
    strategy: Strategy,
    image: &DynamicImage,
    input: &ImageInput,
    results: [CompressionResult; 3],
) -> CompressionBatch {
    CompressionBatch {
        format: strategy.format(),
        source_width: image.width(),
        source_height: image.height(),
        color_mode: ColorMode::of(image),
        bit_depth: bit_depth(image),
        original_size: input.original_size(),
        results,
    }
}

fn log_batch(input: &ImageInput, batch: &CompressionBatch, start: Instant) {
    for result in &batch.results {
        debug!(
            "{} [{}]: {} bytes ({:.1}% saved)",
            input.display_name(),
            result.label,
            result.size,
            result.compression_ratio(batch.original_size)
        );
    }

    info!(
        "Compressed {} ({}, {}×{}) into 3 variants in {:.2?}",
        input.display_name(),
        batch.format,
        batch.source_width,
        batch.source_height,
        start.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EngineError;

    #[test]
    fn invalid_policy_is_rejected_at_construction() {
        let mut policy = CompressionPolicy::default();
        policy.jpeg.progressive_quality = 0;
        let err = CompressionEngine::new(policy).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn unsupported_bytes_fail_before_decoding() {
        let engine = CompressionEngine::new(CompressionPolicy::default()).unwrap();
        let err = engine.compress(&ImageInput::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }
}
