//! File-level compress and detect handlers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{CompressionBatch, FormatTag, Technique};
use crate::processing::{CompressionEngine, detect};
use crate::utils::{
    EngineResult, format_from_extension, read_input, read_input_async, variant_path, write_variant,
};

/// How a compress command should run.
#[derive(Debug, Clone, Default)]
pub struct CompressOptions {
    /// Where variants are written; defaults to the input's directory
    pub out_dir: Option<PathBuf>,
    /// Use the concurrent engine path
    pub concurrent: bool,
}

/// One written variant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantReport {
    pub technique: Technique,
    pub label: &'static str,
    pub path: PathBuf,
    pub size: usize,
    pub width: u32,
    pub height: u32,
    pub quality: Option<u8>,
    pub palette_colors: Option<usize>,
    pub passthrough: bool,
    pub saved_bytes: i64,
    pub compression_ratio: f64,
}

/// Everything a compress command produced for one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub input_path: PathBuf,
    pub format: FormatTag,
    pub source_width: u32,
    pub source_height: u32,
    pub original_size: u64,
    pub variants: Vec<VariantReport>,
}

/// Compresses the image at `path` and writes its three variants.
pub async fn compress_file(
    engine: &CompressionEngine,
    path: &Path,
    options: &CompressOptions,
) -> EngineResult<FileReport> {
    let batch = if options.concurrent {
        let input = read_input_async(path).await?;
        engine.compress_concurrent(input).await?
    } else {
        let input = read_input(path)?;
        engine.compress(&input)?
    };

    warn_on_extension_mismatch(path, batch.format);
    write_variants(path, options.out_dir.as_deref(), batch)
}

/// Writes each result of `batch` next to `input_path` (or into `out_dir`).
pub fn write_variants(
    input_path: &Path,
    out_dir: Option<&Path>,
    batch: CompressionBatch,
) -> EngineResult<FileReport> {
    let original_size = batch.original_size;
    let mut variants = Vec::with_capacity(batch.results.len());

    for (idx, result) in batch.results.iter().enumerate() {
        let path = variant_path(input_path, out_dir, idx + 1, result.technique, result.format);
        write_variant(&path, &result.data)?;
        debug!("Wrote {} ({} bytes)", path.display(), result.size);

        variants.push(VariantReport {
            technique: result.technique,
            label: result.label,
            path,
            size: result.size,
            width: result.width,
            height: result.height,
            quality: result.quality,
            palette_colors: result.palette_colors,
            passthrough: result.passthrough,
            saved_bytes: result.saved_bytes(original_size),
            compression_ratio: result.compression_ratio(original_size),
        });
    }

    Ok(FileReport {
        input_path: input_path.to_path_buf(),
        format: batch.format,
        source_width: batch.source_width,
        source_height: batch.source_height,
        original_size,
        variants,
    })
}

/// Detects the format of the file at `path` from its signature.
pub fn detect_file(path: &Path) -> EngineResult<FormatTag> {
    let input = read_input(path)?;
    let format = detect(input.bytes())?;
    warn_on_extension_mismatch(path, format);
    Ok(format)
}

fn warn_on_extension_mismatch(path: &Path, detected: FormatTag) {
    if let Some(claimed) = format_from_extension(path) {
        if claimed != detected {
            warn!(
                "{} has a .{} extension but its signature is {}",
                path.display(),
                path.extension().and_then(|e| e.to_str()).unwrap_or_default(),
                detected
            );
        }
    }
}
