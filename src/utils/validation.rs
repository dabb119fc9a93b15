use crate::core::{CompressionPolicy, JpegPolicy, PngPolicy, TiffPolicy, WebpPolicy};
use crate::utils::{EngineError, EngineResult};

/// Validates a policy before an engine is built from it
pub fn validate_policy(policy: &CompressionPolicy) -> EngineResult<()> {
    validate_jpeg(&policy.jpeg)?;
    validate_png(&policy.png)?;
    validate_webp(&policy.webp)?;
    validate_tiff(&policy.tiff)?;
    Ok(())
}

fn validate_jpeg(policy: &JpegPolicy) -> EngineResult<()> {
    validate_quality("jpeg.progressive_quality", policy.progressive_quality)?;
    validate_quality("jpeg.subsampled_quality", policy.subsampled_quality)?;
    validate_quality("jpeg.downsample_quality", policy.downsample_quality)?;

    if policy.downsample_max_width == 0 || policy.downsample_max_height == 0 {
        return Err(EngineError::validation("jpeg downsample thresholds cannot be 0"));
    }

    Ok(())
}

fn validate_png(policy: &PngPolicy) -> EngineResult<()> {
    validate_palette("png.palette_colors", policy.palette_colors)?;
    validate_palette("png.combined_colors", policy.combined_colors)?;

    if policy.combined_max_pixels == 0 {
        return Err(EngineError::validation("png.combined_max_pixels cannot be 0"));
    }

    Ok(())
}

fn validate_webp(policy: &WebpPolicy) -> EngineResult<()> {
    validate_quality("webp.large_file_quality", policy.large_file_quality)?;
    validate_quality("webp.small_file_quality", policy.small_file_quality)?;
    validate_quality("webp.moderate_quality", policy.moderate_quality)?;
    validate_quality("webp.large_image_quality", policy.large_image_quality)?;
    validate_quality("webp.small_image_quality", policy.small_image_quality)?;
    Ok(())
}

fn validate_tiff(policy: &TiffPolicy) -> EngineResult<()> {
    validate_palette("tiff.palette_colors", policy.palette_colors)
}

fn validate_quality(field: &str, quality: u8) -> EngineResult<()> {
    if quality == 0 || quality > 100 {
        return Err(EngineError::validation(format!(
            "Invalid quality value for {}: {}. Must be between 1 and 100",
            field, quality
        )));
    }
    Ok(())
}

fn validate_palette(field: &str, colors: usize) -> EngineResult<()> {
    if !(2..=256).contains(&colors) {
        return Err(EngineError::validation(format!(
            "Invalid palette size for {}: {}. Must be between 2 and 256",
            field, colors
        )));
    }
    Ok(())
}
