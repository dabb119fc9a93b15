// src/processing/techniques/jpeg.rs

use crate::core::TechniqueOutput;
use crate::processing::codecs::CodecResult;
use crate::processing::codecs::formats::{JpegSettings, encode_jpeg};
use crate::processing::codecs::resize::halve;

use super::TechniqueContext;

/// Progressive scans at full chroma resolution
pub fn progressive_encoding(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.jpeg;
    let settings = JpegSettings {
        quality: policy.progressive_quality,
        subsampling: policy.progressive_subsampling,
        progressive: true,
        optimize_huffman: false,
    };

    let data = encode_jpeg(ctx.image, &settings)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_quality(settings.quality))
}

/// Baseline with subsampled chroma and per-image Huffman tables
pub fn adaptive_huffman_coding(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.jpeg;
    let settings = JpegSettings {
        quality: policy.subsampled_quality,
        subsampling: policy.subsampled_subsampling,
        progressive: false,
        optimize_huffman: policy.optimize_huffman,
    };

    let data = encode_jpeg(ctx.image, &settings)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_quality(settings.quality))
}

/// Halves oversized images, then encodes with the strongest subsampling.
pub fn custom_compression(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.jpeg;
    let settings = JpegSettings {
        quality: policy.downsample_quality,
        subsampling: policy.downsample_subsampling,
        progressive: false,
        optimize_huffman: policy.optimize_huffman,
    };

    let resized;
    let target = if policy.needs_downsample(ctx.image.width(), ctx.image.height()) {
        resized = halve(ctx.image);
        &resized
    } else {
        ctx.image
    };

    let data = encode_jpeg(target, &settings)?;
    Ok(TechniqueOutput::encoded(data, target).with_quality(settings.quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompressionPolicy, ImageInput};
    use image::{DynamicImage, RgbImage};

    fn run(
        executor: fn(&TechniqueContext<'_>) -> CodecResult<TechniqueOutput>,
        width: u32,
        height: u32,
    ) -> TechniqueOutput {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let input = ImageInput::new(Vec::new());
        let policy = CompressionPolicy::default();
        executor(&TechniqueContext { image: &image, input: &input, policy: &policy }).unwrap()
    }

    #[test]
    fn custom_compression_halves_only_past_the_threshold() {
        let at_limit = run(custom_compression, 1920, 1080);
        assert_eq!((at_limit.width, at_limit.height), (1920, 1080));

        let wide = run(custom_compression, 1921, 100);
        assert_eq!((wide.width, wide.height), (960, 50));

        let tall = run(custom_compression, 100, 1081);
        assert_eq!((tall.width, tall.height), (50, 540));
    }

    #[test]
    fn quality_is_reported() {
        assert_eq!(run(progressive_encoding, 8, 8).quality, Some(85));
        assert_eq!(run(adaptive_huffman_coding, 8, 8).quality, Some(70));
        assert_eq!(run(custom_compression, 8, 8).quality, Some(75));
    }
}
