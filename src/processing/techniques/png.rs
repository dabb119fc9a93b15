// src/processing/techniques/png.rs

use crate::core::TechniqueOutput;
use crate::processing::codecs::CodecResult;
use crate::processing::codecs::formats::{encode_png, encode_png_indexed};
use crate::processing::codecs::quantize::quantize;
use crate::processing::codecs::resize::halve;

use super::TechniqueContext;

/// Adaptive palette, indexed PNG
pub fn palette_quantization(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.png;
    let indexed = quantize(
        ctx.image,
        policy.palette_colors,
        policy.palette_method,
        policy.palette_dither,
    );

    let data = encode_png_indexed(&indexed)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_palette(indexed.palette.len()))
}

/// Lossless at full depth with maximum deflate.
///
/// Error diffusion only does anything when the depth drops, so at full depth
/// this is a pure re-encode.
pub fn deflate_dither(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let data = encode_png(ctx.image, ctx.policy.png.adaptive_filter)?;
    Ok(TechniqueOutput::encoded(data, ctx.image))
}

/// Halves large images, then reduces to a small max-coverage palette.
pub fn combined_reduction(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.png;

    let resized;
    let target = if policy.needs_downsample(ctx.image.width(), ctx.image.height()) {
        resized = halve(ctx.image);
        &resized
    } else {
        ctx.image
    };

    let indexed = quantize(
        target,
        policy.combined_colors,
        policy.combined_method,
        policy.combined_dither,
    );

    let data = encode_png_indexed(&indexed)?;
    Ok(TechniqueOutput::encoded(data, target).with_palette(indexed.palette.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompressionPolicy, ImageInput};
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[test]
    fn combined_reduction_halves_past_one_megapixel() {
        let policy = CompressionPolicy::default();
        let input = ImageInput::new(Vec::new());

        // 1025×1024 is one row past 1 048 576 pixels
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(1025, 1024, |x, y| {
            Rgb([(x % 7 * 30) as u8, (y % 5 * 40) as u8, 90])
        }));
        let ctx = TechniqueContext { image: &image, input: &input, policy: &policy };
        let output = combined_reduction(&ctx).unwrap();
        assert_eq!((output.width, output.height), (512, 512));
        assert!(output.palette_colors.unwrap() <= 32);

        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(1024, 1024, Rgb([1, 2, 3])));
        let ctx = TechniqueContext { image: &image, input: &input, policy: &policy };
        let output = combined_reduction(&ctx).unwrap();
        assert_eq!((output.width, output.height), (1024, 1024));
    }
}
