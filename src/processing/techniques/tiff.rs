// src/processing/techniques/tiff.rs

use image::DynamicImage;

use crate::core::{ColorMode, TechniqueOutput, TiffCompression, bit_depth};
use crate::processing::codecs::CodecResult;
use crate::processing::codecs::formats::encode_tiff;
use crate::processing::codecs::quantize::quantize;

use super::TechniqueContext;

/// Same layout and depth, LZW
pub fn lzw_compression(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let data = encode_tiff(ctx.image, TiffCompression::Lzw)?;
    Ok(TechniqueOutput::encoded(data, ctx.image))
}

/// Reduces color images to an adaptive palette.
///
/// The `tiff` encoder has no palette color type, so the reduced colors are
/// written back out as 8-bit RGB(A). Gray inputs are re-encoded as they are.
pub fn bit_depth_reduction(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.tiff;

    if !ColorMode::of(ctx.image).is_color() {
        let data = encode_tiff(ctx.image, policy.palette_compression)?;
        return Ok(TechniqueOutput::encoded(data, ctx.image));
    }

    let indexed = quantize(ctx.image, policy.palette_colors, policy.palette_method, false);
    let rgba = indexed.to_rgba();
    let reduced = if ctx.image.color().has_alpha() {
        DynamicImage::ImageRgba8(rgba)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
    };

    let data = encode_tiff(&reduced, policy.palette_compression)?;
    Ok(TechniqueOutput::encoded(data, &reduced).with_palette(indexed.palette.len()))
}

/// Single-channel luma; alpha is dropped, 16-bit sources stay 16-bit.
pub fn grayscale_conversion(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let gray = if bit_depth(ctx.image) > 8 {
        DynamicImage::ImageLuma16(ctx.image.to_luma16())
    } else {
        DynamicImage::ImageLuma8(ctx.image.to_luma8())
    };

    let data = encode_tiff(&gray, ctx.policy.tiff.grayscale_compression)?;
    Ok(TechniqueOutput::encoded(data, &gray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompressionPolicy, ImageInput};
    use image::{ImageBuffer, Rgba};

    #[test]
    fn bit_depth_reduction_keeps_alpha_channel() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_fn(300, 4, |x, y| {
            Rgba([x as u8, (x / 2) as u8, y as u8 * 60, 200])
        }));
        let policy = CompressionPolicy::default();
        let input = ImageInput::new(Vec::new());
        let ctx = TechniqueContext { image: &image, input: &input, policy: &policy };

        let output = bit_depth_reduction(&ctx).unwrap();
        assert!(output.palette_colors.unwrap() <= 256);
        let decoded = image::load_from_memory(&output.data).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
    }

    #[test]
    fn bit_depth_reduction_reencodes_gray_unchanged() {
        let image = DynamicImage::ImageLuma8(ImageBuffer::from_fn(300, 2, |x, _| image::Luma([x as u8])));
        let policy = CompressionPolicy::default();
        let input = ImageInput::new(Vec::new());
        let ctx = TechniqueContext { image: &image, input: &input, policy: &policy };

        let output = bit_depth_reduction(&ctx).unwrap();
        assert_eq!(output.palette_colors, None);
        let decoded = image::load_from_memory(&output.data).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
        assert_eq!(decoded.to_luma8().as_raw(), image.to_luma8().as_raw());
    }

    #[test]
    fn grayscale_drops_alpha_and_keeps_depth() {
        let image = DynamicImage::ImageRgba16(ImageBuffer::from_pixel(6, 6, Rgba([9000, 20000, 3000, 40000])));
        let policy = CompressionPolicy::default();
        let input = ImageInput::new(Vec::new());
        let ctx = TechniqueContext { image: &image, input: &input, policy: &policy };

        let output = grayscale_conversion(&ctx).unwrap();
        let decoded = image::load_from_memory(&output.data).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L16);
    }
}
