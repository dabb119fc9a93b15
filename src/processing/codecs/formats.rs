// src/processing/codecs/formats.rs

//! In-memory encoders, one per container format.
//!
//! Each function takes a read-only image and returns a fresh byte buffer.
//! Pixel layouts an encoder cannot take directly are converted into a private
//! copy first; the caller's image is never touched.

use std::borrow::Cow;
use std::io::{Cursor, Seek, Write};

use image::{DynamicImage, GrayImage, RgbImage};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder, SamplingFactor};
use tiff::encoder::{TiffEncoder, TiffValue, colortype, compression::Lzw};

use crate::core::{ChromaSubsampling, TiffCompression, bit_depth};

use super::quantize::IndexedImage;
use super::{CodecError, CodecResult};

// libwebp effort (0 = fast, 6 = slowest); 4 is libwebp's own default
const WEBP_METHOD: i32 = 4;

// ── JPEG ───────────────────────────────────────────────────────────────────────────────

/// Encoder knobs for one JPEG technique.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JpegSettings {
    pub quality: u8,
    pub subsampling: ChromaSubsampling,
    pub progressive: bool,
    pub optimize_huffman: bool,
}

fn sampling_factor(subsampling: ChromaSubsampling) -> SamplingFactor {
    match subsampling {
        ChromaSubsampling::Yuv444 => SamplingFactor::F_1_1,
        ChromaSubsampling::Yuv422 => SamplingFactor::F_2_1,
        ChromaSubsampling::Yuv420 => SamplingFactor::F_2_2,
    }
}

/// JPEG frame dimensions are 16-bit
fn jpeg_dimension(value: u32) -> CodecResult<u16> {
    u16::try_from(value)
        .map_err(|_| CodecError::layout(format!("JPEG dimension {value} exceeds 65535")))
}

/// Encodes `image` as baseline or progressive JPEG.
///
/// Grayscale sources stay single-channel; everything else goes through RGB.
pub fn encode_jpeg(image: &DynamicImage, settings: &JpegSettings) -> CodecResult<Vec<u8>> {
    let width = jpeg_dimension(image.width())?;
    let height = jpeg_dimension(image.height())?;

    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new(&mut output, settings.quality);
    encoder.set_progressive(settings.progressive);
    encoder.set_optimized_huffman_tables(settings.optimize_huffman);
    encoder.set_sampling_factor(sampling_factor(settings.subsampling));

    if image.color().has_color() {
        // Zero-copy when the decoder already produced RGB8
        let rgb: Cow<'_, RgbImage> = match image {
            DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
            _ => Cow::Owned(image.to_rgb8()),
        };
        encoder.encode(rgb.as_raw(), width, height, JpegColorType::Rgb)?;
    } else {
        let gray: Cow<'_, GrayImage> = match image {
            DynamicImage::ImageLuma8(gray) => Cow::Borrowed(gray),
            _ => Cow::Owned(image.to_luma8()),
        };
        encoder.encode(gray.as_raw(), width, height, JpegColorType::Luma)?;
    }

    Ok(output)
}

// ── PNG ────────────────────────────────────────────────────────────────────────────────

struct PngFrame<'a> {
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    data: &'a [u8],
    palette: Option<Vec<u8>>,
    trns: Option<Vec<u8>>,
}

/// PNG stores 16-bit samples big-endian
fn samples_be(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

fn write_png(frame: PngFrame<'_>, adaptive_filter: bool) -> CodecResult<Vec<u8>> {
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, frame.width, frame.height);
        encoder.set_color(frame.color);
        encoder.set_depth(frame.depth);
        encoder.set_compression(png::Compression::Best);
        if adaptive_filter {
            encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        } else {
            encoder.set_filter(png::FilterType::NoFilter);
        }
        if let Some(palette) = frame.palette {
            encoder.set_palette(palette);
        }
        if let Some(trns) = frame.trns {
            encoder.set_trns(trns);
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(frame.data)?;
        writer.finish()?;
    }
    Ok(output)
}

/// Encodes `image` losslessly at its own color depth with maximum deflate.
pub fn encode_png(image: &DynamicImage, adaptive_filter: bool) -> CodecResult<Vec<u8>> {
    use png::BitDepth::{Eight, Sixteen};
    use png::ColorType::{Grayscale, GrayscaleAlpha, Rgb, Rgba};

    let (color, depth, data): (png::ColorType, png::BitDepth, Cow<'_, [u8]>) = match image {
        DynamicImage::ImageLuma8(buf) => (Grayscale, Eight, Cow::Borrowed(buf.as_raw().as_slice())),
        DynamicImage::ImageLumaA8(buf) => (GrayscaleAlpha, Eight, Cow::Borrowed(buf.as_raw().as_slice())),
        DynamicImage::ImageRgb8(buf) => (Rgb, Eight, Cow::Borrowed(buf.as_raw().as_slice())),
        DynamicImage::ImageRgba8(buf) => (Rgba, Eight, Cow::Borrowed(buf.as_raw().as_slice())),
        DynamicImage::ImageLuma16(buf) => (Grayscale, Sixteen, Cow::Owned(samples_be(buf.as_raw()))),
        DynamicImage::ImageLumaA16(buf) => (GrayscaleAlpha, Sixteen, Cow::Owned(samples_be(buf.as_raw()))),
        DynamicImage::ImageRgb16(buf) => (Rgb, Sixteen, Cow::Owned(samples_be(buf.as_raw()))),
        DynamicImage::ImageRgba16(buf) => (Rgba, Sixteen, Cow::Owned(samples_be(buf.as_raw()))),
        // Float buffers: PNG tops out at 16 bits per sample
        other if other.color().has_alpha() => {
            (Rgba, Sixteen, Cow::Owned(samples_be(other.to_rgba16().as_raw())))
        }
        other => (Rgb, Sixteen, Cow::Owned(samples_be(other.to_rgb16().as_raw()))),
    };

    write_png(
        PngFrame {
            width: image.width(),
            height: image.height(),
            color,
            depth,
            data: &data,
            palette: None,
            trns: None,
        },
        adaptive_filter,
    )
}

/// Encodes a palette image as 8-bit indexed PNG, with `tRNS` only when needed.
pub fn encode_png_indexed(indexed: &IndexedImage) -> CodecResult<Vec<u8>> {
    if indexed.palette.is_empty() || indexed.palette.len() > 256 {
        return Err(CodecError::layout(format!(
            "indexed PNG needs 1..=256 palette entries, got {}",
            indexed.palette.len()
        )));
    }

    let palette = indexed.palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    let trns = indexed
        .has_transparency()
        .then(|| indexed.palette.iter().map(|c| c[3]).collect());

    write_png(
        PngFrame {
            width: indexed.width,
            height: indexed.height,
            color: png::ColorType::Indexed,
            depth: png::BitDepth::Eight,
            data: &indexed.indices,
            palette: Some(palette),
            trns,
        },
        false,
    )
}

// ── WebP ───────────────────────────────────────────────────────────────────────────────

/// Encodes `image` as lossy WebP at `quality` (0-100).
pub fn encode_webp(image: &DynamicImage, quality: u8) -> CodecResult<Vec<u8>> {
    let mut config =
        webp::WebPConfig::new().map_err(|_| CodecError::webp("failed to create WebPConfig"))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = WEBP_METHOD;

    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
        encode_webp_with(&encoder, &config)
    } else {
        let rgb = image.to_rgb8();
        let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());
        encode_webp_with(&encoder, &config)
    }
}

fn encode_webp_with(encoder: &webp::Encoder<'_>, config: &webp::WebPConfig) -> CodecResult<Vec<u8>> {
    let memory = encoder
        .encode_advanced(config)
        .map_err(|e| CodecError::webp(format!("{e:?}")))?;
    Ok(memory.to_vec())
}

// ── TIFF ───────────────────────────────────────────────────────────────────────────────

fn write_tiff<C, W>(
    encoder: &mut TiffEncoder<W>,
    width: u32,
    height: u32,
    data: &[C::Inner],
    compression: TiffCompression,
) -> CodecResult<()>
where
    C: colortype::ColorType,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    match compression {
        TiffCompression::Uncompressed => encoder.write_image::<C>(width, height, data)?,
        TiffCompression::Lzw => {
            encoder.write_image_with_compression::<C, _>(width, height, Lzw, data)?
        }
    }
    Ok(())
}

/// Encodes `image` as a single-strip-per-row TIFF at its own bit depth.
///
/// Gray+alpha and float layouts have no direct TIFF color type here and are
/// widened to RGBA (8 or 16 bit) first.
pub fn encode_tiff(image: &DynamicImage, compression: TiffCompression) -> CodecResult<Vec<u8>> {
    let (width, height) = (image.width(), image.height());
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?;
        let enc = &mut encoder;
        match image {
            DynamicImage::ImageLuma8(buf) => {
                write_tiff::<colortype::Gray8, _>(enc, width, height, buf.as_raw(), compression)?
            }
            DynamicImage::ImageLuma16(buf) => {
                write_tiff::<colortype::Gray16, _>(enc, width, height, buf.as_raw(), compression)?
            }
            DynamicImage::ImageRgb8(buf) => {
                write_tiff::<colortype::RGB8, _>(enc, width, height, buf.as_raw(), compression)?
            }
            DynamicImage::ImageRgba8(buf) => {
                write_tiff::<colortype::RGBA8, _>(enc, width, height, buf.as_raw(), compression)?
            }
            DynamicImage::ImageRgb16(buf) => {
                write_tiff::<colortype::RGB16, _>(enc, width, height, buf.as_raw(), compression)?
            }
            DynamicImage::ImageRgba16(buf) => {
                write_tiff::<colortype::RGBA16, _>(enc, width, height, buf.as_raw(), compression)?
            }
            other => match (other.color().has_alpha(), bit_depth(other) > 8) {
                (true, false) => write_tiff::<colortype::RGBA8, _>(
                    enc, width, height, other.to_rgba8().as_raw(), compression,
                )?,
                (true, true) => write_tiff::<colortype::RGBA16, _>(
                    enc, width, height, other.to_rgba16().as_raw(), compression,
                )?,
                (false, false) => write_tiff::<colortype::RGB8, _>(
                    enc, width, height, other.to_rgb8().as_raw(), compression,
                )?,
                (false, true) => write_tiff::<colortype::RGB16, _>(
                    enc, width, height, other.to_rgb16().as_raw(), compression,
                )?,
            },
        }
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, Rgba};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn progressive_jpeg_decodes_at_same_size() {
        let image = gradient(40, 24);
        let settings = JpegSettings {
            quality: 85,
            subsampling: ChromaSubsampling::Yuv444,
            progressive: true,
            optimize_huffman: false,
        };
        let bytes = encode_jpeg(&image, &settings).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 24));
    }

    #[test]
    fn gray_jpeg_stays_single_channel() {
        let image = DynamicImage::ImageLuma8(ImageBuffer::from_fn(16, 16, |x, _| Luma([(x * 16) as u8])));
        let settings = JpegSettings {
            quality: 70,
            subsampling: ChromaSubsampling::Yuv420,
            progressive: false,
            optimize_huffman: true,
        };
        let bytes = encode_jpeg(&image, &settings).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn png_keeps_sixteen_bit_depth() {
        let image = DynamicImage::ImageRgb16(ImageBuffer::from_fn(8, 8, |x, y| {
            Rgb([x as u16 * 4000, y as u16 * 4000, 1234])
        }));
        let bytes = encode_png(&image, true).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb16);
        assert_eq!(decoded.to_rgb16().as_raw(), image.to_rgb16().as_raw());
    }

    #[test]
    fn indexed_png_writes_transparency_only_when_present() {
        let opaque = IndexedImage {
            width: 2,
            height: 1,
            palette: vec![[255, 0, 0, 255], [0, 0, 255, 255]],
            indices: vec![0, 1],
        };
        let decoded = image::load_from_memory(&encode_png_indexed(&opaque).unwrap()).unwrap();
        assert!(!decoded.color().has_alpha());

        let translucent = IndexedImage {
            palette: vec![[255, 0, 0, 255], [0, 0, 255, 0]],
            ..opaque
        };
        let decoded = image::load_from_memory(&encode_png_indexed(&translucent).unwrap()).unwrap();
        assert_eq!(decoded.to_rgba8().get_pixel(1, 0), &Rgba([0, 0, 255, 0]));
    }

    #[test]
    fn unused_translucent_entry_writes_no_transparency() {
        let indexed = IndexedImage {
            width: 2,
            height: 1,
            palette: vec![[255, 0, 0, 255], [0, 0, 255, 255], [7, 7, 7, 0]],
            indices: vec![0, 1],
        };
        let decoded = image::load_from_memory(&encode_png_indexed(&indexed).unwrap()).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn webp_lossy_round_trips_dimensions() {
        let bytes = encode_webp(&gradient(33, 17), 75).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (33, 17));
    }

    #[test]
    fn lzw_tiff_is_lossless() {
        let image = gradient(20, 10);
        let bytes = encode_tiff(&image, TiffCompression::Lzw).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Tiff).unwrap();
        assert_eq!(decoded.to_rgb8().as_raw(), image.to_rgb8().as_raw());
    }

    #[test]
    fn gray_alpha_tiff_is_widened_to_rgba() {
        let image = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(4, 4, image::LumaA([90, 200])));
        let bytes = encode_tiff(&image, TiffCompression::Uncompressed).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
    }

    #[test]
    fn oversized_jpeg_is_a_layout_error() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(70_000, 1));
        let settings = JpegSettings {
            quality: 75,
            subsampling: ChromaSubsampling::Yuv420,
            progressive: false,
            optimize_huffman: false,
        };
        assert!(matches!(encode_jpeg(&image, &settings), Err(CodecError::Layout(_))));
    }
}
