//! Core types for compression techniques and their results.

use std::fmt;

use image::DynamicImage;
use serde::Serialize;

use crate::utils::FormatTag;

/// One of the twelve named compression techniques, three per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    // JPEG
    ProgressiveEncoding,
    AdaptiveHuffmanCoding,
    CustomCompression,
    // PNG
    PaletteQuantization,
    DeflateDither,
    CombinedReduction,
    // WEBP
    SizeAdaptiveLossy,
    ConditionalLossy,
    PixelAdaptiveLossy,
    // TIFF
    LzwCompression,
    BitDepthReduction,
    GrayscaleConversion,
}

impl Technique {
    /// Human-readable label shown next to the variant
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProgressiveEncoding => "Progressive Encoding",
            Self::AdaptiveHuffmanCoding => "Adaptive Huffman Coding",
            Self::CustomCompression => "Custom Compression",
            Self::PaletteQuantization => "Palette Quantization",
            Self::DeflateDither => "Deflate+Dither",
            Self::CombinedReduction => "Combined Reduction",
            Self::SizeAdaptiveLossy => "Size-Adaptive Lossy",
            Self::ConditionalLossy => "Conditional Lossy",
            Self::PixelAdaptiveLossy => "Pixel-Adaptive Lossy",
            Self::LzwCompression => "LZW Compression",
            Self::BitDepthReduction => "Bit-Depth Reduction",
            Self::GrayscaleConversion => "Grayscale Conversion",
        }
    }

    /// File-name friendly identifier, e.g. `progressive-encoding`
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ProgressiveEncoding => "progressive-encoding",
            Self::AdaptiveHuffmanCoding => "adaptive-huffman-coding",
            Self::CustomCompression => "custom-compression",
            Self::PaletteQuantization => "palette-quantization",
            Self::DeflateDither => "deflate-dither",
            Self::CombinedReduction => "combined-reduction",
            Self::SizeAdaptiveLossy => "size-adaptive-lossy",
            Self::ConditionalLossy => "conditional-lossy",
            Self::PixelAdaptiveLossy => "pixel-adaptive-lossy",
            Self::LzwCompression => "lzw-compression",
            Self::BitDepthReduction => "bit-depth-reduction",
            Self::GrayscaleConversion => "grayscale-conversion",
        }
    }

    /// Format whose strategy owns this technique
    pub fn format(&self) -> FormatTag {
        match self {
            Self::ProgressiveEncoding | Self::AdaptiveHuffmanCoding | Self::CustomCompression => {
                FormatTag::Jpeg
            }
            Self::PaletteQuantization | Self::DeflateDither | Self::CombinedReduction => {
                FormatTag::Png
            }
            Self::SizeAdaptiveLossy | Self::ConditionalLossy | Self::PixelAdaptiveLossy => {
                FormatTag::Webp
            }
            Self::LzwCompression | Self::BitDepthReduction | Self::GrayscaleConversion => {
                FormatTag::Tiff
            }
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channel layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        let color = image.color();
        match (color.has_color(), color.has_alpha()) {
            (false, false) => Self::Gray,
            (false, true) => Self::GrayAlpha,
            (true, false) => Self::Rgb,
            (true, true) => Self::Rgba,
        }
    }

    /// RGB or RGBA
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Rgb | Self::Rgba)
    }
}

/// Bits per channel of a decoded image (8, 16 or 32)
pub fn bit_depth(image: &DynamicImage) -> u16 {
    let color = image.color();
    color.bits_per_pixel() / color.channel_count() as u16
}

/// Parameters a technique actually applied, plus its encoded buffer.
///
/// Produced by a technique executor; the engine pairs it with the technique
/// and format to build a [`CompressionResult`].
#[derive(Debug, Clone)]
pub struct TechniqueOutput {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: Option<u8>,
    pub palette_colors: Option<usize>,
    pub passthrough: bool,
}

impl TechniqueOutput {
    /// Output encoded from `image`
    pub fn encoded(data: Vec<u8>, image: &DynamicImage) -> Self {
        Self {
            data,
            width: image.width(),
            height: image.height(),
            quality: None,
            palette_colors: None,
            passthrough: false,
        }
    }

    /// Output that is a verbatim copy of the input bytes
    pub fn passthrough(data: Vec<u8>, image: &DynamicImage) -> Self {
        Self {
            passthrough: true,
            ..Self::encoded(data, image)
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_palette(mut self, colors: usize) -> Self {
        self.palette_colors = Some(colors);
        self
    }
}

/// Result of one technique.
///
/// `size` always equals `data.len()`; the buffer itself is skipped when the
/// result is serialized for a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    /// Which technique produced this buffer
    pub technique: Technique,
    /// Human-readable technique label
    pub label: &'static str,
    /// Container format of `data`, always the input format
    pub format: FormatTag,
    /// Encoded bytes
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Encoded size in bytes
    pub size: usize,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Quality the lossy encoder ran at
    pub quality: Option<u8>,
    /// Number of palette entries, for palette-reduced outputs
    pub palette_colors: Option<usize>,
    /// `true` when `data` is the input copied verbatim
    pub passthrough: bool,
}

impl CompressionResult {
    pub fn new(technique: Technique, output: TechniqueOutput) -> Self {
        Self {
            technique,
            label: technique.label(),
            format: technique.format(),
            size: output.data.len(),
            data: output.data,
            width: output.width,
            height: output.height,
            quality: output.quality,
            palette_colors: output.palette_colors,
            passthrough: output.passthrough,
        }
    }

    /// Bytes saved relative to `original_size` (negative when the variant grew)
    pub fn saved_bytes(&self, original_size: u64) -> i64 {
        original_size as i64 - self.size as i64
    }

    /// Saved bytes as a percentage of `original_size`
    pub fn compression_ratio(&self, original_size: u64) -> f64 {
        if original_size > 0 {
            self.saved_bytes(original_size) as f64 / original_size as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// The three results of one compression request, in technique order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionBatch {
    /// Detected input format
    pub format: FormatTag,
    /// Decoded source width
    pub source_width: u32,
    /// Decoded source height
    pub source_height: u32,
    /// Decoded source channel layout
    pub color_mode: ColorMode,
    /// Decoded source bits per channel
    pub bit_depth: u16,
    /// Original file size the data-dependent policies were evaluated against
    pub original_size: u64,
    /// Exactly one result per technique, technique 1 first
    pub results: [CompressionResult; 3],
}

impl CompressionBatch {
    /// Labels zipped with buffers, the shape a display surface consumes
    pub fn labeled_buffers(&self) -> impl Iterator<Item = (&'static str, &[u8])> {
        self.results.iter().map(|r| (r.label, r.data.as_slice()))
    }
}
