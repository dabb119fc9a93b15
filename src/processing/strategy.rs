// src/processing/strategy.rs

//! Format → technique table.
//!
//! Each format owns exactly three techniques in a fixed order. The tables are
//! static so the order (and therefore the variant numbering in file names)
//! can never drift between runs.

use crate::core::{FormatTag, Technique};

use super::techniques::{Executor, jpeg, png, tiff, webp};

/// Compression strategy for one input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Jpeg,
    Png,
    Webp,
    Tiff,
}

static JPEG_TECHNIQUES: [(Technique, Executor); 3] = [
    (Technique::ProgressiveEncoding, jpeg::progressive_encoding),
    (Technique::AdaptiveHuffmanCoding, jpeg::adaptive_huffman_coding),
    (Technique::CustomCompression, jpeg::custom_compression),
];

static PNG_TECHNIQUES: [(Technique, Executor); 3] = [
    (Technique::PaletteQuantization, png::palette_quantization),
    (Technique::DeflateDither, png::deflate_dither),
    (Technique::CombinedReduction, png::combined_reduction),
];

static WEBP_TECHNIQUES: [(Technique, Executor); 3] = [
    (Technique::SizeAdaptiveLossy, webp::size_adaptive_lossy),
    (Technique::ConditionalLossy, webp::conditional_lossy),
    (Technique::PixelAdaptiveLossy, webp::pixel_adaptive_lossy),
];

static TIFF_TECHNIQUES: [(Technique, Executor); 3] = [
    (Technique::LzwCompression, tiff::lzw_compression),
    (Technique::BitDepthReduction, tiff::bit_depth_reduction),
    (Technique::GrayscaleConversion, tiff::grayscale_conversion),
];

impl Strategy {
    pub fn for_format(format: FormatTag) -> Self {
        match format {
            FormatTag::Jpeg => Self::Jpeg,
            FormatTag::Png => Self::Png,
            FormatTag::Webp => Self::Webp,
            FormatTag::Tiff => Self::Tiff,
        }
    }

    pub fn format(&self) -> FormatTag {
        match self {
            Self::Jpeg => FormatTag::Jpeg,
            Self::Png => FormatTag::Png,
            Self::Webp => FormatTag::Webp,
            Self::Tiff => FormatTag::Tiff,
        }
    }

    /// The three techniques with their executors, technique 1 first
    pub fn techniques(&self) -> &'static [(Technique, Executor); 3] {
        match self {
            Self::Jpeg => &JPEG_TECHNIQUES,
            Self::Png => &PNG_TECHNIQUES,
            Self::Webp => &WEBP_TECHNIQUES,
            Self::Tiff => &TIFF_TECHNIQUES,
        }
    }

    pub fn labels(&self) -> [&'static str; 3] {
        self.techniques().map(|(technique, _)| technique.label())
    }
}
