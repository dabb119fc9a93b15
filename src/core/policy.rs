//! Per-format compression policy.
//!
//! Every threshold and quality level the techniques use lives here. A policy is
//! built once (defaults, or a JSON file overriding some fields), validated when
//! the engine is constructed, and then only read.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::{EngineError, EngineResult};

/// Chroma sampling ratio for JPEG encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaSubsampling {
    /// Full chroma resolution
    #[serde(rename = "4:4:4")]
    Yuv444,
    /// Chroma halved horizontally
    #[serde(rename = "4:2:2")]
    Yuv422,
    /// Chroma halved in both directions
    #[serde(rename = "4:2:0")]
    Yuv420,
}

/// How a reduced palette is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteMethod {
    /// NeuQuant neural-network palette fitted to the image
    Adaptive,
    /// Median cut, always splitting the most populated color box
    MaxCoverage,
}

/// Entropy coding for TIFF strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    Uncompressed,
    Lzw,
}

/// JPEG techniques: progressive, chroma-subsampled, downsample + subsample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegPolicy {
    pub progressive_quality: u8,
    pub progressive_subsampling: ChromaSubsampling,
    pub subsampled_quality: u8,
    pub subsampled_subsampling: ChromaSubsampling,
    /// Build per-image Huffman tables for the subsampled encode
    pub optimize_huffman: bool,
    pub downsample_quality: u8,
    pub downsample_subsampling: ChromaSubsampling,
    /// Halve when width exceeds this
    pub downsample_max_width: u32,
    /// Halve when height exceeds this
    pub downsample_max_height: u32,
}

impl Default for JpegPolicy {
    fn default() -> Self {
        Self {
            progressive_quality: 85,
            progressive_subsampling: ChromaSubsampling::Yuv444,
            subsampled_quality: 70,
            subsampled_subsampling: ChromaSubsampling::Yuv422,
            optimize_huffman: true,
            downsample_quality: 75,
            downsample_subsampling: ChromaSubsampling::Yuv420,
            downsample_max_width: 1920,
            downsample_max_height: 1080,
        }
    }
}

impl JpegPolicy {
    /// Either dimension strictly over its threshold
    pub fn needs_downsample(&self, width: u32, height: u32) -> bool {
        width > self.downsample_max_width || height > self.downsample_max_height
    }
}

/// PNG techniques: palette quantization, max deflate, combined reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PngPolicy {
    pub palette_colors: usize,
    pub palette_method: PaletteMethod,
    /// Floyd–Steinberg error diffusion when remapping to the palette
    pub palette_dither: bool,
    /// Try every row filter and keep the smallest ("optimize")
    pub adaptive_filter: bool,
    pub combined_colors: usize,
    pub combined_method: PaletteMethod,
    pub combined_dither: bool,
    /// Halve when width×height exceeds this
    pub combined_max_pixels: u64,
}

impl Default for PngPolicy {
    fn default() -> Self {
        Self {
            palette_colors: 64,
            palette_method: PaletteMethod::Adaptive,
            palette_dither: true,
            adaptive_filter: true,
            combined_colors: 32,
            combined_method: PaletteMethod::MaxCoverage,
            combined_dither: false,
            combined_max_pixels: 1024 * 1024,
        }
    }
}

impl PngPolicy {
    pub fn needs_downsample(&self, width: u32, height: u32) -> bool {
        pixel_count(width, height) > self.combined_max_pixels
    }
}

/// WEBP techniques, driven by the original file size and pixel count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebpPolicy {
    /// Files strictly larger than this get `large_file_quality`
    pub large_file_threshold: u64,
    pub large_file_quality: u8,
    pub small_file_quality: u8,
    /// Files strictly smaller than this are copied verbatim
    pub passthrough_below: u64,
    pub moderate_quality: u8,
    /// Images with strictly more pixels get `large_image_quality`
    pub large_image_pixels: u64,
    pub large_image_quality: u8,
    pub small_image_quality: u8,
}

impl Default for WebpPolicy {
    fn default() -> Self {
        Self {
            large_file_threshold: 100 * 1024,
            large_file_quality: 50,
            small_file_quality: 80,
            passthrough_below: 200 * 1024,
            moderate_quality: 70,
            large_image_pixels: 500 * 500,
            large_image_quality: 80,
            small_image_quality: 90,
        }
    }
}

impl WebpPolicy {
    pub fn size_adaptive_quality(&self, original_size: u64) -> u8 {
        if original_size > self.large_file_threshold {
            self.large_file_quality
        } else {
            self.small_file_quality
        }
    }

    pub fn is_passthrough(&self, original_size: u64) -> bool {
        original_size < self.passthrough_below
    }

    pub fn pixel_adaptive_quality(&self, width: u32, height: u32) -> u8 {
        if pixel_count(width, height) > self.large_image_pixels {
            self.large_image_quality
        } else {
            self.small_image_quality
        }
    }
}

/// TIFF techniques: LZW, palette reduction, grayscale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiffPolicy {
    pub palette_colors: usize,
    pub palette_method: PaletteMethod,
    pub palette_compression: TiffCompression,
    pub grayscale_compression: TiffCompression,
}

impl Default for TiffPolicy {
    fn default() -> Self {
        Self {
            palette_colors: 256,
            palette_method: PaletteMethod::Adaptive,
            palette_compression: TiffCompression::Lzw,
            grayscale_compression: TiffCompression::Uncompressed,
        }
    }
}

/// All four format policies.
///
/// Missing keys in a policy file fall back to the defaults above, so
/// `{"webp": {"moderate_quality": 60}}` changes exactly one knob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionPolicy {
    pub jpeg: JpegPolicy,
    pub png: PngPolicy,
    pub webp: WebpPolicy,
    pub tiff: TiffPolicy,
}

impl CompressionPolicy {
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("Cannot read policy file {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn pixel_count(width: u32, height: u32) -> u64 {
    width as u64 * height as u64
}
