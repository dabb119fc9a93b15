//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use image_compressor::{CompressionEngine, CompressionPolicy};

pub fn engine() -> CompressionEngine {
    CompressionEngine::new(CompressionPolicy::default()).expect("default policy is valid")
}

/// Encodes `image` with the `image` crate's own encoder for `format`.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).expect("fixture encodes");
    cursor.into_inner()
}

/// Smooth RGB gradient, compresses well in every format
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    }))
}

/// Deterministic noise, compresses badly
pub fn noise(width: u32, height: u32) -> DynamicImage {
    let mut state = 0x2545_F491u32;
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |_, _| {
        let mut channel = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        Rgb([channel(), channel(), channel()])
    }))
}

/// Tiles of exactly `colors` distinct colors
pub fn flat_palette(width: u32, height: u32, colors: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        let i = (x / 16 + y / 16 * 7) % colors;
        Rgb([(i * 6) as u8, (255 - i * 5) as u8, (i * 37 % 256) as u8])
    }))
}

/// RGBA with a transparent left half
pub fn half_transparent(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([200, 60, 20, 255])
        }
    }))
}

pub fn unique_colors(image: &DynamicImage) -> usize {
    let mut colors: Vec<[u8; 4]> = image.to_rgba8().pixels().map(|p| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}
