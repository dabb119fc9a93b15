// src/processing/codecs/quantize.rs

//! Palette reduction.
//!
//! Two palette builders are available, selected by [`PaletteMethod`]:
//!
//! - [`PaletteMethod::Adaptive`]: NeuQuant (`color_quant`), a palette that
//!   follows the perceptual spread of the image.
//! - [`PaletteMethod::MaxCoverage`]: median cut that always splits the most
//!   populated box, so the commonest colors get their own entries.
//!
//! Pixels are then mapped to the nearest entry, optionally with
//! Floyd–Steinberg error diffusion on the color channels.

use std::collections::HashMap;

use color_quant::NeuQuant;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::core::PaletteMethod;

// NeuQuant sampling factor: 1 = every pixel, 30 = fastest
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

/// An 8-bit palette image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA entries, at most 256
    pub palette: Vec<[u8; 4]>,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
}

impl IndexedImage {
    /// `true` when a pixel actually maps to a non-opaque entry
    pub fn has_transparency(&self) -> bool {
        let mut used = [false; 256];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        self.palette
            .iter()
            .zip(used)
            .any(|(c, used)| used && c[3] < u8::MAX)
    }

    /// Expands the palette back into a truecolor buffer.
    pub fn to_rgba(&self) -> RgbaImage {
        let data = self
            .indices
            .iter()
            .flat_map(|&i| self.palette[i as usize])
            .collect();
        RgbaImage::from_raw(self.width, self.height, data)
            .expect("one palette index per pixel")
    }
}

/// Reduces `image` to at most `max_colors` colors.
///
/// When the image already has no more than `max_colors` distinct colors its
/// own colors become the palette and no dithering is applied.
pub fn quantize(
    image: &DynamicImage,
    max_colors: usize,
    method: PaletteMethod,
    dither: bool,
) -> IndexedImage {
    let max_colors = max_colors.clamp(1, 256);
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let histogram = histogram(&rgba);

    if histogram.len() <= max_colors {
        debug!("Image has {} colors, using them as the palette", histogram.len());
        let palette: Vec<[u8; 4]> = histogram.iter().map(|(c, _)| *c).collect();
        let lookup: HashMap<[u8; 4], u8> = palette
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i as u8))
            .collect();
        let indices = rgba.pixels().map(|p| lookup[&p.0]).collect();
        return IndexedImage { width, height, palette, indices };
    }

    let mut palette = match method {
        PaletteMethod::Adaptive => neuquant_palette(rgba.as_raw(), max_colors),
        PaletteMethod::MaxCoverage => max_coverage_palette(histogram, max_colors),
    };
    // NeuQuant can drift alpha on opaque sources
    if !image.color().has_alpha() {
        for entry in &mut palette {
            entry[3] = u8::MAX;
        }
    }
    debug!(
        "Built {}-entry {:?} palette{}",
        palette.len(),
        method,
        if dither { " with dithering" } else { "" }
    );

    let indices = if dither {
        map_dithered(&rgba, &palette)
    } else {
        map_nearest(&rgba, &palette)
    };

    IndexedImage { width, height, palette, indices }
}

/// Distinct colors with their pixel counts, sorted by color.
fn histogram(rgba: &RgbaImage) -> Vec<([u8; 4], u32)> {
    let mut counts: HashMap<[u8; 4], u32> = HashMap::new();
    for pixel in rgba.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }
    let mut colors: Vec<_> = counts.into_iter().collect();
    colors.sort_unstable_by_key(|(c, _)| *c);
    colors
}

// ── Palette builders ───────────────────────────────────────────────────────────────────

fn neuquant_palette(pixels: &[u8], max_colors: usize) -> Vec<[u8; 4]> {
    let nq = NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, max_colors, pixels);
    nq.color_map_rgba()
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect()
}

struct ColorBox {
    colors: Vec<([u8; 4], u32)>,
    population: u64,
}

impl ColorBox {
    fn new(colors: Vec<([u8; 4], u32)>) -> Self {
        let population = colors.iter().map(|(_, n)| *n as u64).sum();
        Self { colors, population }
    }

    fn can_split(&self) -> bool {
        self.colors.len() > 1
    }

    fn widest_channel(&self) -> usize {
        (0..4)
            .max_by_key(|&ch| {
                let (lo, hi) = self
                    .colors
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| (lo.min(c[ch]), hi.max(c[ch])));
                hi.saturating_sub(lo)
            })
            .unwrap_or(0)
    }

    /// Splits at the population median along the widest channel. Both halves
    /// are non-empty.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();
        self.colors.sort_by_key(|(c, _)| c[channel]);

        let half = self.population / 2;
        let mut acc = 0u64;
        let mut split_at = 0;
        for (i, (_, n)) in self.colors.iter().enumerate() {
            acc += *n as u64;
            if acc >= half {
                split_at = i;
                break;
            }
        }
        let split_at = split_at.min(self.colors.len() - 2);

        let right = self.colors.split_off(split_at + 1);
        (ColorBox::new(self.colors), ColorBox::new(right))
    }

    /// Population-weighted mean color, rounded.
    fn average(&self) -> [u8; 4] {
        let mut sums = [0u64; 4];
        for (c, n) in &self.colors {
            for ch in 0..4 {
                sums[ch] += c[ch] as u64 * *n as u64;
            }
        }
        let total = self.population.max(1);
        sums.map(|s| ((s + total / 2) / total) as u8)
    }
}

fn max_coverage_palette(colors: Vec<([u8; 4], u32)>, max_colors: usize) -> Vec<[u8; 4]> {
    let mut boxes = vec![ColorBox::new(colors)];

    while boxes.len() < max_colors {
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .max_by_key(|(_, b)| b.population)
            .map(|(i, _)| i)
        else {
            break;
        };
        let (left, right) = boxes.swap_remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    boxes.iter().map(ColorBox::average).collect()
}

// ── Pixel mapping ──────────────────────────────────────────────────────────────────────

fn nearest_index(color: [u8; 4], palette: &[[u8; 4]]) -> u8 {
    let distance = |p: &[u8; 4]| -> u32 {
        (0..4)
            .map(|ch| {
                let d = color[ch] as i32 - p[ch] as i32;
                (d * d) as u32
            })
            .sum()
    };
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| distance(p))
        .map_or(0, |(i, _)| i as u8)
}

fn map_nearest(rgba: &RgbaImage, palette: &[[u8; 4]]) -> Vec<u8> {
    let mut cache: HashMap<[u8; 4], u8> = HashMap::new();
    rgba.pixels()
        .map(|p| *cache.entry(p.0).or_insert_with(|| nearest_index(p.0, palette)))
        .collect()
}

/// Floyd–Steinberg on RGB; alpha is matched as-is.
fn map_dithered(rgba: &RgbaImage, palette: &[[u8; 4]]) -> Vec<u8> {
    let width = rgba.width() as usize;
    let mut indices = Vec::with_capacity(rgba.as_raw().len() / 4);
    let mut cache: HashMap<[u8; 4], u8> = HashMap::new();

    // One padding cell on each side
    let mut current = vec![[0f32; 3]; width + 2];
    let mut next = vec![[0f32; 3]; width + 2];

    for row in rgba.rows() {
        for (x, pixel) in row.enumerate() {
            let [r, g, b, a] = pixel.0;
            let err = current[x + 1];
            let adjusted = [
                (r as f32 + err[0]).clamp(0.0, 255.0).round() as u8,
                (g as f32 + err[1]).clamp(0.0, 255.0).round() as u8,
                (b as f32 + err[2]).clamp(0.0, 255.0).round() as u8,
                a,
            ];

            let idx = *cache
                .entry(adjusted)
                .or_insert_with(|| nearest_index(adjusted, palette));
            indices.push(idx);

            let chosen = palette[idx as usize];
            for ch in 0..3 {
                let e = adjusted[ch] as f32 - chosen[ch] as f32;
                //       * 7
                //   3 5 1
                current[x + 2][ch] += e * 7.0 / 16.0;
                next[x][ch] += e * 3.0 / 16.0;
                next[x + 1][ch] += e * 5.0 / 16.0;
                next[x + 2][ch] += e * 1.0 / 16.0;
            }
        }
        std::mem::swap(&mut current, &mut next);
        next.fill([0.0; 3]);
    }

    indices
}
