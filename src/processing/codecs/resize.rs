// src/processing/codecs/resize.rs

use fast_image_resize as fr;
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

/// Half of each dimension, rounded down, never below one pixel.
pub fn halved_dimensions(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// Returns a Lanczos3-resampled copy of `image` at half its width and height.
///
/// The result keeps the source pixel layout. Layouts `fast_image_resize`
/// rejects go through `image::imageops` instead.
pub fn halve(image: &DynamicImage) -> DynamicImage {
    let (width, height) = halved_dimensions(image.width(), image.height());
    debug!(
        "Halving {}×{} → {}×{}",
        image.width(),
        image.height(),
        width,
        height
    );

    match resize_with_fast_image_resize(image, width, height) {
        Ok(resized) => resized,
        Err(err) => {
            warn!("fast_image_resize failed, falling back to resize_exact: {}", err);
            image.resize_exact(width, height, FilterType::Lanczos3)
        }
    }
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<DynamicImage, fr::ResizeError> {
    let mut dst = DynamicImage::new(width, height, image.color());
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));

    fr::Resizer::new().resize(image, &mut dst, &options)?;
    Ok(dst)
}
