use image::DynamicImage;
use tracing::debug;

use crate::core::{ColorMode, FormatTag};
use crate::utils::{EngineError, EngineResult};

/// Decodes `bytes` as `format`, trusting the sniffed signature over any guess.
pub fn decode(bytes: &[u8], format: FormatTag) -> EngineResult<DynamicImage> {
    let image = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| EngineError::decode(format!("Failed to decode {format}: {e}")))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(EngineError::decode(format!("{format} decoded to an empty image")));
    }

    debug!(
        "Decoded {}: {}×{} {:?} ({:?})",
        format,
        image.width(),
        image.height(),
        ColorMode::of(&image),
        image.color()
    );

    Ok(image)
}
