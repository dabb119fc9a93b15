// src/processing/techniques/webp.rs

//! WEBP techniques. All three read the original file size or pixel count, so
//! the same picture can take different paths depending on how it was stored.

use crate::core::TechniqueOutput;
use crate::processing::codecs::CodecResult;
use crate::processing::codecs::formats::encode_webp;

use super::TechniqueContext;

pub fn size_adaptive_lossy(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let quality = ctx.policy.webp.size_adaptive_quality(ctx.input.original_size());
    let data = encode_webp(ctx.image, quality)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_quality(quality))
}

/// Small files are returned untouched; large ones get a moderate lossy encode.
pub fn conditional_lossy(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let policy = &ctx.policy.webp;
    if policy.is_passthrough(ctx.input.original_size()) {
        return Ok(TechniqueOutput::passthrough(ctx.input.bytes().to_vec(), ctx.image));
    }

    let data = encode_webp(ctx.image, policy.moderate_quality)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_quality(policy.moderate_quality))
}

pub fn pixel_adaptive_lossy(ctx: &TechniqueContext<'_>) -> CodecResult<TechniqueOutput> {
    let quality = ctx
        .policy
        .webp
        .pixel_adaptive_quality(ctx.image.width(), ctx.image.height());
    let data = encode_webp(ctx.image, quality)?;
    Ok(TechniqueOutput::encoded(data, ctx.image).with_quality(quality))
}
