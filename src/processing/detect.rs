//! Signature sniffing.
//!
//! Classifies raw bytes by their leading magic numbers only. File names and
//! caller-supplied labels are never consulted.

use tracing::debug;

use crate::core::FormatTag;
use crate::utils::{EngineError, EngineResult};

type Matcher = fn(&[u8]) -> bool;

const MATCHERS: [(FormatTag, Matcher); 4] = [
    (FormatTag::Jpeg, infer::image::is_jpeg),
    (FormatTag::Png, infer::image::is_png),
    (FormatTag::Webp, is_riff_webp),
    (FormatTag::Tiff, infer::image::is_tiff),
];

/// `infer` only checks the `WEBP` fourcc; also require the RIFF header.
fn is_riff_webp(bytes: &[u8]) -> bool {
    bytes.starts_with(b"RIFF") && infer::image::is_webp(bytes)
}

/// Returns the format whose canonical signature `bytes` carry.
///
/// Fails with [`EngineError::UnsupportedFormat`] for anything else, including
/// other image formats such as GIF or BMP.
pub fn detect(bytes: &[u8]) -> EngineResult<FormatTag> {
    if bytes.is_empty() {
        return Err(EngineError::unsupported("input is empty"));
    }

    if let Some((format, _)) = MATCHERS.iter().find(|(_, matches)| matches(bytes)) {
        debug!("Detected {} signature", format);
        return Ok(*format);
    }

    let reason = match infer::get(bytes) {
        Some(kind) => format!("{} is not one of JPEG, PNG, WEBP, TIFF", kind.mime_type()),
        None => "unrecognized signature".to_string(),
    };
    Err(EngineError::unsupported(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    const WEBP: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
    const TIFF_LE: &[u8] = b"II\x2A\x00\x08\x00\x00\x00\x00\x00\x00\x00";
    const TIFF_BE: &[u8] = b"MM\x00\x2A\x00\x00\x00\x08\x00\x00\x00\x00";

    #[test]
    fn recognizes_each_signature() {
        assert_eq!(detect(JPEG).unwrap(), FormatTag::Jpeg);
        assert_eq!(detect(PNG).unwrap(), FormatTag::Png);
        assert_eq!(detect(WEBP).unwrap(), FormatTag::Webp);
        assert_eq!(detect(TIFF_LE).unwrap(), FormatTag::Tiff);
        assert_eq!(detect(TIFF_BE).unwrap(), FormatTag::Tiff);
    }

    #[test]
    fn rejects_text() {
        let err = detect(b"hello, this is a text file\n").unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_other_image_formats() {
        let err = detect(b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap_err();
        assert!(err.to_string().contains("image/gif"));
    }

    #[test]
    fn rejects_empty_and_truncated_input() {
        assert!(detect(&[]).is_err());
        assert!(detect(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn webp_fourcc_without_riff_is_rejected() {
        assert!(detect(b"XXXX\x24\x00\x00\x00WEBPVP8 ").is_err());
    }

    proptest! {
        #[test]
        fn anything_after_a_png_signature_is_png(tail in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut bytes = PNG[..8].to_vec();
            bytes.extend(tail);
            prop_assert_eq!(detect(&bytes).unwrap(), FormatTag::Png);
        }

        #[test]
        fn plain_text_is_never_an_image(text in "[a-zA-Z0-9 ,.\n]{0,80}") {
            prop_assert!(detect(text.as_bytes()).is_err());
        }
    }
}
