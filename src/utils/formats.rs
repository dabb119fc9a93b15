use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::EngineError;

/// Closed set of container formats the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Jpeg,
    Png,
    Webp,
    Tiff,
}

impl FormatTag {
    pub const ALL: [FormatTag; 4] = [Self::Jpeg, Self::Png, Self::Webp, Self::Tiff];

    /// Stable lowercase name, used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
        }
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Webp => &["webp"],
            Self::Tiff => &["tif", "tiff"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &str {
        self.extensions()[0]
    }

    /// The `image` crate format used to decode this container
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for FormatTag {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == name || format.matches_extension(&name))
            .ok_or_else(|| EngineError::unsupported(format!("Unsupported image format: {}", name)))
    }
}

/// Get the format a path's extension claims, if any.
///
/// Never used for detection; the CLI only uses it to warn when a file's
/// extension disagrees with its signature.
pub fn format_from_extension(path: &std::path::Path) -> Option<FormatTag> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| FormatTag::from_str(ext).ok())
}
