//! Raw image input.

use std::path::PathBuf;

/// Raw bytes of one image plus what the caller knows about their origin.
///
/// The engine never mutates the bytes. `original_size` feeds the WEBP
/// data-dependent policies; when absent, the byte length is used, since the
/// buffer is the whole file.
#[derive(Debug, Clone)]
pub struct ImageInput {
    bytes: Vec<u8>,
    original_size: Option<u64>,
    source: Option<PathBuf>,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            original_size: None,
            source: None,
        }
    }

    /// Overrides the original file size, e.g. when `bytes` were re-read or trimmed
    pub fn with_original_size(mut self, size: u64) -> Self {
        self.original_size = Some(size);
        self
    }

    /// Records where the bytes were loaded from (used in logs only)
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size the WEBP policy is evaluated against
    pub fn original_size(&self) -> u64 {
        self.original_size.unwrap_or(self.bytes.len() as u64)
    }

    /// Short name for log lines
    pub fn display_name(&self) -> String {
        self.source
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("<{} bytes>", self.bytes.len()))
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
