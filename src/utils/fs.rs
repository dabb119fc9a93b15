use std::path::{Path, PathBuf};
use tokio::fs;
use crate::core::{FormatTag, ImageInput, Technique};
use crate::utils::{EngineError, EngineResult};

/// Reads a file into an [`ImageInput`], recording its on-disk size
pub fn read_input(path: impl AsRef<Path>) -> EngineResult<ImageInput> {
    let path = path.as_ref();
    validate_input_path(path)?;

    let bytes = std::fs::read(path)
        .map_err(|e| EngineError::io(format!("Cannot read {}: {}", path.display(), e)))?;
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(bytes.len() as u64);

    Ok(ImageInput::new(bytes).with_original_size(size).with_source(path))
}

/// Async variant of [`read_input`] for the concurrent path
pub async fn read_input_async(path: impl AsRef<Path>) -> EngineResult<ImageInput> {
    let path = path.as_ref();
    validate_input_path(path)?;

    let bytes = fs::read(path)
        .await
        .map_err(|e| EngineError::io(format!("Cannot read {}: {}", path.display(), e)))?;
    let size = fs::metadata(path)
        .await
        .map(|m| m.len())
        .unwrap_or(bytes.len() as u64);

    Ok(ImageInput::new(bytes).with_original_size(size).with_source(path))
}

/// Validates that the input path exists and is a file
pub fn validate_input_path(path: &Path) -> EngineResult<()> {
    if !path.exists() {
        return Err(EngineError::io(format!("Input file does not exist: {}", path.display())));
    }

    if !path.is_file() {
        return Err(EngineError::io(format!("Input path is not a file: {}", path.display())));
    }

    Ok(())
}

/// Output path for one variant: `<dir>/<stem>_<n>_<slug>.<ext>`
///
/// `index` is 1-based technique order.
pub fn variant_path(
    input_path: &Path,
    out_dir: Option<&Path>,
    index: usize,
    technique: Technique,
    format: FormatTag,
) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input_path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    dir.join(format!(
        "{stem}_{index}_{}.{}",
        technique.slug(),
        format.primary_extension()
    ))
}

/// Writes one variant, creating the parent directory if needed
pub fn write_variant(path: &Path, data: &[u8]) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EngineError::io(format!("Cannot create output directory {}: {}", parent.display(), e))
            })?;
        }
    }

    std::fs::write(path, data)
        .map_err(|e| EngineError::io(format!("Cannot write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_path_defaults_to_input_dir() {
        let path = variant_path(
            Path::new("/photos/road.jpg"),
            None,
            3,
            Technique::CustomCompression,
            FormatTag::Jpeg,
        );
        assert_eq!(path, PathBuf::from("/photos/road_3_custom-compression.jpg"));
    }

    #[test]
    fn variant_path_honours_out_dir() {
        let path = variant_path(
            Path::new("scan.tif"),
            Some(Path::new("out")),
            1,
            Technique::LzwCompression,
            FormatTag::Tiff,
        );
        assert_eq!(path, PathBuf::from("out/scan_1_lzw-compression.tif"));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let err = read_input("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, EngineError::IO(_)));
    }
}
