//! File-level commands and the binary itself.

mod common;

use std::path::Path;
use std::process::Command;

use image::ImageFormat;
use image_compressor::FormatTag;
use image_compressor::commands::{CompressOptions, compress_file, detect_file};

use common::{encode, engine, flat_palette, gradient};

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[tokio::test]
async fn compress_writes_three_numbered_variants() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_fixture(
        dir.path(),
        "tiles.png",
        &encode(&flat_palette(120, 80, 10), ImageFormat::Png),
    );

    let options = CompressOptions { out_dir: Some(out.clone()), concurrent: false };
    let report = compress_file(&engine(), &input, &options).await.unwrap();

    assert_eq!(report.format, FormatTag::Png);
    let names: Vec<_> = report
        .variants
        .iter()
        .map(|v| v.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "tiles_1_palette-quantization.png",
            "tiles_2_deflate-dither.png",
            "tiles_3_combined-reduction.png",
        ]
    );
    for variant in &report.variants {
        let written = std::fs::read(&variant.path).unwrap();
        assert_eq!(written.len(), variant.size);
        assert_eq!(variant.saved_bytes, report.original_size as i64 - variant.size as i64);
    }
}

#[tokio::test]
async fn concurrent_compress_defaults_to_input_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "photo.jpg",
        &encode(&gradient(200, 100), ImageFormat::Jpeg),
    );

    let options = CompressOptions { out_dir: None, concurrent: true };
    let report = compress_file(&engine(), &input, &options).await.unwrap();

    assert_eq!(report.original_size, std::fs::metadata(&input).unwrap().len());
    for variant in &report.variants {
        assert_eq!(variant.path.parent().unwrap(), dir.path());
        assert!(variant.path.exists());
    }
}

#[test]
fn detect_trusts_signature_over_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "actually-png.jpg",
        &encode(&gradient(8, 8), ImageFormat::Png),
    );
    assert_eq!(detect_file(&input).unwrap(), FormatTag::Png);
}

#[test]
fn policy_subcommand_prints_default_policy() {
    let output = Command::new(env!("CARGO_BIN_EXE_image-compressor"))
        .arg("policy")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["webp"]["passthrough_below"], 200 * 1024);
}

#[test]
fn compress_subcommand_reports_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "scan.tiff",
        &encode(&gradient(40, 30), ImageFormat::Tiff),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_image-compressor"))
        .args(["compress", "--json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["format"], "tiff");
    assert_eq!(json["variants"][2]["label"], "Grayscale Conversion");
    assert!(dir.path().join("scan_3_grayscale-conversion.tif").exists());
}

#[test]
fn compress_subcommand_fails_on_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "notes.png", b"not an image at all");

    let output = Command::new(env!("CARGO_BIN_EXE_image-compressor"))
        .arg("compress")
        .arg(&input)
        .output()
        .unwrap();
    assert!(!output.status.success());
}
