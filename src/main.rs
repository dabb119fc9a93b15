// Entry point for the image-compressor CLI.
// The library in lib.rs carries the engine; this file only parses arguments,
// sets up logging and prints reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use image_compressor::commands::{CompressOptions, FileReport, compress_file, detect_file};
use image_compressor::{CompressionEngine, CompressionPolicy};

#[derive(Parser, Debug)]
#[command(name = "image-compressor", version, about = "Produce three compressed variants of an image")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress one image with the three techniques of its format
    Compress {
        /// JPEG, PNG, WEBP or TIFF file
        input: PathBuf,

        /// Directory for the variants (default: next to the input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// JSON policy file; missing keys keep their defaults
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Run the three techniques in parallel
        #[arg(long)]
        concurrent: bool,
    },
    /// Print the format detected from the file signature
    Detect { input: PathBuf },
    /// Print the default policy as JSON
    Policy,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("image_compressor={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        // stdout carries the report
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_policy(path: Option<&PathBuf>) -> Result<CompressionPolicy> {
    match path {
        Some(path) => CompressionPolicy::from_json_file(path)
            .with_context(|| format!("loading policy from {}", path.display())),
        None => Ok(CompressionPolicy::default()),
    }
}

fn print_report(report: &FileReport) {
    println!(
        "{} ({}, {}×{}, {} bytes)",
        report.input_path.display(),
        report.format,
        report.source_width,
        report.source_height,
        report.original_size
    );
    for (idx, variant) in report.variants.iter().enumerate() {
        let note = match (variant.passthrough, variant.quality, variant.palette_colors) {
            (true, _, _) => "copied".to_string(),
            (false, Some(q), _) => format!("q{q}"),
            (false, None, Some(colors)) => format!("{colors} colors"),
            (false, None, None) => String::new(),
        };
        println!(
            "  {}. {:<24} {:>10} bytes {:>7.1}%  {}×{}  {}  → {}",
            idx + 1,
            variant.label,
            variant.size,
            variant.compression_ratio,
            variant.width,
            variant.height,
            note,
            variant.path.display()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("{:?}", cli.command);

    match cli.command {
        Command::Compress { input, out_dir, policy, json, concurrent } => {
            let engine = CompressionEngine::new(load_policy(policy.as_ref())?)?;
            let options = CompressOptions { out_dir, concurrent };
            let report = compress_file(&engine, &input, &options)
                .await
                .with_context(|| format!("compressing {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            info!("Done");
        }
        Command::Detect { input } => {
            let format = detect_file(&input)?;
            println!("{format}");
        }
        Command::Policy => {
            println!("{}", CompressionPolicy::default().to_json_pretty()?);
        }
    }

    Ok(())
}
