//! Mediapress CLI - converts media files from the command line.
//!
//! Set FFMPEG_PATH if ffmpeg is not on PATH. TRANSCODE_TIMEOUT_SECS and
//! WORK_DIR tune video transcodes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use mediapress_cli::{format_file_size, init_tracing};
use mediapress_core::models::{
    self, Algorithm, Bitrate, ConversionRequest, ResolutionPreset, UploadedAsset,
    DEFAULT_IMAGE_QUALITY,
};
use mediapress_core::ConverterConfig;
use mediapress_processing::Converter;

#[derive(Parser)]
#[command(name = "mediapress", about = "Media conversion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an audio file (primary -> FLAC, secondary -> WAV)
    Audio {
        /// Path to the file to convert
        file: PathBuf,
        /// Conversion algorithm: primary or secondary
        #[arg(long, default_value = "primary")]
        algorithm: String,
        /// Output path (defaults to the suggested filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert an image file (primary -> JPEG, secondary -> PNG)
    Image {
        /// Path to the file to convert
        file: PathBuf,
        /// Conversion algorithm: primary or secondary
        #[arg(long, default_value = "primary")]
        algorithm: String,
        /// JPEG quality (1-100)
        #[arg(long, default_value_t = DEFAULT_IMAGE_QUALITY)]
        quality: u8,
        /// Output path (defaults to the suggested filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a video file (primary -> H.264 MP4, secondary -> H.265 MP4)
    Video {
        /// Path to the file to convert
        file: PathBuf,
        /// Conversion algorithm: primary or secondary
        #[arg(long, default_value = "primary")]
        algorithm: String,
        /// Output resolution: 480p, 720p, or 1080p
        #[arg(long, default_value = "720p")]
        resolution: String,
        /// Output bitrate: 500k, 1000k, 1500k, or 2000k
        #[arg(long, default_value = "1000k")]
        bitrate: String,
        /// Output path (defaults to the suggested filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ConverterConfig::from_env().context("Invalid configuration")?;
    let converter = Converter::new(&config);

    let (file, request, output) = match cli.command {
        Commands::Audio {
            file,
            algorithm,
            output,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            (file, ConversionRequest::Audio { algorithm }, output)
        }
        Commands::Image {
            file,
            algorithm,
            quality,
            output,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            (file, ConversionRequest::Image { algorithm, quality }, output)
        }
        Commands::Video {
            file,
            algorithm,
            resolution,
            bitrate,
            output,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            let resolution: ResolutionPreset = resolution.parse()?;
            let bitrate: Bitrate = bitrate.parse()?;
            (
                file,
                ConversionRequest::Video {
                    algorithm,
                    resolution,
                    bitrate,
                },
                output,
            )
        }
    };

    let asset = load_asset(&file).await?;
    let input_size = asset.size_bytes();

    let result = match converter.convert(&asset, &request).await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Conversion failed: {}", err.reason());
            std::process::exit(1);
        }
    };

    let output_path = output.unwrap_or_else(|| PathBuf::from(&result.filename));
    tokio::fs::write(&output_path, &result.data)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "{} ({}) -> {} ({})",
        file.display(),
        format_file_size(input_size),
        output_path.display(),
        format_file_size(result.size_bytes()),
    );

    Ok(())
}

async fn load_asset(path: &Path) -> anyhow::Result<UploadedAsset> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(models::content_type_for_extension)
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(UploadedAsset::new(filename, content_type, data))
}
