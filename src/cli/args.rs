use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mask_compositor")]
#[command(about = "Batch-composite color images with grayscale masks into RGBA outputs")]
#[command(version)]
pub struct Cli {
    /// Directory containing the source images (jpg, jpeg, png, tif, tiff)
    pub input_dir: PathBuf,

    /// Directory containing masks named <image base name>.png
    pub mask_dir: PathBuf,

    /// Output directory (created if absent)
    pub output_dir: PathBuf,

    /// Output format: png or tiff (unknown values fall back to png)
    #[arg(short, long, default_value = "png")]
    pub format: String,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// How long to wait for in-flight items after cancellation, in milliseconds
    #[arg(long)]
    pub grace_period_ms: Option<u64>,

    /// Progress polling interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// JSON settings file for worker pool options
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Write a JSON job report to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}
