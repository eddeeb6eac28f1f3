use crate::core::OutputFormat;
use crate::detection::DetectorKind;
use crate::image_source::dog_api::DEFAULT_BASE_URL;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "edge_pipeline")]
#[command(about = "Fetch a batch of images and write their edge maps side by side")]
#[command(version)]
pub struct Cli {
    /// Number of images to request from the image source
    #[arg(short, long, default_value_t = 1)]
    pub limit: usize,

    /// Number of concurrent workers (defaults to min(CPUs x 2, 16))
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Directory the artifacts are written to
    #[arg(short, long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Encoding format for every artifact
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Base URL of the image search API
    #[arg(long, env = "DOG_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// API key sent as the x-api-key header
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// HTTP timeout in seconds for every request
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Cancel the batch after this many seconds
    #[arg(long)]
    pub cancel_after_secs: Option<u64>,

    /// Detector whose output is written as the primary edge map
    #[arg(long, value_enum, default_value_t = DetectorKind::Manual)]
    pub primary: DetectorKind,

    /// Detector used for the side-by-side comparison
    #[arg(long, value_enum, default_value_t = DetectorKind::Library)]
    pub comparison: DetectorKind,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Suppress console progress output
    #[arg(short, long)]
    pub quiet: bool,
}
