use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jobscout",
    version,
    about = "Discover and extract job postings from Avature-hosted career sites"
)]
pub struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write the log to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find postings missing from a seed list of known URLs.
    Discover(DiscoverArgs),
    /// Fetch full details for a list of postings, resuming from the ledger.
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Text file with seed URLs; every http(s) token counts.
    #[arg(long, default_value = "Urls.txt")]
    pub seeds: PathBuf,

    #[arg(long, default_value = "discovered_jobs.csv")]
    pub output: PathBuf,

    #[arg(long, default_value = "live_endpoints.csv")]
    pub endpoints_output: PathBuf,

    #[arg(long, default_value = "discovery_stats.txt")]
    pub stats_output: PathBuf,

    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    #[arg(long, default_value_t = 50)]
    pub max_pages: usize,

    #[arg(long, default_value_t = 100)]
    pub probe_delay_ms: u64,

    #[arg(long, default_value_t = 300)]
    pub request_delay_ms: u64,

    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// CSV of postings with at least `title` and `url` columns.
    #[arg(long, default_value = "discovered_jobs.csv")]
    pub input: PathBuf,

    #[arg(long, default_value = "jobs_full_details.csv")]
    pub output_csv: PathBuf,

    #[arg(long, default_value = "jobs_full_details.json")]
    pub output_json: PathBuf,

    #[arg(long, default_value = "extraction_progress.json")]
    pub ledger: PathBuf,

    #[arg(long, default_value = "extraction_stats.txt")]
    pub stats_output: PathBuf,

    /// Jobs processed between ledger saves.
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 2)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = 1000)]
    pub backoff_ms: u64,

    #[arg(long, default_value_t = 300)]
    pub request_delay_ms: u64,

    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
