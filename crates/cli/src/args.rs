use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cleansight_util::SettingsOverrides;

#[derive(Debug, Parser)]
#[command(name = "cleansight", version, about = "Submit datasets for data quality analysis and fetch the reports")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Analysis service base URL (overrides CLEANSIGHT_API_BASE and the settings file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request deadline in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory downloaded artifacts are saved to
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            request_timeout_secs: self.timeout,
            download_dir: self.out_dir.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one dataset and print the report
    Analyze(AnalyzeArgs),
    /// Interactive session: pick inputs, submit, view and download
    Session,
    /// Print the resolved settings
    Config,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Save the PDF report after a successful analysis
    #[arg(long)]
    pub download_report: bool,

    /// Save the preprocessed CSV after a successful analysis
    #[arg(long)]
    pub download_preprocessed: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Dataset file to upload (csv, xls, xlsx, json)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Dataset pasted inline (CSV, TSV or JSON)
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Read the dataset text from standard input
    #[arg(long)]
    pub stdin: bool,
}
