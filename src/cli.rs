use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::QaLevel;

#[derive(Parser, Debug)]
#[command(
    name = "retrofit-compare",
    version,
    about = "Compare pre- and post-retrofit energy survey reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Compare(CompareArgs),
    Extract(ExtractArgs),
    Show(ShowArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long, default_value = ".cache/retrofit-compare")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Survey taken before the retrofit (.pdf or .txt).
    #[arg(long)]
    pub pre: PathBuf,

    /// Survey taken after the retrofit (.pdf or .txt).
    #[arg(long)]
    pub post: PathBuf,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub uprn: Option<String>,

    #[arg(long)]
    pub pre_date: Option<String>,

    #[arg(long)]
    pub post_date: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_store: bool,

    /// Skip text extraction and report empty records.
    #[arg(long, env = "RETROFIT_SAFE_MODE", default_value_t = false)]
    pub safe_mode: bool,

    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FailOn {
    Never,
    Error,
    Warning,
}

impl FailOn {
    pub fn threshold(self) -> Option<QaLevel> {
        match self {
            Self::Never => None,
            Self::Error => Some(QaLevel::Error),
            Self::Warning => Some(QaLevel::Warning),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub process_date: Option<String>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long, default_value = ".cache/retrofit-compare")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub report_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/retrofit-compare")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
