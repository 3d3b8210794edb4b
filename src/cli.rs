use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::{DEFAULT_FUZZY_THRESHOLD, DEFAULT_LENGTH_TOLERANCE, DEFAULT_MIN_FUZZY_CHARS};

#[derive(Parser, Debug)]
#[command(
    name = "themecode",
    version,
    about = "Tag interview answers with LLM-proposed theme codes for MAXQDA import"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Merge(MergeArgs),
    Tag(TagArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    pub inputs: Vec<PathBuf>,

    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TagArgs {
    #[arg(long)]
    pub analysis_path: PathBuf,

    #[arg(long)]
    pub interviews_path: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub respondent_id_column: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub fuzzy_threshold: u8,

    #[arg(long, default_value_t = DEFAULT_MIN_FUZZY_CHARS)]
    pub min_fuzzy_chars: usize,

    #[arg(long, default_value_t = DEFAULT_LENGTH_TOLERANCE)]
    pub length_tolerance: f64,

    #[arg(long)]
    pub debug_respondent: Option<String>,

    #[arg(long)]
    pub debug_question: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub manifest_path: PathBuf,
}
