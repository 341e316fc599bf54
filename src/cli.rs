use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a subtitle file or a directory of subtitle files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target translation language
    #[arg(short, long, default_value = "ru")]
    pub lang: String,

    /// Number of parallel workers (bounds in-flight translation calls)
    #[arg(short, long, default_value_t = 5)]
    pub workers: usize,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the translation service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Worker count with a floor of one.
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}
