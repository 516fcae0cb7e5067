use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bookrun")]
#[command(about = "Set up a Python environment, run the book scraper and preview its output")]
pub struct CliConfig {
    /// Optional TOML file overriding the default layout
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the environment, install dependencies, run the scraper (default)
    Run,
    /// Scrape books.toscrape.com natively, without Python
    Scrape(ScrapeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    /// Print books from the first page without saving
    #[arg(long)]
    pub test: bool,

    /// Number of books to print in test mode
    #[arg(long, default_value = "10")]
    pub test_count: usize,

    /// Output CSV filename
    #[arg(long, default_value = "books.csv")]
    pub output: PathBuf,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Delay between page requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl CliConfig {
    /// Loads the TOML file if one was given, otherwise the defaults, and
    /// applies the scrape overrides from the command line.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(Command::Scrape(args)) = &self.command {
            if let Some(base_url) = &args.base_url {
                config.scraper.base_url = base_url.clone();
            }
            if let Some(delay_ms) = args.delay_ms {
                config.scraper.delay_ms = delay_ms;
            }
        }

        Ok(config)
    }
}
