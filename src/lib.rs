pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ProcessRunner;
pub use config::{RunnerSettings, ScraperSettings, TomlConfig};
pub use crate::core::{books::BookScraper, orchestrator::Orchestrator};
pub use domain::model::DEPENDENCIES;
pub use utils::error::{Result, RunnerError};
