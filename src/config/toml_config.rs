use crate::utils::error::{Result, RunnerError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://books.toscrape.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; BookScraper/1.0)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub runner: RunnerSettings,
    pub scraper: ScraperSettings,
}

/// Where the orchestrator creates the environment, what it runs and which
/// file it previews. All paths are relative to `working_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub working_dir: PathBuf,
    pub python: String,
    pub venv_dir: PathBuf,
    pub scraper_script: PathBuf,
    pub output_file: PathBuf,
    pub preview_lines: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            python: default_python().to_string(),
            venv_dir: PathBuf::from(".venv"),
            scraper_script: PathBuf::from("book_scraper.py"),
            output_file: PathBuf::from("books.csv"),
            preview_lines: 12,
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

impl RunnerSettings {
    pub fn venv_path(&self) -> PathBuf {
        self.working_dir.join(&self.venv_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.working_dir.join(&self.output_file)
    }
}

impl Validate for RunnerSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("runner.python", &self.python)?;
        validate_path("runner.working_dir", &self.working_dir.to_string_lossy())?;
        validate_path("runner.venv_dir", &self.venv_dir.to_string_lossy())?;
        validate_path("runner.scraper_script", &self.scraper_script.to_string_lossy())?;
        validate_path("runner.output_file", &self.output_file.to_string_lossy())?;
        validate_range("runner.preview_lines", self.preview_lines, 1, 10_000)?;
        Ok(())
    }
}

/// Settings of the native scraper (`bookrun scrape`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Pause before following a "next" link.
    pub delay_ms: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            delay_ms: 1000,
        }
    }
}

impl Validate for ScraperSettings {
    fn validate(&self) -> Result<()> {
        validate_url("scraper.base_url", &self.base_url)?;
        validate_non_empty_string("scraper.user_agent", &self.user_agent)?;
        validate_range("scraper.timeout_seconds", self.timeout_seconds, 1, 600)?;
        Ok(())
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RunnerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// 同上，但變數值由 `lookup` 提供
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_env_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| RunnerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})；未設定的變數保持原樣
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RunnerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}
