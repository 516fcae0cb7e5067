use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Packages installed into the environment before the scraper runs.
pub const DEPENDENCIES: [&str; 3] = ["requests", "beautifulsoup4", "pandas"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateEnvironment,
    ActivateEnvironment,
    UpgradeInstaller,
    InstallDependencies,
    RunScraper,
    PreviewOutput,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::CreateEnvironment => "create environment",
            Step::ActivateEnvironment => "activate environment",
            Step::UpgradeInstaller => "upgrade pip",
            Step::InstallDependencies => "install dependencies",
            Step::RunScraper => "run scraper",
            Step::PreviewOutput => "preview output",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single external command: program, arguments, working directory and
/// the variables added on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.into(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, envs: Vec<(String, String)>) -> Self {
        self.envs = envs;
        self
    }

    /// Shell-like rendering for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Shown { lines: Vec<String> },
    Missing,
    Unreadable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub price: f64,
    pub rating: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display_line() {
        let invocation = Invocation::new(".venv/bin/python", ".")
            .args(["-m", "pip", "install", "--upgrade", "pip"]);
        assert_eq!(
            invocation.display_line(),
            ".venv/bin/python -m pip install --upgrade pip"
        );
    }

    #[test]
    fn test_command_status_success() {
        assert!(CommandStatus { code: Some(0) }.success());
        assert!(!CommandStatus { code: Some(2) }.success());
        assert!(!CommandStatus { code: None }.success());
    }
}
