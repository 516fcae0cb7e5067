use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{step}: failed to start '{program}': {source}")]
    SpawnError {
        step: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step}: command exited with {}", describe_code(.code))]
    StepFailed { step: String, code: Option<i32> },

    #[error("Environment interpreter not found at {path}")]
    EnvironmentNotActivated { path: String },

    #[error("HTML parsing error: {message}")]
    ParseError { message: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl RunnerError {
    /// Process exit code for this failure. A failed step forwards the
    /// child's own non-zero status; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::StepFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RunnerError::SpawnError { step, program, .. } => {
                format!("{} could not start '{}'", step, program)
            }
            RunnerError::StepFailed { step, .. } => format!("{} failed", step),
            RunnerError::EnvironmentNotActivated { .. } => {
                "The virtual environment could not be activated".to_string()
            }
            RunnerError::HttpError(_) => "Could not download the book listing".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RunnerError::SpawnError { .. } => {
                "Check that Python 3 is installed and on PATH (or set runner.python)"
            }
            RunnerError::EnvironmentNotActivated { .. } => {
                "Delete the environment directory and run again"
            }
            RunnerError::StepFailed { .. } => "Read the command output above for the cause",
            RunnerError::HttpError(_) => "Check network connectivity and the base URL",
            RunnerError::ConfigError { .. } | RunnerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again"
            }
            RunnerError::ParseError { .. } => "The page layout may have changed",
            _ => "Run again with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
