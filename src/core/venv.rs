use crate::utils::error::{Result, RunnerError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Layout of a Python virtual environment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonEnv {
    root: PathBuf,
    bin_dir: PathBuf,
    interpreter: PathBuf,
}

impl PythonEnv {
    pub fn layout(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let (bin_dir, interpreter) = if cfg!(windows) {
            let bin_dir = root.join("Scripts");
            let interpreter = bin_dir.join("python.exe");
            (bin_dir, interpreter)
        } else {
            let bin_dir = root.join("bin");
            let interpreter = bin_dir.join("python");
            (bin_dir, interpreter)
        };

        Self {
            root,
            bin_dir,
            interpreter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Fails unless the environment's own interpreter is present.
    pub fn activate(&self) -> Result<()> {
        if self.interpreter.is_file() {
            Ok(())
        } else {
            Err(RunnerError::EnvironmentNotActivated {
                path: self.interpreter.display().to_string(),
            })
        }
    }

    /// Variables that bind a child process to this environment, the same
    /// two that `activate` scripts export.
    pub fn command_env(&self) -> Result<Vec<(String, String)>> {
        let current = std::env::var_os("PATH").unwrap_or_default();
        let path = self.prepend_path(&current)?;

        Ok(vec![
            (
                "VIRTUAL_ENV".to_string(),
                self.root.to_string_lossy().into_owned(),
            ),
            ("PATH".to_string(), path.to_string_lossy().into_owned()),
        ])
    }

    fn prepend_path(&self, current: &OsString) -> Result<OsString> {
        let dirs = std::iter::once(self.bin_dir.clone()).chain(std::env::split_paths(current));
        std::env::join_paths(dirs).map_err(|e| RunnerError::ConfigError {
            message: format!(
                "cannot add {} to PATH: {}",
                self.bin_dir.display(),
                e
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_unix_layout() {
        let env = PythonEnv::layout("/work/.venv");
        assert_eq!(env.interpreter(), Path::new("/work/.venv/bin/python"));
        assert_eq!(env.root(), Path::new("/work/.venv"));
    }

    #[test]
    fn test_activate_requires_interpreter() {
        let temp_dir = TempDir::new().unwrap();
        let env = PythonEnv::layout(temp_dir.path().join(".venv"));

        let err = env.activate().unwrap_err();
        assert!(matches!(err, RunnerError::EnvironmentNotActivated { .. }));

        std::fs::create_dir_all(env.interpreter().parent().unwrap()).unwrap();
        std::fs::write(env.interpreter(), b"").unwrap();
        assert!(env.activate().is_ok());
    }

    #[test]
    fn test_command_env_prepends_bin_dir() {
        let env = PythonEnv::layout("/work/.venv");
        let vars = env.command_env().unwrap();

        let virtual_env = vars.iter().find(|(k, _)| k == "VIRTUAL_ENV").unwrap();
        assert_eq!(virtual_env.1, "/work/.venv");

        let path = vars.iter().find(|(k, _)| k == "PATH").unwrap();
        let first = std::env::split_paths(&path.1).next().unwrap();
        assert_eq!(first, env.interpreter().parent().unwrap());
    }
}
