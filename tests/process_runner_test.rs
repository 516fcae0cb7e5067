#![cfg(unix)]

use bookrun::core::PreviewOutcome;
use bookrun::{Orchestrator, ProcessRunner, RunnerError, RunnerSettings};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

/// Minimal stand-in for `python3`: handles `-m venv`, `-m pip` and the
/// scraper script. Copies itself into the new environment so the later
/// steps run the environment's "interpreter".
const PYTHON_STUB: &str = r#"#!/bin/sh
set -e
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$0" "$3/bin/python"
  chmod +x "$3/bin/python"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  shift 2
  echo "$* | $VIRTUAL_ENV" >> pip.log
  exit 0
fi
if [ "$1" = "book_scraper.py" ]; then
  [ $# -eq 1 ] || exit 9
  [ -f fail_scraper ] && exit 5
  printf 'title,price,rating\n' > books.csv
  i=1
  while [ $i -le 20 ]; do
    printf 'Book %s,%s.00,3\n' $i $i >> books.csv
    i=$((i+1))
  done
  exit 0
fi
exit 64
"#;

fn install_stub(dir: &Path) -> String {
    let path = dir.join("python-stub");
    std::fs::write(&path, PYTHON_STUB).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

// Kept as a single test so no other thread forks while the stub is being
// written (ETXTBSY).
#[tokio::test]
async fn test_end_to_end_with_stub_interpreter() {
    let dir = TempDir::new().unwrap();
    let python = install_stub(dir.path());
    let settings = RunnerSettings {
        working_dir: dir.path().to_path_buf(),
        python,
        ..RunnerSettings::default()
    };

    // Successful run: preview of the first 12 lines.
    let orchestrator = Orchestrator::new(ProcessRunner::new(), settings.clone());
    let mut out = Vec::new();
    let report = orchestrator.run(&mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "Preview of books.csv (first 12 lines):");
    assert_eq!(lines[12], "Book 11,11.00,3");
    assert!(matches!(report.preview, PreviewOutcome::Shown { .. }));

    let venv = dir.path().join(".venv");
    assert!(venv.join("bin/python").is_file());
    let pip_log = std::fs::read_to_string(dir.path().join("pip.log")).unwrap();
    let expected = format!(
        "install --upgrade pip | {venv}\ninstall requests beautifulsoup4 pandas | {venv}\n",
        venv = venv.display()
    );
    assert_eq!(pip_log, expected);

    // Failing scraper: its exit code is forwarded and nothing is previewed.
    std::fs::write(dir.path().join("fail_scraper"), b"").unwrap();
    let orchestrator = Orchestrator::new(ProcessRunner::new(), settings.clone());
    let mut out = Vec::new();
    let err = orchestrator.run(&mut out).await.unwrap_err();

    assert!(matches!(err, RunnerError::StepFailed { code: Some(5), .. }));
    assert_eq!(err.exit_code(), 5);
    assert!(out.is_empty());

    // Missing interpreter: creation cannot even start.
    let settings = RunnerSettings {
        python: dir.path().join("no-such-python").to_string_lossy().into_owned(),
        ..settings
    };
    let orchestrator = Orchestrator::new(ProcessRunner::new(), settings);
    let err = orchestrator.run(&mut std::io::sink()).await.unwrap_err();

    assert!(matches!(err, RunnerError::SpawnError { ref step, .. } if step == "create environment"));
    assert_ne!(err.exit_code(), 0);
}
