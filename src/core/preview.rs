use crate::domain::model::PreviewOutcome;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Reads at most `max_lines` lines of `path`.
///
/// The content is opaque: lines are split on `\n` and decoded lossily, with
/// no assumption about delimiter or encoding. Read failures are reported in
/// the outcome, never as an error. Anything that is not a regular file
/// counts as missing.
pub fn preview_file(path: &Path, max_lines: usize) -> PreviewOutcome {
    if !path.is_file() {
        return PreviewOutcome::Missing;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            return PreviewOutcome::Unreadable {
                reason: e.to_string(),
            }
        }
    };

    let mut lines = Vec::new();
    for chunk in BufReader::new(file).split(b'\n').take(max_lines) {
        match chunk {
            Ok(bytes) => {
                let line = String::from_utf8_lossy(&bytes);
                lines.push(line.trim_end_matches('\r').to_string());
            }
            Err(e) if lines.is_empty() => {
                return PreviewOutcome::Unreadable {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("Preview stopped after {} lines: {}", lines.len(), e);
                break;
            }
        }
    }

    PreviewOutcome::Shown { lines }
}

impl PreviewOutcome {
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        file_name: &str,
        max_lines: usize,
        diagnostic_command: &str,
    ) -> io::Result<()> {
        match self {
            PreviewOutcome::Shown { lines } => {
                writeln!(out, "Preview of {} (first {} lines):", file_name, max_lines)?;
                for line in lines {
                    writeln!(out, "{}", line)?;
                }
            }
            PreviewOutcome::Unreadable { .. } => {
                writeln!(out, "Preview of {} (first {} lines):", file_name, max_lines)?;
            }
            PreviewOutcome::Missing => {
                writeln!(
                    out,
                    "{} not found. Try the diagnostic mode: {}",
                    file_name, diagnostic_command
                )?;
            }
        }
        out.flush()
    }
}
