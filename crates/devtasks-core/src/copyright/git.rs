//! First-commit dates from `git log`

use super::years::VersionControl;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reads file history with the `git` binary
///
/// The call blocks until git exits; there is no timeout.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo_root: PathBuf,
}

impl GitHistory {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    fn log_args(path: &Path) -> Vec<String> {
        vec![
            "log".to_string(),
            "--follow".to_string(),
            "--diff-filter=A".to_string(),
            "--format=%ad".to_string(),
            "--date=format:%Y".to_string(),
            "--".to_string(),
            path.display().to_string(),
        ]
    }
}

/// Earliest year in `git log` output (newest commits come first)
fn earliest_year(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
}

impl VersionControl for GitHistory {
    fn first_commit_year(&self, path: &Path) -> Result<Option<String>> {
        let path = path.strip_prefix(&self.repo_root).unwrap_or(path);
        tracing::debug!(path = %path.display(), "git log for first commit");

        let output = Command::new("git")
            .args(Self::log_args(path))
            .current_dir(&self.repo_root)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            anyhow::bail!(
                "git log failed for {} (exit code {}): {}",
                path.display(),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(earliest_year(&String::from_utf8_lossy(&output.stdout)))
    }
}
