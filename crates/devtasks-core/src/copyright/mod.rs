//! Copyright statement maintenance
//!
//! A copyright statement is the first line of a source file, e.g.
//! `// Copyright © 2019-2024 Acme. All rights reserved.`. The start year comes
//! from the file's first commit, the end year is the current year, and the
//! author is the `AUTHOR` placeholder.

pub mod format;
pub mod git;
pub mod years;

use crate::config::CopyrightSettings;
use crate::error::GeneratorError;
use crate::generator::RenderSession;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use format::{extension_of, format_line, is_supported};
pub use git::GitHistory;
pub use years::{format_range, CopyrightYearRange, VersionControl, YearComputer};

/// Placeholder supplying the copyright holder
pub const AUTHOR_PLACEHOLDER: &str = "AUTHOR";

/// The copyright sentence, without comment delimiters
pub fn sentence(years: &CopyrightYearRange, author: &str) -> String {
    let author = author.trim();
    let author = author.strip_suffix('.').unwrap_or(author);
    format!("Copyright © {} {}. All rights reserved.", years, author)
}

/// What `update_file` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First line already matched
    Unchanged,
    /// An existing copyright line was rewritten
    Replaced,
    /// A new first line was added
    Inserted,
}

/// Generates, updates and checks copyright statements
pub struct CopyrightTool<'a, V> {
    session: &'a mut RenderSession,
    years: &'a YearComputer<V>,
}

impl<'a, V: VersionControl> CopyrightTool<'a, V> {
    pub fn new(session: &'a mut RenderSession, years: &'a YearComputer<V>) -> Self {
        Self { session, years }
    }

    /// The exact first line `path` should have
    pub fn generate_statement(&mut self, path: &Path) -> Result<String, GeneratorError> {
        let extension = extension_of(path).unwrap_or_default();
        if !is_supported(extension) {
            return Err(GeneratorError::UnsupportedExtension {
                extension: extension.to_string(),
            });
        }

        let range = self.years.compute_range(path);
        let author = self.session.get_value(AUTHOR_PLACEHOLDER)?;
        format_line(extension, &sentence(&range, &author.to_string()))
    }

    /// Bring the first line of `path` up to date
    ///
    /// A first line that mentions "copyright" (any case) is replaced; any
    /// other first line is kept and the statement is inserted above it.
    pub fn update_file(&mut self, path: &Path) -> Result<UpdateOutcome> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let expected = self.generate_statement(path)?;
        let (bom, content) = split_bom(&content);
        let (first_line, eol, rest) = split_first_line(content);

        if first_line == expected {
            tracing::debug!(path = %path.display(), "copyright up to date");
            return Ok(UpdateOutcome::Unchanged);
        }

        let (updated, outcome) = if first_line.to_lowercase().contains("copyright") {
            (
                format!("{}{}{}{}", bom, expected, eol, rest),
                UpdateOutcome::Replaced,
            )
        } else {
            let eol = if eol.is_empty() { "\n" } else { eol };
            (
                format!("{}{}{}{}", bom, expected, eol, content),
                UpdateOutcome::Inserted,
            )
        };

        std::fs::write(path, updated)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), ?outcome, "updated copyright");
        Ok(outcome)
    }

    /// Compare the first line of `path` with the expected statement
    ///
    /// With `should_fail`, a mismatch is returned as
    /// [`GeneratorError::CopyrightMismatch`] instead of `Ok(false)`.
    pub fn check_file(&mut self, path: &Path, should_fail: bool) -> Result<bool> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let expected = self.generate_statement(path)?;
        let (_, content) = split_bom(&content);
        let (first_line, _, _) = split_first_line(content);

        if first_line == expected {
            return Ok(true);
        }
        if should_fail {
            return Err(GeneratorError::CopyrightMismatch {
                path: path.to_path_buf(),
                actual: first_line.to_string(),
                expected,
            }
            .into());
        }
        Ok(false)
    }

    /// Update every file in order, stopping at the first error
    ///
    /// Files before the failing one stay updated.
    pub fn update_all(&mut self, files: &[PathBuf]) -> Result<Vec<(PathBuf, UpdateOutcome)>> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let outcome = self.update_file(file)?;
            outcomes.push((file.clone(), outcome));
        }
        Ok(outcomes)
    }

    /// Check every file in order and return the ones with a wrong statement
    pub fn check_all(&mut self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut mismatched = Vec::new();
        for file in files {
            if !self.check_file(file, false)? {
                tracing::info!(path = %file.display(), "copyright mismatch");
                mismatched.push(file.clone());
            }
        }
        Ok(mismatched)
    }
}

const BOM: &str = "\u{FEFF}";

/// Split a leading byte order mark from the text
fn split_bom(content: &str) -> (&str, &str) {
    match content.strip_prefix(BOM) {
        Some(rest) => (BOM, rest),
        None => ("", content),
    }
}

/// Split off the first line: `(line, line ending, remainder)`
///
/// The line excludes its `\n` or `\r\n`; the remainder starts after it.
fn split_first_line(content: &str) -> (&str, &str, &str) {
    match content.find('\n') {
        Some(idx) => {
            let line = &content[..idx];
            let rest = &content[idx + 1..];
            match line.strip_suffix('\r') {
                Some(stripped) => (stripped, "\r\n", rest),
                None => (line, "\n", rest),
            }
        }
        None => (content, "", ""),
    }
}

/// Files under `root` that should carry a copyright statement
///
/// Include entries naming a file are taken as-is (an unsupported extension
/// then fails at update time); directories are walked for files with a known
/// comment syntax. Ignore patterns apply to paths relative to `root`.
pub fn collect_files(root: &Path, settings: &CopyrightSettings) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for include in &settings.include {
        let target = match include.as_str() {
            "." | "" => root.to_path_buf(),
            _ => root.join(include),
        };
        if target.is_file() {
            files.push(target);
            continue;
        }
        if !target.is_dir() {
            anyhow::bail!("Copyright include path not found: {}", target.display());
        }

        let walker = WalkDir::new(&target)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !settings.is_ignored(&relative(root, entry.path()))
            });

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", target.display()))?;
            if entry.file_type().is_file()
                && extension_of(entry.path()).is_some_and(is_supported)
            {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
