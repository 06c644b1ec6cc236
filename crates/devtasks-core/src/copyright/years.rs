//! Copyright year range computation

use anyhow::Result;
use chrono::Datelike;
use std::fmt;
use std::path::Path;

/// Source of first-commit dates
pub trait VersionControl {
    /// Year (as text) in which `path` was first added, or `None` for untracked files
    fn first_commit_year(&self, path: &Path) -> Result<Option<String>>;
}

/// Start and end year of a copyright statement; `start_year <= end_year`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyrightYearRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl fmt::Display for CopyrightYearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_range(self.start_year, self.end_year))
    }
}

/// `2019` for a single year, `2019-2023` for a range
pub fn format_range(start_year: i32, end_year: i32) -> String {
    if start_year == end_year {
        format!("{:04}", start_year)
    } else {
        format!("{:04}-{:04}", start_year, end_year)
    }
}

/// Computes year ranges from version-control history
pub struct YearComputer<V> {
    vcs: V,
    current_year: i32,
}

impl<V: VersionControl> YearComputer<V> {
    /// Use the local clock for the current year
    pub fn new(vcs: V) -> Self {
        Self::with_current_year(vcs, chrono::Local::now().year())
    }

    pub fn with_current_year(vcs: V, current_year: i32) -> Self {
        Self { vcs, current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Year range for `path`
    ///
    /// Falls back to the current year whenever history cannot tell: the file
    /// is untracked, the output is not a year, or the tool itself failed.
    pub fn compute_range(&self, path: &Path) -> CopyrightYearRange {
        let end_year = self.current_year;
        let start_year = match self.vcs.first_commit_year(path) {
            Ok(Some(raw)) => match raw.trim().parse::<i32>() {
                Ok(year) => year.min(end_year),
                Err(_) => {
                    tracing::warn!(path = %path.display(), output = %raw, "unparsable first-commit year");
                    end_year
                }
            },
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no history, using current year");
                end_year
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "history lookup failed, using current year");
                end_year
            }
        };

        CopyrightYearRange {
            start_year,
            end_year,
        }
    }
}
