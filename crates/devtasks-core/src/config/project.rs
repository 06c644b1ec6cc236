//! Project config types (devtasks.yaml)

use crate::labels::LabelSpec;
use serde::{Deserialize, Serialize};

/// File name of the project config, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "devtasks.yaml";

/// Root project config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Path to package.json, relative to the project root
    #[serde(default = "default_package")]
    pub package: String,

    /// Templates rendered by `generate`
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,

    /// Copyright statement maintenance
    #[serde(default)]
    pub copyright: CopyrightSettings,

    /// GitHub label synchronization
    #[serde(default)]
    pub labels: LabelSettings,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            templates: Vec::new(),
            copyright: CopyrightSettings::default(),
            labels: LabelSettings::default(),
        }
    }
}

fn default_package() -> String {
    "package.json".to_string()
}

/// A template and the file it renders to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Template path relative to the project root
    pub source: String,

    /// Output path relative to the project root
    pub dest: String,

    /// Fail when the template references a placeholder with no schema entry
    #[serde(default = "default_true")]
    pub strict: bool,
}

fn default_true() -> bool {
    true
}

/// Which files carry copyright statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyrightSettings {
    /// Files or directories to scan, relative to the project root
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Patterns excluded from the scan
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for CopyrightSettings {
    fn default() -> Self {
        Self {
            include: default_include(),
            ignore: default_ignore(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![".".to_string()]
}

fn default_ignore() -> Vec<String> {
    ["node_modules", ".git", "dist", "target", "coverage", "*.min.js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl CopyrightSettings {
    /// Check a path (relative to the project root, `/`-separated) against the
    /// ignore patterns
    ///
    /// A pattern matches when any path segment matches it: `*suffix` is a
    /// suffix match, `prefix*` a prefix match, anything else exact. Patterns
    /// containing `/` are compared against the whole relative path instead.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.ignore.iter().any(|pattern| {
            if pattern.contains('/') {
                let pattern = pattern.trim_end_matches('/');
                relative_path == pattern || relative_path.starts_with(&format!("{}/", pattern))
            } else {
                relative_path
                    .split('/')
                    .any(|segment| matches_pattern(segment, pattern))
            }
        })
    }
}

fn matches_pattern(name: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        // Suffix match: *.min.js matches app.min.js
        name.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        // Prefix match: vendor* matches vendor-lib
        name.starts_with(prefix)
    } else {
        name == pattern
    }
}

/// GitHub label synchronization settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Target repository as `owner/name`; defaults to the package repository
    #[serde(default)]
    pub repo: Option<String>,

    /// YAML file with additional labels, relative to the project root
    #[serde(default)]
    pub file: Option<String>,

    /// Labels declared inline
    #[serde(default)]
    pub labels: Vec<LabelSpec>,

    /// Delete repository labels that are not declared
    #[serde(default)]
    pub delete_unknown: bool,

    /// GitHub API base URL (for GitHub Enterprise)
    #[serde(default)]
    pub api_url: Option<String>,
}
