//! GitHub label synchronization
//!
//! Declared labels come from `devtasks.yaml` (inline and/or a separate YAML
//! file). `plan` diffs them against the labels a repository already has, and
//! `GithubLabels::apply` carries the plan out one request at a time.

pub mod github;

use crate::config::LoadedProject;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use github::{GithubLabels, DEFAULT_API_URL};

/// A label as declared in config or returned by the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub name: String,
    #[serde(deserialize_with = "color_string")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelSpec {
    /// Color without `#`, lower-case
    pub fn normalized_color(&self) -> String {
        self.color.trim().trim_start_matches('#').to_ascii_lowercase()
    }

    fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    fn same_as(&self, other: &LabelSpec) -> bool {
        self.name == other.name
            && self.normalized_color() == other.normalized_color()
            && self.description_text() == other.description_text()
    }
}

/// Accept unquoted all-digit colors such as `000000`, which YAML reads as integers
fn color_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Color {
        Text(String),
        Digits(u64),
    }

    Ok(match Color::deserialize(deserializer)? {
        Color::Text(text) => text,
        Color::Digits(digits) => format!("{:06}", digits),
    })
}

/// Change to an existing label (possibly a case-only rename)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    /// Name of the label as it exists in the repository
    pub current_name: String,
    pub label: LabelSpec,
}

/// Requests needed to make a repository's labels match the declared set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlan {
    pub create: Vec<LabelSpec>,
    pub update: Vec<LabelUpdate>,
    pub delete: Vec<String>,
}

impl LabelPlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    /// One human-readable line per change
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for label in &self.create {
            lines.push(format!("create {} (#{})", label.name, label.normalized_color()));
        }
        for update in &self.update {
            lines.push(format!(
                "update {} (#{})",
                update.current_name,
                update.label.normalized_color()
            ));
        }
        for name in &self.delete {
            lines.push(format!("delete {}", name));
        }
        lines
    }
}

/// Diff declared labels against existing ones
///
/// Names match case-insensitively. Existing labels with no declaration are
/// deleted only when `delete_unknown` is set.
pub fn plan(desired: &[LabelSpec], existing: &[LabelSpec], delete_unknown: bool) -> LabelPlan {
    let mut result = LabelPlan::default();

    for label in desired {
        match existing
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&label.name))
        {
            None => result.create.push(label.clone()),
            Some(current) if !current.same_as(label) => result.update.push(LabelUpdate {
                current_name: current.name.clone(),
                label: label.clone(),
            }),
            Some(_) => {}
        }
    }

    if delete_unknown {
        result.delete = existing
            .iter()
            .filter(|e| !desired.iter().any(|d| d.name.eq_ignore_ascii_case(&e.name)))
            .map(|e| e.name.clone())
            .collect();
    }

    result
}

/// Declared labels for a project: inline labels followed by the label file
pub fn load_desired(project: &LoadedProject) -> Result<Vec<LabelSpec>> {
    let settings = &project.config.labels;
    let mut labels = settings.labels.clone();

    if let Some(file) = &settings.file {
        let path = project.path(file);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let from_file: Vec<LabelSpec> = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        labels.extend(from_file);
    }

    validate(&labels)?;
    Ok(labels)
}

fn validate(labels: &[LabelSpec]) -> Result<()> {
    for (i, label) in labels.iter().enumerate() {
        if label.name.trim().is_empty() {
            anyhow::bail!("Label #{} has an empty name", i + 1);
        }
        let color = label.normalized_color();
        if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "Label '{}' has invalid color '{}' (expected six hex digits)",
                label.name,
                label.color
            );
        }
        if labels[..i]
            .iter()
            .any(|other| other.name.eq_ignore_ascii_case(&label.name))
        {
            anyhow::bail!("Label '{}' is declared more than once", label.name);
        }
    }
    Ok(())
}
