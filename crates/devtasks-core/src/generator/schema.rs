//! Replacement schema: how each placeholder gets its value

use crate::config::{Scalar, PACKAGE_SOURCE};
use anyhow::{Context, Result};
use semver::VersionReq;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Function applied to a resolved config value
pub type Transform = Arc<dyn Fn(&Scalar) -> Result<Scalar> + Send + Sync>;

/// How a single placeholder is resolved
#[derive(Clone)]
pub enum PlaceholderSpec {
    /// Look up a path in the config store
    Path(Vec<String>),
    /// Look up a path, then transform the value
    TransformedPath { path: Vec<String>, transform: Transform },
    /// Fixed value
    Literal(Scalar),
    /// Supplied by the caller during the run
    Runtime,
}

impl fmt::Debug for PlaceholderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderSpec::Path(path) => f.debug_tuple("Path").field(path).finish(),
            PlaceholderSpec::TransformedPath { path, .. } => f
                .debug_struct("TransformedPath")
                .field("path", path)
                .finish_non_exhaustive(),
            PlaceholderSpec::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            PlaceholderSpec::Runtime => f.write_str("Runtime"),
        }
    }
}

/// Ordered table of placeholder names and their specs
#[derive(Debug, Clone, Default)]
pub struct ReplacementSchema {
    entries: Vec<(String, PlaceholderSpec)>,
}

fn to_path(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

impl ReplacementSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, keeping the original position on replace
    pub fn insert(&mut self, name: &str, spec: PlaceholderSpec) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name.to_string(), spec)),
        }
    }

    pub fn path(mut self, name: &str, path: &[&str]) -> Self {
        self.insert(name, PlaceholderSpec::Path(to_path(path)));
        self
    }

    pub fn transformed<F>(mut self, name: &str, path: &[&str], transform: F) -> Self
    where
        F: Fn(&Scalar) -> Result<Scalar> + Send + Sync + 'static,
    {
        self.insert(
            name,
            PlaceholderSpec::TransformedPath {
                path: to_path(path),
                transform: Arc::new(transform),
            },
        );
        self
    }

    pub fn literal(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.insert(name, PlaceholderSpec::Literal(value.into()));
        self
    }

    pub fn runtime(mut self, name: &str) -> Self {
        self.insert(name, PlaceholderSpec::Runtime);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PlaceholderSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Placeholder names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// The built-in placeholders available to every template
    pub fn standard(current_year: i32) -> Self {
        Self::new()
            .path("REPO_NAME", &[PACKAGE_SOURCE, "name"])
            .path("REPO_DESCRIPTION", &[PACKAGE_SOURCE, "description"])
            .path("REPO_VERSION", &[PACKAGE_SOURCE, "version"])
            .path("LICENSE", &[PACKAGE_SOURCE, "license"])
            .path("AUTHOR", &[PACKAGE_SOURCE, "author", "name"])
            .transformed("REPO_URL", &[PACKAGE_SOURCE, "repository", "url"], |v| {
                Ok(Scalar::String(normalize_repository_url(&v.to_string())))
            })
            .transformed("GITHUB_REPO", &[PACKAGE_SOURCE, "repository", "url"], |v| {
                github_slug(&v.to_string()).map(Scalar::String)
            })
            .transformed("NODE_VERSION", &[PACKAGE_SOURCE, "engines", "node"], |v| {
                minimum_major(&v.to_string()).map(|major| Scalar::from(major as i64))
            })
            .literal("CURRENT_YEAR", current_year)
            .runtime(COPYRIGHT_YEARS)
            .runtime("BUILD_SUMMARY")
    }
}

/// Runtime placeholder holding the year range of the generated file
pub const COPYRIGHT_YEARS: &str = "COPYRIGHT_YEARS";

/// Turn an npm-style repository URL into a browsable https URL
///
/// `git+https://github.com/acme/widgets.git` and `git@github.com:acme/widgets.git`
/// both become `https://github.com/acme/widgets`.
pub fn normalize_repository_url(raw: &str) -> String {
    let url = raw.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = match url.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => url.replacen("git://", "https://", 1),
    };
    let url = url.trim_end_matches('/');
    url.strip_suffix(".git").unwrap_or(url).to_string()
}

/// Extract `owner/name` from a GitHub repository URL
pub fn github_slug(raw: &str) -> Result<String> {
    let normalized = normalize_repository_url(raw);
    let url = Url::parse(&normalized)
        .with_context(|| format!("'{}' is not a repository URL", raw))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [owner, name, ..] => Ok(format!("{}/{}", owner, name)),
        _ => anyhow::bail!("'{}' does not name an owner and repository", raw),
    }
}

/// Lowest major version admitted by a version requirement like `>=18`
pub fn minimum_major(requirement: &str) -> Result<u64> {
    let req = VersionReq::parse(requirement.trim())
        .with_context(|| format!("'{}' is not a version requirement", requirement))?;
    req.comparators
        .iter()
        .map(|c| c.major)
        .min()
        .ok_or_else(|| anyhow::anyhow!("'{}' does not constrain a version", requirement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_kinds() {
        let schema = ReplacementSchema::standard(2024);
        assert!(matches!(schema.get("AUTHOR"), Some(PlaceholderSpec::Path(_))));
        assert!(matches!(
            schema.get("REPO_URL"),
            Some(PlaceholderSpec::TransformedPath { .. })
        ));
        assert!(matches!(
            schema.get("CURRENT_YEAR"),
            Some(PlaceholderSpec::Literal(Scalar::Number(_)))
        ));
        assert!(matches!(
            schema.get(COPYRIGHT_YEARS),
            Some(PlaceholderSpec::Runtime)
        ));
        assert!(schema.get("MISSING").is_none());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let schema = ReplacementSchema::new()
            .literal("A", "1")
            .literal("B", "2")
            .runtime("A");
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(matches!(schema.get("A"), Some(PlaceholderSpec::Runtime)));
    }

    #[test]
    fn test_normalize_repository_url() {
        assert_eq!(
            normalize_repository_url("git+https://github.com/acme/widgets.git"),
            "https://github.com/acme/widgets"
        );
        assert_eq!(
            normalize_repository_url("git@github.com:acme/widgets.git"),
            "https://github.com/acme/widgets"
        );
        assert_eq!(
            normalize_repository_url("git://github.com/acme/widgets"),
            "https://github.com/acme/widgets"
        );
    }

    #[test]
    fn test_github_slug() {
        assert_eq!(
            github_slug("git+https://github.com/acme/widgets.git").unwrap(),
            "acme/widgets"
        );
        assert!(github_slug("https://github.com/acme").is_err());
        assert!(github_slug("not a url").is_err());
    }

    #[test]
    fn test_minimum_major() {
        assert_eq!(minimum_major(">=18").unwrap(), 18);
        assert_eq!(minimum_major("^20.1.0").unwrap(), 20);
        assert_eq!(minimum_major(">=16, <22").unwrap(), 16);
        assert!(minimum_major("latest").is_err());
    }
}
