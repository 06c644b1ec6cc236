//! Raw configuration tree loaded once per run

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;

/// Name of the source holding `package.json`
pub const PACKAGE_SOURCE: &str = "package";

/// Name of the source holding the project config file
pub const BUILD_SOURCE: &str = "build";

/// Configuration values keyed by the source they came from
///
/// The tree is an object whose top-level keys are source names
/// (`package`, `build`), each holding that file's parsed content.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    tree: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tree: Value::Object(Map::new()),
        }
    }

    /// Builder-style variant of [`ConfigStore::insert_source`]
    pub fn with_source(mut self, name: &str, value: Value) -> Self {
        self.insert_source(name, value);
        self
    }

    /// Add (or replace) a named source
    pub fn insert_source(&mut self, name: &str, value: Value) {
        if let Value::Object(map) = &mut self.tree {
            map.insert(name.to_string(), value);
        }
    }

    /// The whole tree, for resolution
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Names of the loaded sources
    pub fn source_names(&self) -> Vec<&str> {
        match &self.tree {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Check whether a value exists at `path` (any type)
    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let mut current = &self.tree;
        for segment in path {
            match current.get(segment.as_ref()) {
                Some(next) => current = next,
                None => return false,
            }
        }
        true
    }
}

/// Read a JSON file
///
/// Returns `Ok(None)` when the file does not exist, and an error when it
/// exists but cannot be read or parsed.
pub fn read_json(path: &Path) -> Result<Option<Value>> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

/// Read a YAML file into the same tree representation as JSON sources
pub fn read_yaml_as_tree(path: &Path) -> Result<Option<Value>> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };
    if content.trim().is_empty() {
        return Ok(Some(Value::Object(Map::new())));
    }
    let value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_nested_path() {
        let store = ConfigStore::new().with_source("package", json!({"author": {"name": "A"}}));
        assert!(store.contains(&["package", "author", "name"]));
        assert!(store.contains(&["package", "author"]));
        assert!(!store.contains(&["package", "license"]));
        assert!(!store.contains(&["build"]));
    }

    #[test]
    fn test_source_names() {
        let store = ConfigStore::new()
            .with_source(PACKAGE_SOURCE, json!({}))
            .with_source(BUILD_SOURCE, json!({}));
        let mut names = store.source_names();
        names.sort();
        assert_eq!(names, vec!["build", "package"]);
    }

    #[test]
    fn test_read_json_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_json(&dir.path().join("package.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_json_parse_error_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_read_yaml_as_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devtasks.yaml");
        std::fs::write(&path, "labels:\n  repo: owner/name\n").unwrap();
        let tree = read_yaml_as_tree(&path).unwrap().unwrap();
        assert_eq!(tree["labels"]["repo"], json!("owner/name"));
    }
}
