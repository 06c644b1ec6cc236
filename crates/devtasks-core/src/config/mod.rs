//! Configuration loading and nested value resolution
//!
//! This module provides:
//! - `ConfigStore`: the raw config tree (`package.json` plus the project config)
//! - `resolve`: dotted-path lookup with expected-shape errors
//! - `ProjectConfig`: typed view of `devtasks.yaml`

pub mod project;
pub mod resolver;
pub mod scalar;
pub mod store;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use project::{
    CopyrightSettings, LabelSettings, ProjectConfig, TemplateEntry, PROJECT_CONFIG_FILE,
};
pub use resolver::resolve;
pub use scalar::Scalar;
pub use store::{read_json, read_yaml_as_tree, ConfigStore, BUILD_SOURCE, PACKAGE_SOURCE};

/// A project root with its parsed config and raw config tree
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub store: ConfigStore,
}

impl LoadedProject {
    /// Resolve a path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Load `devtasks.yaml` and `package.json` from a project root
///
/// Either file may be absent: a missing project config yields the defaults,
/// and a missing package.json leaves the `package` source out of the store so
/// lookups into it report a missing path.
pub fn load_project(root: &Path) -> Result<LoadedProject> {
    let config_path = root.join(PROJECT_CONFIG_FILE);
    let build_tree = read_yaml_as_tree(&config_path)?;

    let config: ProjectConfig = match &build_tree {
        Some(tree) => serde_json::from_value(tree.clone())
            .with_context(|| format!("Invalid project config {}", config_path.display()))?,
        None => {
            tracing::debug!(path = %config_path.display(), "no project config, using defaults");
            ProjectConfig::default()
        }
    };

    let mut store = ConfigStore::new();
    if let Some(tree) = build_tree {
        store.insert_source(BUILD_SOURCE, tree);
    }

    let package_path = root.join(&config.package);
    match read_json(&package_path)? {
        Some(package) => store.insert_source(PACKAGE_SOURCE, package),
        None => tracing::debug!(path = %package_path.display(), "package file not found"),
    }

    Ok(LoadedProject {
        root: root.to_path_buf(),
        config,
        store,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_project_with_both_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("devtasks.yaml"),
            "templates:\n  - source: t/README.md\n    dest: README.md\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "widgets", "author": {"name": "Acme"}}"#,
        )
        .unwrap();

        let project = load_project(dir.path()).unwrap();
        assert_eq!(project.config.templates.len(), 1);
        assert!(project.store.contains(&["package", "author", "name"]));
        assert!(project.store.contains(&["build", "templates"]));
    }

    #[test]
    fn test_load_project_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = load_project(dir.path()).unwrap();
        assert!(project.config.templates.is_empty());
        assert!(project.store.source_names().is_empty());
    }

    #[test]
    fn test_load_project_custom_package_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();
        std::fs::write(dir.path().join("devtasks.yaml"), "package: web/package.json\n").unwrap();
        std::fs::write(dir.path().join("web/package.json"), r#"{"name": "web"}"#).unwrap();

        let project = load_project(dir.path()).unwrap();
        assert_eq!(
            resolve(project.store.tree(), &["package", "name"]).unwrap(),
            Scalar::from("web")
        );
    }

    #[test]
    fn test_load_project_malformed_package_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{").unwrap();
        assert!(load_project(dir.path()).is_err());
    }
}
