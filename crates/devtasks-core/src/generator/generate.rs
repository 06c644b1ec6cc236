//! Render configured templates to their destination files

use super::render::{render, render_strict};
use super::schema::{PlaceholderSpec, COPYRIGHT_YEARS};
use super::session::RenderSession;
use crate::config::{LoadedProject, TemplateEntry};
use crate::copyright::{VersionControl, YearComputer};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Whether generation writes files or only compares them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    Write,
    Check,
}

/// Result of generating one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Destination was created or rewritten
    Written,
    /// Destination already had the rendered content
    Unchanged,
    /// Check mode: destination differs from the rendered content
    Stale,
}

/// Render `template` for `dest`
///
/// `COPYRIGHT_YEARS` is registered from `dest`'s history before rendering, so
/// each generated file carries its own year range.
pub fn generate_file<V: VersionControl>(
    session: &mut RenderSession,
    years: &YearComputer<V>,
    template: &Path,
    dest: &Path,
    strict: bool,
    mode: GenerateMode,
) -> Result<GenerateOutcome> {
    let text = std::fs::read_to_string(template)
        .with_context(|| format!("Failed to read template {}", template.display()))?;

    if matches!(
        session.schema().get(COPYRIGHT_YEARS),
        Some(PlaceholderSpec::Runtime)
    ) {
        let range = years.compute_range(dest);
        session.register_runtime_value(COPYRIGHT_YEARS, range.to_string())?;
    }

    let rendered = if strict {
        render_strict(session, &text)
    } else {
        render(session, &text)
    }
    .with_context(|| format!("Failed to render {}", template.display()))?;

    let existing = match std::fs::read_to_string(dest) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dest.display())),
    };

    if existing.as_deref() == Some(rendered.as_str()) {
        return Ok(GenerateOutcome::Unchanged);
    }

    match mode {
        GenerateMode::Check => Ok(GenerateOutcome::Stale),
        GenerateMode::Write => {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(dest, rendered)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            tracing::info!(dest = %dest.display(), "generated");
            Ok(GenerateOutcome::Written)
        }
    }
}

/// Generate every template listed in the project config, in order
///
/// Stops at the first error; files generated before it are kept.
pub fn generate_all<V: VersionControl>(
    project: &LoadedProject,
    session: &mut RenderSession,
    years: &YearComputer<V>,
    mode: GenerateMode,
) -> Result<Vec<(TemplateEntry, GenerateOutcome)>> {
    let mut outcomes = Vec::with_capacity(project.config.templates.len());
    for entry in &project.config.templates {
        let outcome = generate_file(
            session,
            years,
            &project.path(&entry.source),
            &project.path(&entry.dest),
            entry.strict,
            mode,
        )?;
        outcomes.push((entry.clone(), outcome));
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_project;
    use crate::copyright::years::tests::FakeHistory;
    use crate::error::GeneratorError;
    use crate::generator::ReplacementSchema;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(
            root.join("devtasks.yaml"),
            "templates:\n  - source: templates/README.md\n    dest: README.md\n  - source: templates/ci.yml\n    dest: .github/workflows/ci.yml\n",
        )
        .unwrap();
        std::fs::write(
            root.join("package.json"),
            r#"{"name": "widgets", "author": {"name": "Acme"}, "engines": {"node": ">=18"}}"#,
        )
        .unwrap();
        std::fs::write(
            root.join("templates/README.md"),
            "# {{REPO_NAME}}\n\nCopyright © {{COPYRIGHT_YEARS}} {{AUTHOR}}\n",
        )
        .unwrap();
        std::fs::write(
            root.join("templates/ci.yml"),
            "node-version: {{NODE_VERSION}}\nrun: echo ${{ matrix.os }}\n",
        )
        .unwrap();
        dir
    }

    fn session_for(project: &LoadedProject) -> RenderSession {
        RenderSession::new(ReplacementSchema::standard(2024), project.store.clone())
    }

    #[test]
    fn test_generate_all_writes_then_settles() {
        let dir = project_dir();
        let project = load_project(dir.path()).unwrap();
        let mut session = session_for(&project);
        let readme = dir.path().join("README.md");
        let years = YearComputer::with_current_year(FakeHistory::with(&readme, "2020"), 2024);

        let outcomes = generate_all(&project, &mut session, &years, GenerateMode::Write).unwrap();
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == GenerateOutcome::Written));
        assert_eq!(
            std::fs::read_to_string(&readme).unwrap(),
            "# widgets\n\nCopyright © 2020-2024 Acme\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".github/workflows/ci.yml")).unwrap(),
            "node-version: 18\nrun: echo ${{ matrix.os }}\n"
        );

        let outcomes = generate_all(&project, &mut session, &years, GenerateMode::Check).unwrap();
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == GenerateOutcome::Unchanged));
    }

    #[test]
    fn test_check_mode_reports_stale_without_writing() {
        let dir = project_dir();
        let project = load_project(dir.path()).unwrap();
        let mut session = session_for(&project);
        let years = YearComputer::with_current_year(FakeHistory::default(), 2024);
        let readme = dir.path().join("README.md");
        std::fs::write(&readme, "old\n").unwrap();

        let outcome = generate_file(
            &mut session,
            &years,
            &dir.path().join("templates/README.md"),
            &readme,
            true,
            GenerateMode::Check,
        )
        .unwrap();
        assert_eq!(outcome, GenerateOutcome::Stale);
        assert_eq!(std::fs::read_to_string(&readme).unwrap(), "old\n");
    }

    #[test]
    fn test_strict_template_with_unknown_placeholder_writes_nothing() {
        let dir = project_dir();
        std::fs::write(
            dir.path().join("templates/README.md"),
            "# {{REPO_NAME}} {{NOT_DEFINED}}\n",
        )
        .unwrap();
        let project = load_project(dir.path()).unwrap();
        let mut session = session_for(&project);
        let years = YearComputer::with_current_year(FakeHistory::default(), 2024);

        let err = generate_all(&project, &mut session, &years, GenerateMode::Write).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeneratorError>(),
            Some(GeneratorError::UnknownPlaceholder { .. })
        ));
        assert!(!dir.path().join("README.md").exists());
    }

    #[test]
    fn test_lenient_template_keeps_unknown_tokens() {
        let dir = project_dir();
        let template = dir.path().join("templates/README.md");
        std::fs::write(&template, "{{REPO_NAME}} {{NOT_DEFINED}}").unwrap();
        let project = load_project(dir.path()).unwrap();
        let mut session = session_for(&project);
        let years = YearComputer::with_current_year(FakeHistory::default(), 2024);
        let dest = dir.path().join("out/README.md");

        generate_file(&mut session, &years, &template, &dest, false, GenerateMode::Write).unwrap();
        assert_eq!(
            std::fs::read_to_string(dest).unwrap(),
            "widgets {{NOT_DEFINED}}"
        );
    }
}
