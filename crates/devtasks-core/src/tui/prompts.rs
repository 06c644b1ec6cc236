//! Charm-style CLI prompts using cliclack

use crate::copyright::{CopyrightTool, UpdateOutcome, VersionControl};
use crate::labels::{GithubLabels, LabelPlan};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Ask for confirmation unless `yes` is set
fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed: bool = cliclack::confirm(message).initial_value(true).interact()?;
    Ok(confirmed)
}

fn display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Update copyright statements with an interactive confirmation
///
/// Files are processed in order; the first failure aborts the rest, and
/// files updated before it keep their new statement.
pub fn run_copyright_update<V: VersionControl>(
    tool: &mut CopyrightTool<'_, V>,
    root: &Path,
    files: &[PathBuf],
    yes: bool,
) -> Result<()> {
    cliclack::intro("copyright update")?;

    if files.is_empty() {
        cliclack::outro("No matching files")?;
        return Ok(());
    }

    cliclack::log::info(format!("{} file(s) to check", files.len()))?;
    if !confirm("Rewrite outdated copyright statements?", yes)? {
        cliclack::outro_cancel("Cancelled")?;
        return Ok(());
    }

    let mut changed = 0;
    for file in files {
        match tool.update_file(file) {
            Ok(UpdateOutcome::Unchanged) => {}
            Ok(UpdateOutcome::Replaced) => {
                changed += 1;
                cliclack::log::success(format!("updated  {}", display(root, file)))?;
            }
            Ok(UpdateOutcome::Inserted) => {
                changed += 1;
                cliclack::log::success(format!("inserted {}", display(root, file)))?;
            }
            Err(e) => {
                cliclack::log::error(format!("{}: {:#}", display(root, file), e))?;
                return Err(e);
            }
        }
    }

    cliclack::outro(format!(
        "{} of {} file(s) changed",
        changed,
        files.len()
    ))?;
    Ok(())
}

/// Show a label plan and apply it after confirmation
pub async fn run_label_sync(
    client: &GithubLabels,
    slug: &str,
    plan: &LabelPlan,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    cliclack::intro(format!("labels sync {}", slug))?;

    if plan.is_empty() {
        cliclack::outro("Labels are already in sync")?;
        return Ok(());
    }

    for line in plan.summary() {
        cliclack::log::info(line)?;
    }

    if dry_run {
        cliclack::outro("Dry run, nothing changed")?;
        return Ok(());
    }

    if !confirm("Apply these changes?", yes)? {
        cliclack::outro_cancel("Cancelled")?;
        return Ok(());
    }

    if let Err(e) = client.apply(plan).await {
        cliclack::log::error(format!("{:#}", e))?;
        return Err(e);
    }

    cliclack::outro(format!("Applied {} change(s)", plan.summary().len()))?;
    Ok(())
}
