//! devtasks core - shared library for repository maintenance tasks
//!
//! This library provides the tasks behind the `devtasks` CLI: rendering
//! readme/CI files from `{{PLACEHOLDER}}` templates, keeping copyright
//! statements in source files current, and synchronizing GitHub labels.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Values** - `ConfigStore` and `resolve` read `package.json` and `devtasks.yaml`
//! - **Layer 2: Generation** - `ReplacementSchema`, `RenderSession` and the renderer
//! - **Layer 3: Tasks** - template generation, copyright update/check, label sync
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use devtasks_core::{config, copyright, generator};
//!
//! let project = config::load_project(Path::new("."))?;
//! let schema = generator::ReplacementSchema::standard(2024);
//! let mut session = generator::RenderSession::new(schema, project.store.clone());
//! let years = copyright::YearComputer::new(copyright::GitHistory::new(&project.root));
//!
//! let mut tool = copyright::CopyrightTool::new(&mut session, &years);
//! tool.update_file(Path::new("src/index.js"))?;
//! ```

pub mod config;
pub mod copyright;
pub mod error;
pub mod generator;
pub mod labels;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{load_project, ConfigStore, LoadedProject, ProjectConfig, Scalar};
pub use copyright::{CopyrightTool, GitHistory, UpdateOutcome, YearComputer};
pub use error::GeneratorError;
pub use generator::{render, render_strict, RenderSession, ReplacementSchema};
pub use labels::{GithubLabels, LabelPlan, LabelSpec};

/// User agent for HTTP requests
pub const USER_AGENT: &str = concat!("devtasks/", env!("CARGO_PKG_VERSION"));
