//! Placeholder templating over the config store
//!
//! This module provides:
//! - `ReplacementSchema`: placeholder names and how each value is obtained
//! - `RenderSession`: per-run resolution with a value cache
//! - `render` / `render_strict`: `{{NAME}}` substitution
//! - `generate_file` / `generate_all`: template-to-file generation

pub mod generate;
pub mod render;
pub mod schema;
pub mod session;

pub use generate::{generate_all, generate_file, GenerateMode, GenerateOutcome};
pub use render::{find_placeholders, render, render_strict};
pub use schema::{PlaceholderSpec, ReplacementSchema, Transform, COPYRIGHT_YEARS};
pub use session::RenderSession;
