//! Error taxonomy for placeholder resolution and copyright maintenance
//!
//! Every variant is fatal to the invoking task. Orchestration code wraps these
//! in `anyhow::Error` with file or URL context; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the generator and copyright subsystems
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A required configuration key is absent or is not a string/number
    #[error(
        "Missing configuration value at '{}' (no usable value at '{missing}').\n\
         Add the following to {source_hint}:\n{expected}",
        path.join(".")
    )]
    MissingConfigPath {
        path: Vec<String>,
        missing: String,
        source_hint: String,
        expected: String,
    },

    /// Placeholder name has no schema entry
    #[error("Unknown placeholder '{name}'")]
    UnknownPlaceholder { name: String },

    /// Runtime placeholder read before any value was registered for this run
    #[error("No value has been registered for runtime placeholder '{name}'")]
    UnregisteredRuntimeValue { name: String },

    /// Attempt to register a value for a placeholder that is config-sourced
    #[error("Placeholder '{name}' is not a runtime placeholder and cannot be set")]
    NotARuntimePlaceholder { name: String },

    /// A transform rejected the configured value
    #[error("Invalid value for placeholder '{name}': {reason}")]
    InvalidConfigValue { name: String, reason: String },

    /// No single-line comment syntax is known for the extension
    #[error("Unsupported file extension for copyright statements: '{extension}'")]
    UnsupportedExtension { extension: String },

    /// The first line of a file is not the expected copyright statement
    #[error(
        "Copyright statement mismatch in {}\n  actual:   {actual}\n  expected: {expected}",
        path.display()
    )]
    CopyrightMismatch {
        path: PathBuf,
        actual: String,
        expected: String,
    },
}

impl GeneratorError {
    pub(crate) fn unknown(name: &str) -> Self {
        Self::UnknownPlaceholder {
            name: name.to_string(),
        }
    }
}
