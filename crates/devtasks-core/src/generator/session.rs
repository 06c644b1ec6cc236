//! Per-run value resolution with memoization

use super::schema::{PlaceholderSpec, ReplacementSchema};
use crate::config::{resolve, ConfigStore, Scalar};
use crate::error::GeneratorError;
use std::collections::HashMap;

/// One generation run: schema, config, and the values resolved so far
///
/// Values are cached for the lifetime of the session. Create a new session
/// for each top-level invocation; a session never invalidates its cache.
#[derive(Debug)]
pub struct RenderSession {
    schema: ReplacementSchema,
    config: ConfigStore,
    cache: HashMap<String, Scalar>,
}

impl RenderSession {
    pub fn new(schema: ReplacementSchema, config: ConfigStore) -> Self {
        Self {
            schema,
            config,
            cache: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &ReplacementSchema {
        &self.schema
    }

    /// Mutable access to the config store
    ///
    /// Names already resolved keep their cached value.
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    /// Resolve a placeholder's value
    pub fn get_value(&mut self, name: &str) -> Result<Scalar, GeneratorError> {
        let spec = self
            .schema
            .get(name)
            .ok_or_else(|| GeneratorError::unknown(name))?;

        if let Some(cached) = self.cache.get(name) {
            tracing::trace!(placeholder = name, "cache hit");
            return Ok(cached.clone());
        }

        let value = match spec {
            PlaceholderSpec::Path(path) => resolve(self.config.tree(), path)?,
            PlaceholderSpec::TransformedPath { path, transform } => {
                let raw = resolve(self.config.tree(), path)?;
                transform(&raw).map_err(|e| GeneratorError::InvalidConfigValue {
                    name: name.to_string(),
                    reason: format!("{:#}", e),
                })?
            }
            PlaceholderSpec::Literal(value) => value.clone(),
            PlaceholderSpec::Runtime => {
                return Err(GeneratorError::UnregisteredRuntimeValue {
                    name: name.to_string(),
                })
            }
        };

        tracing::debug!(placeholder = name, value = %value, "resolved placeholder");
        self.cache.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Supply the value of a runtime placeholder for this run
    ///
    /// Overwrites any value registered earlier in the same session.
    pub fn register_runtime_value(
        &mut self,
        name: &str,
        value: impl Into<Scalar>,
    ) -> Result<(), GeneratorError> {
        match self.schema.get(name) {
            None => Err(GeneratorError::unknown(name)),
            Some(PlaceholderSpec::Runtime) => {
                let value = value.into();
                tracing::debug!(placeholder = name, value = %value, "registered runtime value");
                self.cache.insert(name.to_string(), value);
                Ok(())
            }
            Some(_) => Err(GeneratorError::NotARuntimePlaceholder {
                name: name.to_string(),
            }),
        }
    }
}
