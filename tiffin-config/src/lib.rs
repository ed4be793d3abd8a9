//! Layered configuration for the Tiffin runner.
//!
//! Sources merge lowest to highest: built-in defaults, then YAML files
//! in the order they were added, then `TIFFIN`-prefixed environment
//! variables with `__` separating nested keys
//! (`TIFFIN__WEBDRIVER__URL`), so the environment always wins. String
//! values may reference environment variables as `${VAR}`; expansion
//! runs after the merge and is depth-capped so reference cycles cannot
//! hang the loader.

pub mod schema;

pub use schema::{
    LogSection, ScanSection, SelectorsSection, TiffinConfig, TimeoutsSection, WebDriverSection,
};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde_json::Value;
use thiserror::Error;

/// Passes of `${VAR}` expansion before giving up on a value.
const MAX_ENV_EXPANSION_PASSES: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration could not be read: {0}")]
    Read(#[from] config::ConfigError),

    #[error("configuration is invalid: {0}")]
    Invalid(String),
}

/// Builder for [`TiffinConfig`].
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// Starts from built-in defaults; the environment overlay is added
    /// on top of everything at [`ConfigLoader::load`] time.
    ///
    /// ```
    /// use tiffin_config::ConfigLoader;
    ///
    /// let cfg = ConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(cfg.location, "bangalore");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Adds a YAML file that must exist.
    pub fn with_file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Adds a YAML file that is skipped when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Adds inline YAML, mostly for tests.
    ///
    /// ```
    /// use tiffin_config::ConfigLoader;
    ///
    /// let cfg = ConfigLoader::new()
    ///     .with_yaml_str("restaurant: Meghana Foods")
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(cfg.restaurant, "Meghana Foods");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merges all sources, expands `${VAR}` references, and returns the
    /// typed configuration.
    pub fn load(self) -> Result<TiffinConfig, ConfigError> {
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix("TIFFIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let mut raw: Value = merged.try_deserialize()?;
        expand_env_strings(&mut raw);
        serde_json::from_value(raw).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `${VAR}` in every string of the merged tree, in place.
fn expand_env_strings(value: &mut Value) {
    match value {
        Value::String(s) => *s = expand_env_str(std::mem::take(s)),
        Value::Array(items) => items.iter_mut().for_each(expand_env_strings),
        Value::Object(map) => map.values_mut().for_each(expand_env_strings),
        _ => {}
    }
}

/// Repeated expansion until a fixpoint, capped at
/// [`MAX_ENV_EXPANSION_PASSES`]. Unknown variables are left verbatim.
fn expand_env_str(mut s: String) -> String {
    if !s.contains('$') {
        return s;
    }
    for _ in 0..MAX_ENV_EXPANSION_PASSES {
        let expanded = match shellexpand::env(&s) {
            Ok(cow) => cow.into_owned(),
            Err(_) => return s,
        };
        if expanded == s {
            break;
        }
        s = expanded;
    }
    s
}
