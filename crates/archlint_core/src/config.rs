//! Validator configuration.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use jsonschema::Validator as SchemaValidator;

use crate::CoreError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<SchemaValidator> = OnceLock::new();

fn default_root() -> String {
    archlint_model::ROOT_LOCATOR.to_string()
}

fn default_root_file() -> String {
    "architecture.json".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_builtins() -> Vec<String> {
    vec![
        "element-id-kebab-case".to_string(),
        "element-description-present".to_string(),
        "relations-resolved".to_string(),
    ]
}

/// Configuration for one validator instance.
///
/// Loaded from `.archlint.jsonc` / `.archlint.json`; unknown keys are
/// rejected by the embedded schema so typos surface as config errors
/// rather than silently ignored settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Root locator the resolution walk starts from.
    #[serde(default = "default_root")]
    pub root: String,

    /// Workspace-relative file the `$root$` locator resolves to.
    #[serde(default = "default_root_file")]
    pub root_file: String,

    /// Evaluation ceiling in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Active role for dataset scoping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Enabled built-in rule ids.
    #[serde(default = "default_builtins")]
    pub builtins: Vec<String>,
}

impl ValidatorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            root: default_root(),
            root_file: default_root_file(),
            timeout_secs: default_timeout_secs(),
            role: None,
            builtins: default_builtins(),
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.archlint.jsonc`, `.archlint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSONC string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value = jsonc_parser::parse_to_serde_value(json, &Default::default())
            .map_err(|e| CoreError::config(format!("Invalid JSON: {}", e)))?
            .ok_or_else(|| CoreError::config("Empty config"))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            SchemaValidator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(CoreError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| CoreError::config(format!("Invalid config: {}", e)))
    }

    /// The evaluation ceiling as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
