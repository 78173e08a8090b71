//! Configuration Management
//!
//! Loads the per-environment database configuration file (conventionally
//! `config/database.yml`) into [`ConnectionRecord`]s. The file is a YAML
//! mapping from environment name to a flat mapping of connection fields:
//!
//! ```yaml
//! development:
//!   adapter: mysql
//!   database: dev_db
//!   username: dev_user
//! ```
//!
//! Scalar values (strings, numbers, booleans) are coerced to strings; null
//! values are treated as absent, matching how missing keys behave. Nested
//! values are a configuration error. Any embedded templating is expected to
//! be resolved before the file reaches this loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DbPromptError, Result};
use crate::record::ConnectionRecord;

/// Environment used when none is given on the command line
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config/database.yml";

/// The configuration file as deserialized: environment name to a raw YAML
/// value, validated and coerced into records afterwards
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ConfigDocument {
    environments: BTreeMap<String, serde_yaml::Value>,
}

/// Load every environment's record from a YAML configuration file
pub fn load(path: &Path) -> Result<BTreeMap<String, ConnectionRecord>> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        DbPromptError::config_error(format!("Cannot read file {}: {err}", path.display()))
    })?;

    let doc: ConfigDocument = serde_yaml::from_str(&text).map_err(|err| {
        DbPromptError::config_error(format!("Error {err} while reading {}", path.display()))
    })?;

    let mut environments = BTreeMap::new();
    for (environment, value) in doc.environments {
        environments.insert(environment.clone(), record_from_yaml(&environment, value)?);
    }
    Ok(environments)
}

/// Load the record for one environment
///
/// Fails with `EnvironmentNotFound` naming the environment and the file when
/// the environment has no entry.
pub fn record_for(path: &Path, environment: &str) -> Result<ConnectionRecord> {
    let mut environments = load(path)?;
    environments.remove(environment).ok_or_else(|| DbPromptError::EnvironmentNotFound {
        environment: environment.to_string(),
        path: path.to_path_buf(),
    })
}

fn record_from_yaml(environment: &str, value: serde_yaml::Value) -> Result<ConnectionRecord> {
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(DbPromptError::config_error(format!(
            "Environment {environment:?} is not a mapping of connection fields"
        )));
    };

    let mut record = ConnectionRecord::new();
    for (key, value) in mapping {
        let serde_yaml::Value::String(key) = key else {
            return Err(DbPromptError::config_error(format!(
                "Environment {environment:?} has a non-string key"
            )));
        };
        match value {
            serde_yaml::Value::Null => {} // treat explicit nulls as absent
            serde_yaml::Value::String(s) => {
                record.insert(key, s);
            }
            serde_yaml::Value::Number(n) => {
                record.insert(key, n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                record.insert(key, b.to_string());
            }
            other => {
                return Err(DbPromptError::config_error(format!(
                    "Environment {environment:?} key {key:?} has unsupported value {other:?}"
                )));
            }
        }
    }
    Ok(record)
}
