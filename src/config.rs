//! Configuration file support for pnpm-sbom.
//!
//! Provides YAML-based configuration through `pnpm-sbom.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::sbom_generation::domain::{Excludes, PathExclude, ScopeExclude};
use crate::shared::Result;

const CONFIG_FILENAME: &str = "pnpm-sbom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub document: Option<DocumentConfig>,
    pub excludes: Option<ExcludesConfig>,
    pub license_text_dirs: Option<Vec<PathBuf>>,
    pub findings_file: Option<PathBuf>,
    pub file_information: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Document level settings of the SPDX output.
#[derive(Debug, Deserialize, Default)]
pub struct DocumentConfig {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub creation_info_comment: Option<String>,
    pub person: Option<String>,
    pub organization: Option<String>,
}

/// Path and scope excludes as written in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ExcludesConfig {
    #[serde(default)]
    pub paths: Vec<PathExclude>,
    #[serde(default)]
    pub scopes: Vec<ScopeExclude>,
}

impl ExcludesConfig {
    pub fn to_excludes(&self) -> Excludes {
        Excludes {
            paths: self.paths.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref excludes) = config.excludes {
        for (i, entry) in excludes.paths.iter().enumerate() {
            if entry.pattern.trim().is_empty() {
                bail!(
                    "Invalid config: excludes.paths[{}].pattern must not be empty.\n\n\
                     💡 Hint: Each path exclude needs a pattern (e.g., \"examples/**\").",
                    i
                );
            }
        }
        for (i, entry) in excludes.scopes.iter().enumerate() {
            if entry.pattern.trim().is_empty() {
                bail!(
                    "Invalid config: excludes.scopes[{}].pattern must not be empty.\n\n\
                     💡 Hint: Each scope exclude needs a pattern (e.g., \"devDependencies\").",
                    i
                );
            }
        }
    }

    if let Some(ref format) = config.format {
        if format.parse::<crate::application::dto::OutputFormat>().is_err() {
            bail!(
                "Invalid config: unknown format '{}'.\n\n💡 Hint: Use 'json' or 'yaml'.",
                format
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
