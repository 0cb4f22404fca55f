use crate::ports::outbound::{ManifestReader, PackageManifest, RepositoryInfo};
use crate::shared::error::SbomError;
use crate::shared::security::read_to_string_checked;
use crate::shared::Result;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// FileSystemReader adapter reading `package.json` manifests from disk
///
/// Reads are guarded by the shared security checks (no symlinks, regular
/// files only, size limit).
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Parses manifest JSON text
    ///
    /// # Errors
    /// Returns an error if `content` is not a JSON object.
    pub fn parse_manifest(content: &str) -> Result<PackageManifest> {
        let json: Value = serde_json::from_str(content)?;
        let object = json
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("package.json must contain a JSON object"))?;

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let mut licenses = BTreeSet::new();
        for key in ["license", "licenses"] {
            if let Some(value) = object.get(key) {
                collect_licenses(value, &mut licenses);
            }
        }

        let authors = object
            .get("author")
            .and_then(parse_person)
            .into_iter()
            .collect();

        Ok(PackageManifest {
            name: text("name"),
            version: text("version"),
            description: text("description"),
            homepage: text("homepage"),
            licenses,
            authors,
            repository: object.get("repository").and_then(parse_repository),
            git_head: text("gitHead"),
            resolved: text("_resolved"),
            from: text("_from"),
            integrity: text("_integrity"),
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for FileSystemReader {
    fn read_manifest(&self, path: &Path) -> Result<PackageManifest> {
        let content = read_to_string_checked(path, "package.json").map_err(|e| {
            SbomError::ManifestReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        Self::parse_manifest(&content).map_err(|e| {
            SbomError::ManifestReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

/// Collects declared licenses from the `license` / legacy `licenses` fields
///
/// Accepts a string, an object with a `type`, or an array of either.
fn collect_licenses(value: &Value, licenses: &mut BTreeSet<String>) {
    match value {
        Value::String(license) => {
            if !license.trim().is_empty() {
                licenses.insert(license.trim().to_string());
            }
        }
        Value::Object(object) => {
            if let Some(license) = object.get("type") {
                collect_licenses(license, licenses);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_licenses(item, licenses);
            }
        }
        _ => {}
    }
}

/// Extracts the name from `"Name <email> (url)"` or `{ "name": ... }`
fn parse_person(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(person) => person.as_str(),
        Value::Object(object) => object.get("name").and_then(Value::as_str)?,
        _ => return None,
    };

    let name = raw
        .split(['<', '('])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn parse_repository(value: &Value) -> Option<RepositoryInfo> {
    let repository = match value {
        Value::String(url) => RepositoryInfo {
            url: url.trim().to_string(),
            ..RepositoryInfo::default()
        },
        Value::Object(object) => {
            let field = |key: &str| {
                object
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            };
            RepositoryInfo {
                vcs_type: field("type"),
                url: field("url"),
                directory: field("directory"),
            }
        }
        _ => return None,
    };

    if repository.url.is_empty() {
        None
    } else {
        Some(repository)
    }
}
