use crate::ports::outbound::LicenseInfoResolver;
use crate::sbom_generation::domain::{FileFinding, FindingOrigin, Identifier};
use crate::shared::error::SbomError;
use crate::shared::security::read_to_string_checked;
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FindingsFile {
    #[serde(default)]
    findings: Vec<FindingsEntry>,
}

/// Recorded scan results for one project or package
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FindingsEntry {
    id: String,
    #[serde(default)]
    concluded_license: Option<String>,
    #[serde(default)]
    vcs: Vec<FileFinding>,
    #[serde(default)]
    artifact: Vec<FileFinding>,
}

/// FindingsStore adapter serving license findings recorded by a scanner
///
/// The findings file is YAML (JSON is accepted too):
///
/// ```yaml
/// findings:
///   - id: "NPM::lodash:4.17.21"
///     concluded_license: MIT
///     artifact:
///       - path: LICENSE
///         licenses: [MIT]
///         copyrights: ["Copyright OpenJS Foundation"]
/// ```
///
/// Without a findings file the store is empty and every lookup yields nothing.
#[derive(Debug, Default)]
pub struct FindingsStore {
    entries: BTreeMap<Identifier, FindingsEntry>,
}

impl FindingsStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a findings file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// names an identifier that is not in `type:namespace:name:version` form.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string_checked(path, "findings file").map_err(|e| {
            SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse findings file: {}", path.display()))
    }

    /// Parses findings from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let file: FindingsFile = serde_yaml_ng::from_str(content)?;

        let mut entries = BTreeMap::new();
        for entry in file.findings {
            let id: Identifier = entry.id.parse()?;
            entries.insert(id, entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LicenseInfoResolver for FindingsStore {
    fn file_findings(&self, id: &Identifier, origin: FindingOrigin) -> Result<Vec<FileFinding>> {
        let Some(entry) = self.entries.get(id) else {
            return Ok(Vec::new());
        };

        let mut findings = match origin {
            FindingOrigin::Vcs => entry.vcs.clone(),
            FindingOrigin::Artifact => entry.artifact.clone(),
        };
        findings.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(findings)
    }

    fn concluded_license(&self, id: &Identifier) -> Option<String> {
        self.entries
            .get(id)
            .and_then(|entry| entry.concluded_license.clone())
            .filter(|license| !license.trim().is_empty())
    }
}
