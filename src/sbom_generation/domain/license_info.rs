use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Result of mapping declared license strings to an SPDX expression
///
/// `spdx_expression` is `None` when no declared license could be mapped.
/// Declared strings that could not be mapped are kept in `unmapped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDeclaredLicense {
    pub spdx_expression: Option<String>,
    pub unmapped: BTreeSet<String>,
}

impl ProcessedDeclaredLicense {
    pub fn new(spdx_expression: Option<String>, unmapped: BTreeSet<String>) -> Self {
        Self {
            spdx_expression,
            unmapped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spdx_expression.is_none() && self.unmapped.is_empty()
    }
}

/// Where the scanned files of a project or package came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingOrigin {
    /// Files of a checked out repository
    Vcs,
    /// Files of a downloaded source artifact
    Artifact,
}

impl fmt::Display for FindingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingOrigin::Vcs => write!(f, "vcs"),
            FindingOrigin::Artifact => write!(f, "artifact"),
        }
    }
}

/// License and copyright findings for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFinding {
    pub path: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub licenses: BTreeSet<String>,
    #[serde(default)]
    pub copyrights: BTreeSet<String>,
}

impl FileFinding {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sha1: None,
            licenses: BTreeSet::new(),
            copyrights: BTreeSet::new(),
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.licenses.insert(license.into());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyrights.insert(copyright.into());
        self
    }

    pub fn with_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_declared_license_empty() {
        assert!(ProcessedDeclaredLicense::default().is_empty());

        let processed = ProcessedDeclaredLicense::new(Some("MIT".to_string()), BTreeSet::new());
        assert!(!processed.is_empty());
    }

    #[test]
    fn test_file_finding_builders() {
        let finding = FileFinding::new("LICENSE")
            .with_license("MIT")
            .with_copyright("Copyright (c) 2020 Jane Doe")
            .with_sha1("da39a3ee5e6b4b0d3255bfef95601890afd80709");

        assert_eq!(finding.path, "LICENSE");
        assert!(finding.licenses.contains("MIT"));
        assert_eq!(finding.copyrights.len(), 1);
        assert!(finding.sha1.is_some());
    }

    #[test]
    fn test_finding_origin_deserialize() {
        let origin: FindingOrigin = serde_json::from_str("\"vcs\"").unwrap();
        assert_eq!(origin, FindingOrigin::Vcs);
        assert_eq!(FindingOrigin::Artifact.to_string(), "artifact");
    }
}
