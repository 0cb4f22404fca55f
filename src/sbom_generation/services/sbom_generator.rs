use chrono::{SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Name used in the tool creator line of generated documents
pub const TOOL_NAME: &str = "pnpm-sbom";

/// Per-document metadata that differs between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    created: String,
    document_namespace: String,
    tool_creator: String,
}

impl DocumentMetadata {
    /// Creation timestamp, RFC 3339 in UTC with whole seconds
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Fresh `spdx://<uuid>` namespace of the document
    pub fn document_namespace(&self) -> &str {
        &self.document_namespace
    }

    /// Creator line identifying this tool, e.g. `Tool: pnpm-sbom-0.4.0`
    pub fn tool_creator(&self) -> &str {
        &self.tool_creator
    }
}

/// SbomGenerator service for generating document metadata
///
/// Every call produces a new namespace; namespaces are never reused.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates metadata with the current time and a random namespace
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool generating the document
    /// * `tool_version` - Version of the tool
    pub fn generate_metadata(tool_name: &str, tool_version: &str) -> DocumentMetadata {
        let created = Utc::now()
            .trunc_subsecs(0)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        DocumentMetadata {
            created,
            document_namespace: format!("spdx://{}", Uuid::new_v4()),
            tool_creator: format!("Tool: {}-{}", tool_name, tool_version),
        }
    }

    /// Generates metadata for this tool using the compile-time version
    pub fn generate_default_metadata() -> DocumentMetadata {
        Self::generate_metadata(TOOL_NAME, env!("CARGO_PKG_VERSION"))
    }
}
