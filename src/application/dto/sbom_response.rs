use crate::sbom_generation::domain::{DependencyGraph, SpdxDocument};

/// SbomResponse - Internal response DTO of the SBOM generation use case
///
/// Adapters serialize `document`; the counters feed the completion summary.
#[derive(Debug, Clone)]
pub struct SbomResponse {
    /// The generated SPDX document
    pub document: SpdxDocument,
    /// Graph of all projects and packages, including excluded ones
    pub dependency_graph: DependencyGraph,
    /// Number of issues recorded while resolving packages
    pub issue_count: usize,
}

impl SbomResponse {
    pub fn new(document: SpdxDocument, dependency_graph: DependencyGraph, issue_count: usize) -> Self {
        Self {
            document,
            dependency_graph,
            issue_count,
        }
    }
}
