mod dependency_graph_builder;
mod sbom_generator;
mod spdx_document_mapper;

pub use dependency_graph_builder::DependencyGraphBuilder;
pub use sbom_generator::{DocumentMetadata, SbomGenerator, TOOL_NAME};
pub use spdx_document_mapper::{
    package_spdx_id, project_spdx_id, FileIndexCounter, SpdxDocumentMapper, SpdxDocumentParams,
};
