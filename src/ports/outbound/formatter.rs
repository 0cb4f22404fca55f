use crate::sbom_generation::domain::SpdxDocument;
use crate::shared::Result;

/// SbomFormatter port for serializing SPDX documents
///
/// This port abstracts the concrete file format (SPDX JSON, SPDX YAML).
pub trait SbomFormatter {
    /// Serializes the document
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, document: &SpdxDocument) -> Result<String>;
}
