use crate::sbom_generation::domain::{FileFinding, FindingOrigin, Identifier};
use crate::shared::Result;

/// LicenseInfoResolver port providing per-file license findings
///
/// Findings are produced by an external scanner; this port only looks them up.
pub trait LicenseInfoResolver {
    /// File level findings for the project or package `id`
    ///
    /// # Arguments
    /// * `id` - Identifier of the project or package
    /// * `origin` - Whether the files come from the VCS checkout or the source artifact
    ///
    /// # Errors
    /// Returns an error if the findings exist but cannot be loaded.
    fn file_findings(&self, id: &Identifier, origin: FindingOrigin) -> Result<Vec<FileFinding>>;

    /// Concluded license of `id`, if one was recorded
    fn concluded_license(&self, id: &Identifier) -> Option<String>;
}

/// LicenseTextProvider port materializing license texts
pub trait LicenseTextProvider {
    /// Text of the license `license_id` (e.g. `LicenseRef-acme-eula`)
    ///
    /// Returns `Ok(None)` when no text is known for the license.
    ///
    /// # Errors
    /// Returns an error if a text exists but cannot be read.
    fn license_text(&self, license_id: &str) -> Result<Option<String>>;
}
