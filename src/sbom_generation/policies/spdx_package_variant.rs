use crate::sbom_generation::domain::Package;

/// How the origin of a package is represented in the SPDX document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpdxPackageVariant {
    /// A first-party project of the workspace
    Project,
    /// A dependency represented by its version control repository
    Vcs,
    /// A dependency represented by its source artifact
    Source,
    /// A dependency represented by its binary artifact only
    Binary,
}

impl SpdxPackageVariant {
    /// Selects the variant of a dependency package
    ///
    /// Priority: VCS, then the source artifact when there is no VCS URL or the
    /// VCS variant would have no analyzed files, then the binary artifact.
    ///
    /// # Arguments
    /// * `vcs_url` - Processed VCS URL of the package
    /// * `source_url` - Source artifact URL of the package
    /// * `has_files` - Whether file findings were collected for the package
    pub fn select(vcs_url: &str, source_url: &str, has_files: bool) -> Self {
        let has_vcs = !vcs_url.trim().is_empty();
        let has_source = !source_url.trim().is_empty();

        match (has_vcs, has_source) {
            (true, true) if !has_files => SpdxPackageVariant::Source,
            (true, _) => SpdxPackageVariant::Vcs,
            (false, true) => SpdxPackageVariant::Source,
            (false, false) => SpdxPackageVariant::Binary,
        }
    }

    pub fn for_package(package: &Package, has_files: bool) -> Self {
        Self::select(
            &package.vcs_processed().url,
            &package.source_artifact().url,
            has_files,
        )
    }

    /// Whether file findings are attached to packages of this variant
    pub fn attaches_files(&self) -> bool {
        !matches!(self, SpdxPackageVariant::Binary)
    }

    /// Suffix appended to the package's SPDX id
    pub fn id_suffix(&self) -> &'static str {
        match self {
            SpdxPackageVariant::Project | SpdxPackageVariant::Binary => "",
            SpdxPackageVariant::Vcs => "-vcs",
            SpdxPackageVariant::Source => "-source-artifact",
        }
    }
}
