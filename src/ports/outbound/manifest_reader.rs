use crate::shared::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Repository declaration of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub vcs_type: String,
    pub url: String,
    pub directory: String,
}

/// The parts of a `package.json` needed to describe a project or package
///
/// Fields starting with an underscore in the manifest (`_resolved`, `_from`,
/// `_integrity`) are written by package managers on install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub licenses: BTreeSet<String>,
    pub authors: BTreeSet<String>,
    pub repository: Option<RepositoryInfo>,
    pub git_head: Option<String>,
    pub resolved: Option<String>,
    pub from: Option<String>,
    pub integrity: Option<String>,
}

/// ManifestReader port for reading package manifests
pub trait ManifestReader: Send + Sync {
    /// Reads and parses the manifest at `path`
    ///
    /// # Arguments
    /// * `path` - Path of a `package.json` file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    fn read_manifest(&self, path: &Path) -> Result<PackageManifest>;
}

impl<T: ManifestReader + ?Sized> ManifestReader for &T {
    fn read_manifest(&self, path: &Path) -> Result<PackageManifest> {
        (**self).read_manifest(path)
    }
}
