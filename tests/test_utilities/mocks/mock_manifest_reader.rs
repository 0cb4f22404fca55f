use pnpm_sbom::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock ManifestReader serving manifests registered per module directory
#[derive(Default)]
pub struct MockManifestReader {
    manifests: HashMap<PathBuf, PackageManifest>,
}

impl MockManifestReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `<dir>/package.json` with a name, a version and one license
    pub fn with_manifest(mut self, dir: &Path, name: &str, version: &str, license: &str) -> Self {
        let manifest = PackageManifest {
            name: Some(name.to_string()),
            version: Some(version.to_string()),
            licenses: [license.to_string()].into_iter().collect(),
            ..PackageManifest::default()
        };
        self.manifests.insert(dir.join("package.json"), manifest);
        self
    }
}

impl ManifestReader for MockManifestReader {
    fn read_manifest(&self, path: &Path) -> Result<PackageManifest> {
        self.manifests
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Manifest not found: {}", path.display()))
    }
}
