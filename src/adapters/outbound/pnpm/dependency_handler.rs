use super::urls::{expand_shorthand_url, fix_npm_download_url, split_from_specifier, split_namespace};
use crate::ports::outbound::{DependencyHandler, ManifestReader, ModuleInfo, PackageManifest};
use crate::sbom_generation::domain::{
    Hash, Identifier, Issue, Package, PackageLinkage, Project, RemoteArtifact, VcsInfo, VcsType,
};
use crate::sbom_generation::policies::DeclaredLicenseProcessor;
use crate::shared::security::canonical_path;
use crate::shared::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Type tag of workspace projects
pub const PROJECT_TYPE: &str = "PNPM";

/// Type tag of packages from the npm ecosystem
pub const PACKAGE_TYPE: &str = "NPM";

/// Version used when a package manifest does not declare one
pub const NON_EXISTING_VERSION: &str = "0.0.0-non-existing";

const MANIFEST_FILE: &str = "package.json";

/// PnpmDependencyHandler resolving entries of a pnpm module listing
///
/// A module is a workspace project iff its canonical directory is one of the
/// workspace module directories. Project versions come from the project's own
/// `package.json`; packages are built from the installed `package.json` of the
/// module.
pub struct PnpmDependencyHandler<M: ManifestReader> {
    manifest_reader: M,
    workspace_module_dirs: HashSet<PathBuf>,
}

impl<M: ManifestReader> PnpmDependencyHandler<M> {
    pub fn new(manifest_reader: M) -> Self {
        Self {
            manifest_reader,
            workspace_module_dirs: HashSet::new(),
        }
    }

    /// Replaces the set of directories holding workspace projects
    pub fn set_workspace_module_dirs(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.workspace_module_dirs = dirs.into_iter().map(|dir| canonical_path(&dir)).collect();
    }

    pub fn is_project(&self, module: &ModuleInfo) -> bool {
        self.workspace_module_dirs
            .contains(&canonical_path(&module.path))
    }

    /// Builds the project entity of a workspace module
    ///
    /// # Arguments
    /// * `module` - Top-level listing entry of the project
    /// * `analysis_root` - Directory the definition file path is made relative to
    /// * `scopes` - Unqualified scope names the project declares
    ///
    /// # Errors
    /// Returns an error if the project manifest cannot be read or the project
    /// has no name or version.
    pub fn create_project(
        &self,
        module: &ModuleInfo,
        analysis_root: &Path,
        scopes: &[&str],
    ) -> Result<Project> {
        let manifest_path = module.path.join(MANIFEST_FILE);
        let manifest = self.manifest_reader.read_manifest(&manifest_path)?;
        let id = project_identifier(module, &manifest);

        let definition_file_path = canonical_path(&manifest_path);
        let definition_file_path = definition_file_path
            .strip_prefix(canonical_path(analysis_root))
            .unwrap_or(&definition_file_path)
            .to_string_lossy()
            .replace('\\', "/");

        let processed = DeclaredLicenseProcessor::process(&manifest.licenses);
        let homepage = manifest.homepage.clone().unwrap_or_default();

        Ok(Project::new(id, definition_file_path)?
            .with_authors(manifest.authors.clone())
            .with_declared_licenses(manifest.licenses.clone(), processed)
            .with_description(manifest.description.clone().unwrap_or_default())
            .with_vcs(manifest_vcs(&manifest), homepage)
            .with_scopes(scopes.iter().copied()))
    }

    /// Package built from listing data alone, used when the installed
    /// manifest cannot be read
    fn package_from_module(&self, module: &ModuleInfo) -> Result<Package> {
        let download_url = module
            .resolved
            .as_deref()
            .map(|resolved| fix_npm_download_url(&expand_shorthand_url(resolved)))
            .unwrap_or_default();

        let source_artifact = if download_url.is_empty() {
            RemoteArtifact::empty()
        } else {
            RemoteArtifact::new(download_url, None)
        };

        Package::builder(self.external_identifier(module))
            .source_artifact(source_artifact)
            .build()
    }

    fn external_identifier(&self, module: &ModuleInfo) -> Identifier {
        let from = module
            .from
            .as_deref()
            .or(module.name.as_deref())
            .unwrap_or_default();
        let (namespace, name) = split_namespace(from);

        let version = module.version.as_deref().unwrap_or_default();
        let version = if version.starts_with("link:") || version.starts_with("file:") {
            ""
        } else {
            version
        };

        Identifier::new(PACKAGE_TYPE, namespace, name, version)
    }
}

impl<M: ManifestReader> DependencyHandler<ModuleInfo> for PnpmDependencyHandler<M> {
    fn identifier_for(&self, dependency: &ModuleInfo) -> Result<Identifier> {
        if !self.is_project(dependency) {
            return Ok(self.external_identifier(dependency));
        }

        let manifest = self
            .manifest_reader
            .read_manifest(&dependency.path.join(MANIFEST_FILE))?;
        Ok(project_identifier(dependency, &manifest))
    }

    fn dependencies_for<'a>(&self, dependency: &'a ModuleInfo) -> Vec<&'a ModuleInfo> {
        dependency
            .dependencies
            .values()
            .chain(dependency.optional_dependencies.values())
            .collect()
    }

    fn linkage_for(&self, dependency: &ModuleInfo) -> PackageLinkage {
        if self.is_project(dependency) {
            PackageLinkage::ProjectDynamic
        } else {
            PackageLinkage::Dynamic
        }
    }

    fn create_package(
        &self,
        dependency: &ModuleInfo,
        issues: &mut Vec<Issue>,
    ) -> Result<Option<Package>> {
        if self.is_project(dependency) {
            return Ok(None);
        }

        let manifest_path = dependency.path.join(MANIFEST_FILE);
        match self.manifest_reader.read_manifest(&manifest_path) {
            Ok(manifest) => package_from_manifest(dependency, &manifest, issues).map(Some),
            Err(e) => {
                issues.push(Issue::warning(
                    PROJECT_TYPE,
                    format!(
                        "Could not read the manifest of '{}' ({}); using listing data only.",
                        dependency.from.as_deref().unwrap_or_default(),
                        e.root_cause()
                    ),
                ));
                self.package_from_module(dependency).map(Some)
            }
        }
    }
}

fn project_identifier(module: &ModuleInfo, manifest: &PackageManifest) -> Identifier {
    let raw_name = manifest
        .name
        .as_deref()
        .or(module.name.as_deref())
        .unwrap_or_default();
    let (namespace, name) = split_namespace(raw_name);

    Identifier::new(
        PROJECT_TYPE,
        namespace,
        name,
        manifest.version.as_deref().unwrap_or_default(),
    )
}

/// VCS information declared in the `repository` and `gitHead` fields
fn manifest_vcs(manifest: &PackageManifest) -> VcsInfo {
    let Some(repository) = &manifest.repository else {
        return VcsInfo::empty();
    };

    let mut vcs = VcsInfo::from_url(&expand_shorthand_url(&repository.url));
    if !repository.vcs_type.is_empty() {
        vcs.vcs_type = VcsType::from_manifest_type(&repository.vcs_type);
    }
    if let Some(git_head) = &manifest.git_head {
        vcs.revision = git_head.clone();
    }
    if !repository.directory.is_empty() {
        vcs.path = repository.directory.clone();
    }
    vcs
}

/// Download URL from `_resolved` (or pnpm's `resolved`), falling back to a
/// shorthand in the version part of `_from`
fn download_url(module: &ModuleInfo, manifest: &PackageManifest) -> String {
    let resolved = manifest
        .resolved
        .as_deref()
        .or(module.resolved.as_deref())
        .filter(|resolved| !resolved.trim().is_empty());

    let expanded = match resolved {
        Some(resolved) => expand_shorthand_url(resolved),
        None => {
            let (_, version_part) = split_from_specifier(manifest.from.as_deref().unwrap_or_default());
            let expanded = expand_shorthand_url(version_part);
            if expanded != version_part {
                expanded
            } else {
                String::new()
            }
        }
    };

    fix_npm_download_url(&expanded)
}

fn package_from_manifest(
    module: &ModuleInfo,
    manifest: &PackageManifest,
    issues: &mut Vec<Issue>,
) -> Result<Package> {
    let (namespace, name) = split_namespace(manifest.name.as_deref().unwrap_or_default());
    let version = manifest.version.as_deref().unwrap_or(NON_EXISTING_VERSION);
    let id = Identifier::new(PACKAGE_TYPE, namespace, name, version);

    if manifest.version.is_none() {
        issues.push(Issue::warning(
            PROJECT_TYPE,
            format!(
                "Package '{}' declares no version; using '{}'.",
                name, NON_EXISTING_VERSION
            ),
        ));
    }

    let processed = DeclaredLicenseProcessor::process(&manifest.licenses);
    for unmapped in &processed.unmapped {
        issues.push(Issue::hint(
            PROJECT_TYPE,
            format!(
                "Declared license '{}' of '{}' is not an SPDX expression.",
                unmapped, name
            ),
        ));
    }

    let download_url = download_url(module, manifest);
    let vcs_from_download = VcsInfo::from_url(&download_url);
    let mut vcs = manifest_vcs(manifest);
    if vcs_from_download.url != download_url {
        vcs = vcs_from_download.merge(&vcs);
    }

    let hash = manifest.integrity.as_deref().and_then(Hash::from_integrity);
    let source_url = vcs_from_download
        .archive_download_url()
        .unwrap_or(download_url);
    let source_artifact = if source_url.is_empty() {
        RemoteArtifact::empty()
    } else {
        RemoteArtifact::new(source_url, hash)
    };

    Package::builder(id)
        .authors(manifest.authors.clone())
        .declared_licenses(manifest.licenses.clone(), processed)
        .description(manifest.description.clone().unwrap_or_default())
        .homepage_url(manifest.homepage.clone().unwrap_or_default())
        .binary_artifact(RemoteArtifact::empty())
        .source_artifact(source_artifact)
        .vcs(vcs)
        .build()
}
