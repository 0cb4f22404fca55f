use super::{Identifier, ProcessedDeclaredLicense, VcsInfo};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for package names (security limit)
pub(super) const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
pub(super) const MAX_VERSION_LENGTH: usize = 255;

/// Hash algorithms that can appear in an npm integrity string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    fn from_sri_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_lowercase().as_str() {
            "md5" => Some(HashAlgorithm::Md5),
            "sha1" => Some(HashAlgorithm::Sha1),
            "sha256" => Some(HashAlgorithm::Sha256),
            "sha384" => Some(HashAlgorithm::Sha384),
            "sha512" => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Algorithm name as used by SPDX checksums
    pub fn spdx_name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spdx_name())
    }
}

/// Hash value object with a hex encoded digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    algorithm: HashAlgorithm,
    value: String,
}

impl Hash {
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into().to_lowercase(),
        }
    }

    /// Parses a subresource integrity string like `sha512-<base64>`
    ///
    /// Only the first entry of a space separated list is used. Returns `None`
    /// for empty, unknown or undecodable values.
    pub fn from_integrity(integrity: &str) -> Option<Self> {
        let first = integrity.split_whitespace().next()?;
        let (prefix, encoded) = first.split_once('-')?;
        let algorithm = HashAlgorithm::from_sri_prefix(prefix)?;
        let digest = base64::decode(encoded).ok()?;

        Some(Self::new(algorithm, hex::encode(digest)))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Location of a downloadable artifact plus its optional hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RemoteArtifact {
    pub url: String,
    pub hash: Option<Hash>,
}

impl RemoteArtifact {
    pub fn new(url: impl Into<String>, hash: Option<Hash>) -> Self {
        Self {
            url: url.into(),
            hash,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// Package entity representing an external (non-workspace) dependency
///
/// A package is created at most once per identifier during graph building and
/// is treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    id: Identifier,
    authors: BTreeSet<String>,
    declared_licenses: BTreeSet<String>,
    declared_licenses_processed: ProcessedDeclaredLicense,
    description: String,
    homepage_url: String,
    binary_artifact: RemoteArtifact,
    source_artifact: RemoteArtifact,
    vcs: VcsInfo,
    vcs_processed: VcsInfo,
}

impl Package {
    pub fn builder(id: Identifier) -> PackageBuilder {
        PackageBuilder::new(id)
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn authors(&self) -> &BTreeSet<String> {
        &self.authors
    }

    pub fn declared_licenses(&self) -> &BTreeSet<String> {
        &self.declared_licenses
    }

    pub fn declared_licenses_processed(&self) -> &ProcessedDeclaredLicense {
        &self.declared_licenses_processed
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn homepage_url(&self) -> &str {
        &self.homepage_url
    }

    pub fn binary_artifact(&self) -> &RemoteArtifact {
        &self.binary_artifact
    }

    pub fn source_artifact(&self) -> &RemoteArtifact {
        &self.source_artifact
    }

    pub fn vcs(&self) -> &VcsInfo {
        &self.vcs
    }

    pub fn vcs_processed(&self) -> &VcsInfo {
        &self.vcs_processed
    }
}

/// Builder for [`Package`] enforcing the non-empty name and version invariant
#[derive(Debug)]
pub struct PackageBuilder {
    id: Identifier,
    authors: BTreeSet<String>,
    declared_licenses: BTreeSet<String>,
    declared_licenses_processed: ProcessedDeclaredLicense,
    description: String,
    homepage_url: String,
    binary_artifact: RemoteArtifact,
    source_artifact: RemoteArtifact,
    vcs: VcsInfo,
    vcs_processed: Option<VcsInfo>,
}

impl PackageBuilder {
    fn new(id: Identifier) -> Self {
        Self {
            id,
            authors: BTreeSet::new(),
            declared_licenses: BTreeSet::new(),
            declared_licenses_processed: ProcessedDeclaredLicense::default(),
            description: String::new(),
            homepage_url: String::new(),
            binary_artifact: RemoteArtifact::empty(),
            source_artifact: RemoteArtifact::empty(),
            vcs: VcsInfo::empty(),
            vcs_processed: None,
        }
    }

    pub fn authors(mut self, authors: BTreeSet<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn declared_licenses(
        mut self,
        declared: BTreeSet<String>,
        processed: ProcessedDeclaredLicense,
    ) -> Self {
        self.declared_licenses = declared;
        self.declared_licenses_processed = processed;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn homepage_url(mut self, homepage_url: impl Into<String>) -> Self {
        self.homepage_url = homepage_url.into();
        self
    }

    pub fn binary_artifact(mut self, artifact: RemoteArtifact) -> Self {
        self.binary_artifact = artifact;
        self
    }

    pub fn source_artifact(mut self, artifact: RemoteArtifact) -> Self {
        self.source_artifact = artifact;
        self
    }

    pub fn vcs(mut self, vcs: VcsInfo) -> Self {
        self.vcs = vcs;
        self
    }

    /// Overrides the processed VCS info; defaults to `vcs` normalized against the homepage
    pub fn vcs_processed(mut self, vcs_processed: VcsInfo) -> Self {
        self.vcs_processed = Some(vcs_processed);
        self
    }

    pub fn build(self) -> Result<Package> {
        validate_component("Package", "name", self.id.name(), MAX_PACKAGE_NAME_LENGTH, &self.id)?;
        validate_component("Package", "version", self.id.version(), MAX_VERSION_LENGTH, &self.id)?;

        let vcs_processed = self
            .vcs_processed
            .unwrap_or_else(|| self.vcs.normalized(&self.homepage_url));

        Ok(Package {
            id: self.id,
            authors: self.authors,
            declared_licenses: self.declared_licenses,
            declared_licenses_processed: self.declared_licenses_processed,
            description: self.description,
            homepage_url: self.homepage_url,
            binary_artifact: self.binary_artifact,
            source_artifact: self.source_artifact,
            vcs: self.vcs,
            vcs_processed,
        })
    }
}

/// Checks one identifier component of a package or project
pub(super) fn validate_component(
    entity: &str,
    field: &str,
    value: &str,
    max_length: usize,
    id: &Identifier,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SbomError::Validation {
            message: format!("{} {} cannot be empty (identifier '{}')", entity, field, id),
        }
        .into());
    }

    // Security: Length limit to prevent DoS
    if value.len() > max_length {
        return Err(SbomError::Validation {
            message: format!(
                "{} {} is too long ({} bytes). Maximum allowed: {} bytes",
                entity,
                field,
                value.len(),
                max_length
            ),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::VcsType;

    fn npm_id(name: &str, version: &str) -> Identifier {
        Identifier::new("NPM", "", name, version)
    }

    #[test]
    fn test_package_builder_valid() {
        let package = Package::builder(npm_id("lodash", "4.17.21"))
            .description("Lodash modular utilities.")
            .homepage_url("https://lodash.com/")
            .build()
            .unwrap();

        assert_eq!(package.id().name(), "lodash");
        assert_eq!(package.description(), "Lodash modular utilities.");
        assert!(package.binary_artifact().is_empty());
    }

    #[test]
    fn test_package_builder_empty_name_and_version() {
        let result = Package::builder(npm_id("", "")).build();
        assert!(result.unwrap_err().to_string().contains("name cannot be empty"));
    }

    #[test]
    fn test_package_builder_empty_version() {
        let result = Package::builder(npm_id("lodash", "")).build();
        assert!(result.unwrap_err().to_string().contains("version cannot be empty"));
    }

    #[test]
    fn test_package_builder_name_too_long() {
        let long_name = "a".repeat(MAX_PACKAGE_NAME_LENGTH + 1);
        let result = Package::builder(npm_id(&long_name, "1.0.0")).build();
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_package_builder_derives_processed_vcs() {
        let package = Package::builder(npm_id("repo", "1.0.0"))
            .vcs(VcsInfo::new(
                VcsType::Unknown,
                "git+https://github.com/owner/repo",
                "",
                "",
            ))
            .build()
            .unwrap();

        assert_eq!(package.vcs_processed().url, "https://github.com/owner/repo.git");
        assert_eq!(package.vcs_processed().vcs_type, VcsType::Git);
    }

    #[test]
    fn test_hash_from_integrity_sha512() {
        // sha512 of the empty string
        let integrity = "sha512-z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg/SpIdNs6c5H0NE8XYXysP+DGNKHfuwvY7kxvUdBeoGlODJ6+SfaPg==";
        let hash = Hash::from_integrity(integrity).unwrap();
        assert_eq!(hash.algorithm(), HashAlgorithm::Sha512);
        assert!(hash.value().starts_with("cf83e1357eefb8bd"));
        assert_eq!(hash.value().len(), 128);
    }

    #[test]
    fn test_hash_from_integrity_takes_first_entry() {
        let integrity = "sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk= sha512-invalid";
        let hash = Hash::from_integrity(integrity).unwrap();
        assert_eq!(hash.algorithm(), HashAlgorithm::Sha1);
        assert_eq!(hash.value(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_hash_from_integrity_invalid() {
        assert!(Hash::from_integrity("").is_none());
        assert!(Hash::from_integrity("whirlpool-abc").is_none());
        assert!(Hash::from_integrity("sha1-***").is_none());
    }
}
