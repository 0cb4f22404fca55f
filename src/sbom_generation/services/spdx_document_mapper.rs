use super::sbom_generator::SbomGenerator;
use crate::ports::outbound::{LicenseInfoResolver, LicenseTextProvider};
use crate::sbom_generation::domain::spdx::{
    sanitize_spdx_id, SpdxChecksum, SpdxCreationInfo, SpdxExternalReference,
    SpdxExtractedLicenseInfo, SpdxFile, SpdxPackage, SpdxRelationship, SpdxRelationshipType,
    DATA_LICENSE, DOCUMENT_SPDX_ID, NOASSERTION, NONE, SPDX_VERSION,
};
use crate::sbom_generation::domain::{
    FileFinding, FindingOrigin, Identifier, Package, Project, RemoteArtifact, ResolutionResult,
    SpdxDocument, VcsInfo,
};
use crate::sbom_generation::policies::{DeclaredLicenseProcessor, SpdxPackageVariant};
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Allocates file indices for one mapping call
///
/// Indices are unique across all projects and packages of a document.
#[derive(Debug, Default)]
pub struct FileIndexCounter {
    next: AtomicUsize,
}

impl FileIndexCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next index, starting at 1
    pub fn next_index(&self) -> usize {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of indices handed out so far
    pub fn allocated(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

/// Document level settings of the generated SPDX document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpdxDocumentParams {
    pub document_name: String,
    pub document_comment: String,
    pub creation_info_comment: String,
    pub creation_info_person: String,
    pub creation_info_organization: String,
    pub file_information_enabled: bool,
}

/// SpdxDocumentMapper service turning a resolution result into an SPDX document
///
/// The output is deterministic for equal inputs, except for the document
/// namespace and the creation timestamp.
pub struct SpdxDocumentMapper;

struct MappedEntity<'r> {
    id: &'r Identifier,
    spdx_id: String,
    findings: Vec<FileFinding>,
    variant: SpdxPackageVariant,
}

impl SpdxDocumentMapper {
    /// Maps `result` to an SPDX document
    ///
    /// # Arguments
    /// * `result` - Projects, packages, graph and excludes of the analyzed workspace
    /// * `license_info_resolver` - Source of file findings and concluded licenses
    /// * `license_text_provider` - Source of texts for `LicenseRef-` licenses
    /// * `params` - Document name, comments and creator information
    ///
    /// # Errors
    /// Any failing lookup aborts the mapping; no partial document is returned.
    pub fn map(
        result: &ResolutionResult,
        license_info_resolver: &dyn LicenseInfoResolver,
        license_text_provider: &dyn LicenseTextProvider,
        params: &SpdxDocumentParams,
    ) -> Result<SpdxDocument> {
        let counter = FileIndexCounter::new();

        let projects = result.projects(true, false);
        let packages = result.packages(true);

        let mut project_entities = Vec::with_capacity(projects.len());
        for project in &projects {
            let findings = Self::findings_for(
                license_info_resolver,
                project.id(),
                FindingOrigin::Vcs,
                params,
            )?;
            project_entities.push(MappedEntity {
                id: project.id(),
                spdx_id: project_spdx_id(project.id()),
                findings,
                variant: SpdxPackageVariant::Project,
            });
        }

        let mut package_entities = Vec::with_capacity(packages.len());
        for package in &packages {
            let findings = Self::findings_for(
                license_info_resolver,
                package.id(),
                FindingOrigin::Artifact,
                params,
            )?;
            let variant = SpdxPackageVariant::for_package(package, !findings.is_empty());
            package_entities.push(MappedEntity {
                id: package.id(),
                spdx_id: package_spdx_id(package.id(), variant),
                findings,
                variant,
            });
        }

        Self::make_ids_unique(&mut project_entities, &mut package_entities);

        let element_ids: BTreeMap<&Identifier, &str> = project_entities
            .iter()
            .chain(package_entities.iter())
            .map(|entity| (entity.id, entity.spdx_id.as_str()))
            .collect();

        let mut spdx_packages = Vec::new();
        let mut spdx_files = Vec::new();
        let mut relationships = Vec::new();

        for (project, entity) in projects.iter().zip(&project_entities) {
            let files = Self::map_files(&entity.findings, &counter);
            let spdx_package = Self::map_project(project, entity, &files, license_info_resolver);
            relationships.extend(Self::depends_on(result, entity, &element_ids));
            spdx_packages.push(spdx_package);
            spdx_files.extend(files);
        }

        for (package, entity) in packages.iter().zip(&package_entities) {
            let files = if entity.variant.attaches_files() {
                Self::map_files(&entity.findings, &counter)
            } else {
                Vec::new()
            };
            let spdx_package = Self::map_package(package, entity, &files, license_info_resolver);
            relationships.extend(Self::depends_on(result, entity, &element_ids));
            spdx_packages.push(spdx_package);
            spdx_files.extend(files);
        }

        relationships.sort();

        let metadata = SbomGenerator::generate_default_metadata();
        let mut creators = Vec::new();
        if !params.creation_info_person.trim().is_empty() {
            creators.push(format!("Person: {}", params.creation_info_person.trim()));
        }
        if !params.creation_info_organization.trim().is_empty() {
            creators.push(format!(
                "Organization: {}",
                params.creation_info_organization.trim()
            ));
        }
        creators.push(metadata.tool_creator().to_string());

        let extracted_licenses =
            Self::extract_license_infos(&spdx_packages, &spdx_files, license_text_provider)?;

        Ok(SpdxDocument {
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            spdx_version: SPDX_VERSION.to_string(),
            data_license: DATA_LICENSE.to_string(),
            name: params.document_name.clone(),
            document_namespace: metadata.document_namespace().to_string(),
            comment: params.document_comment.clone(),
            creation_info: SpdxCreationInfo {
                comment: params.creation_info_comment.clone(),
                created: metadata.created().to_string(),
                creators,
                license_list_version: String::new(),
            },
            document_describes: project_entities
                .iter()
                .map(|entity| entity.spdx_id.clone())
                .collect(),
            packages: spdx_packages,
            files: spdx_files,
            relationships,
            has_extracted_licensing_infos: extracted_licenses,
        })
    }

    /// Sanitizing can map different identifiers to the same SPDX id, e.g.
    /// `@types/node` and `types-node`. Later duplicates get `-2`, `-3`, ...
    fn make_ids_unique<'a>(projects: &mut [MappedEntity<'a>], packages: &mut [MappedEntity<'a>]) {
        let mut taken: HashSet<String> = projects
            .iter()
            .chain(packages.iter())
            .map(|entity| entity.spdx_id.clone())
            .collect();
        let mut seen = HashSet::new();

        for entity in projects.iter_mut().chain(packages.iter_mut()) {
            if seen.insert(entity.spdx_id.clone()) {
                continue;
            }

            let mut suffix = 2;
            let unique = loop {
                let candidate = format!("{}-{}", entity.spdx_id, suffix);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
                suffix += 1;
            };
            seen.insert(unique.clone());
            entity.spdx_id = unique;
        }
    }

    fn findings_for(
        resolver: &dyn LicenseInfoResolver,
        id: &Identifier,
        origin: FindingOrigin,
        params: &SpdxDocumentParams,
    ) -> Result<Vec<FileFinding>> {
        if !params.file_information_enabled {
            return Ok(Vec::new());
        }
        resolver.file_findings(id, origin)
    }

    fn map_files(findings: &[FileFinding], counter: &FileIndexCounter) -> Vec<SpdxFile> {
        findings
            .iter()
            .map(|finding| SpdxFile {
                spdx_id: format!("SPDXRef-File-{}", counter.next_index()),
                file_name: format!("./{}", finding.path.trim_start_matches("./")),
                checksums: finding
                    .sha1
                    .iter()
                    .map(|sha1| SpdxChecksum {
                        algorithm: "SHA1".to_string(),
                        checksum_value: sha1.to_lowercase(),
                    })
                    .collect(),
                license_concluded: NOASSERTION.to_string(),
                license_info_in_files: non_empty_or(&finding.licenses, NONE),
                copyright_text: join_or(&finding.copyrights, NONE),
            })
            .collect()
    }

    fn map_project(
        project: &Project,
        entity: &MappedEntity<'_>,
        files: &[SpdxFile],
        resolver: &dyn LicenseInfoResolver,
    ) -> SpdxPackage {
        let mut spdx_package = Self::base_package(
            project.id(),
            &entity.spdx_id,
            files,
            resolver,
            project.declared_licenses_processed().spdx_expression.as_deref(),
        );
        spdx_package.download_location = vcs_download_location(project.vcs_processed());
        spdx_package.homepage = project.homepage_url().to_string();
        spdx_package.supplier = supplier(project.authors());
        spdx_package.summary = project.description().to_string();
        spdx_package
    }

    fn map_package(
        package: &Package,
        entity: &MappedEntity<'_>,
        files: &[SpdxFile],
        resolver: &dyn LicenseInfoResolver,
    ) -> SpdxPackage {
        let mut spdx_package = Self::base_package(
            package.id(),
            &entity.spdx_id,
            files,
            resolver,
            package.declared_licenses_processed().spdx_expression.as_deref(),
        );

        match entity.variant {
            SpdxPackageVariant::Vcs => {
                spdx_package.download_location = vcs_download_location(package.vcs_processed());
            }
            SpdxPackageVariant::Source => {
                apply_artifact(&mut spdx_package, package.source_artifact());
            }
            SpdxPackageVariant::Binary | SpdxPackageVariant::Project => {
                apply_artifact(&mut spdx_package, package.binary_artifact());
            }
        }

        spdx_package
            .external_refs
            .push(SpdxExternalReference::purl(package.id().to_purl()));
        spdx_package.homepage = package.homepage_url().to_string();
        spdx_package.supplier = supplier(package.authors());
        spdx_package.summary = package.description().to_string();
        spdx_package
    }

    fn base_package(
        id: &Identifier,
        spdx_id: &str,
        files: &[SpdxFile],
        resolver: &dyn LicenseInfoResolver,
        declared_expression: Option<&str>,
    ) -> SpdxPackage {
        let files_analyzed = !files.is_empty();

        let (license_info_from_files, copyright_text) = if files_analyzed {
            let licenses: BTreeSet<String> = files
                .iter()
                .flat_map(|file| file.license_info_in_files.iter().cloned())
                .filter(|license| license != NONE)
                .collect();
            let copyrights: BTreeSet<String> = files
                .iter()
                .filter(|file| file.copyright_text != NONE)
                .map(|file| file.copyright_text.clone())
                .collect();
            (non_empty_or(&licenses, NONE), join_or(&copyrights, NONE))
        } else {
            (Vec::new(), NOASSERTION.to_string())
        };

        SpdxPackage {
            spdx_id: spdx_id.to_string(),
            name: full_name(id),
            version_info: id.version().to_string(),
            download_location: NOASSERTION.to_string(),
            files_analyzed,
            has_files: files.iter().map(|file| file.spdx_id.clone()).collect(),
            checksums: Vec::new(),
            external_refs: Vec::new(),
            homepage: String::new(),
            supplier: String::new(),
            summary: String::new(),
            license_concluded: resolver
                .concluded_license(id)
                .filter(|license| !license.trim().is_empty())
                .unwrap_or_else(|| NOASSERTION.to_string()),
            license_declared: declared_expression
                .map(str::to_string)
                .unwrap_or_else(|| NOASSERTION.to_string()),
            license_info_from_files,
            copyright_text,
        }
    }

    /// One DEPENDS_ON relationship per direct, non-excluded dependency that is
    /// represented in the document
    fn depends_on(
        result: &ResolutionResult,
        entity: &MappedEntity<'_>,
        element_ids: &BTreeMap<&Identifier, &str>,
    ) -> Vec<SpdxRelationship> {
        result
            .dependencies(entity.id, true)
            .into_iter()
            .filter_map(|dependency| element_ids.get(dependency))
            .map(|related| SpdxRelationship {
                spdx_element_id: entity.spdx_id.clone(),
                relationship_type: SpdxRelationshipType::DependsOn,
                related_spdx_element: related.to_string(),
            })
            .collect()
    }

    fn extract_license_infos(
        packages: &[SpdxPackage],
        files: &[SpdxFile],
        provider: &dyn LicenseTextProvider,
    ) -> Result<Vec<SpdxExtractedLicenseInfo>> {
        let expressions = packages
            .iter()
            .flat_map(|package| {
                [&package.license_concluded, &package.license_declared]
                    .into_iter()
                    .chain(package.license_info_from_files.iter())
            })
            .chain(files.iter().flat_map(|file| {
                std::iter::once(&file.license_concluded).chain(file.license_info_in_files.iter())
            }));

        let license_refs: BTreeSet<String> = expressions
            .filter(|expression| expression.contains("LicenseRef-"))
            .flat_map(|expression| DeclaredLicenseProcessor::license_refs(expression))
            .collect();

        let mut infos = Vec::new();
        for license_id in license_refs {
            let text = provider
                .license_text(&license_id)
                .map_err(|e| SbomError::LicenseTextError {
                    license_id: license_id.clone(),
                    details: e.to_string(),
                })?;

            if let Some(extracted_text) = text {
                infos.push(SpdxExtractedLicenseInfo {
                    name: license_id.trim_start_matches("LicenseRef-").to_string(),
                    license_id,
                    extracted_text,
                });
            }
        }

        Ok(infos)
    }
}

/// SPDX id of a project package
pub fn project_spdx_id(id: &Identifier) -> String {
    format!("SPDXRef-Project-{}", sanitize_spdx_id(&id.coordinates()))
}

/// SPDX id of a dependency package in the given variant
pub fn package_spdx_id(id: &Identifier, variant: SpdxPackageVariant) -> String {
    format!(
        "SPDXRef-Package-{}{}",
        sanitize_spdx_id(&id.coordinates()),
        variant.id_suffix()
    )
}

fn full_name(id: &Identifier) -> String {
    if id.namespace().is_empty() {
        id.name().to_string()
    } else {
        format!("{}/{}", id.namespace(), id.name())
    }
}

fn supplier(authors: &BTreeSet<String>) -> String {
    if authors.is_empty() {
        String::new()
    } else {
        format!(
            "Person: {}",
            authors.iter().cloned().collect::<Vec<_>>().join(", ")
        )
    }
}

/// SPDX download location for a VCS, e.g. `git+https://host/repo.git@rev#path`
fn vcs_download_location(vcs: &VcsInfo) -> String {
    if vcs.is_empty() {
        return NOASSERTION.to_string();
    }

    let mut location = match vcs.vcs_type.spdx_tool() {
        Some(tool) => format!("{}+{}", tool, vcs.url),
        None => vcs.url.clone(),
    };
    if !vcs.revision.trim().is_empty() {
        location.push('@');
        location.push_str(&vcs.revision);
    }
    if !vcs.path.trim().is_empty() {
        location.push('#');
        location.push_str(&vcs.path);
    }
    location
}

fn apply_artifact(spdx_package: &mut SpdxPackage, artifact: &RemoteArtifact) {
    spdx_package.download_location = if artifact.is_empty() {
        NOASSERTION.to_string()
    } else {
        artifact.url.clone()
    };
    spdx_package.checksums = artifact
        .hash
        .iter()
        .map(|hash| SpdxChecksum {
            algorithm: hash.algorithm().spdx_name().to_string(),
            checksum_value: hash.value().to_string(),
        })
        .collect();
}

fn non_empty_or(values: &BTreeSet<String>, fallback: &str) -> Vec<String> {
    if values.is_empty() {
        vec![fallback.to_string()]
    } else {
        values.iter().cloned().collect()
    }
}

fn join_or(values: &BTreeSet<String>, fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}
