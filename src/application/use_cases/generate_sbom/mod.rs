use crate::adapters::outbound::pnpm::PnpmDependencyHandler;
use crate::application::dto::{SbomRequest, SbomResponse};
use crate::ports::outbound::{
    DependencyHandler, LicenseInfoResolver, LicenseTextProvider, ListingScope, ManifestReader,
    ModuleInfo, ModuleListingReader, ProgressReporter,
};
use crate::sbom_generation::domain::project::{
    qualify_scope, DEPENDENCIES_SCOPE, DEV_DEPENDENCIES_SCOPE,
};
use crate::sbom_generation::domain::{DependencyGraph, Project, ResolutionResult};
use crate::sbom_generation::services::{DependencyGraphBuilder, SpdxDocumentMapper};
use crate::shared::error::SbomError;
use crate::shared::security::canonical_path;
use crate::shared::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Document name used when neither the request nor the directory provides one
const FALLBACK_DOCUMENT_NAME: &str = "pnpm-workspace";

/// GenerateSbomUseCase - Core use case for SBOM generation
///
/// Lists the workspace once per listing scope, builds one dependency graph for
/// all projects, resolves projects and packages, and maps the result to an
/// SPDX document.
///
/// # Type Parameters
/// * `LR` - ModuleListingReader implementation
/// * `MR` - ManifestReader implementation
/// * `LIR` - LicenseInfoResolver implementation
/// * `LTP` - LicenseTextProvider implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<LR, MR, LIR, LTP, PR> {
    listing_reader: LR,
    manifest_reader: MR,
    license_info_resolver: LIR,
    license_text_provider: LTP,
    progress_reporter: PR,
}

impl<LR, MR, LIR, LTP, PR> GenerateSbomUseCase<LR, MR, LIR, LTP, PR>
where
    LR: ModuleListingReader,
    MR: ManifestReader,
    LIR: LicenseInfoResolver,
    LTP: LicenseTextProvider,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(
        listing_reader: LR,
        manifest_reader: MR,
        license_info_resolver: LIR,
        license_text_provider: LTP,
        progress_reporter: PR,
    ) -> Self {
        Self {
            listing_reader,
            manifest_reader,
            license_info_resolver,
            license_text_provider,
            progress_reporter,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// # Errors
    /// Fails on an invalid project path, a listing that cannot be produced,
    /// an unreadable project manifest, a package without name or version, or
    /// a failing license lookup. No partial document is returned.
    pub async fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        validate_project_path(&request.project_path)?;

        // Step 1: List the workspace per scope
        let production = self
            .list_modules(&request.project_path, ListingScope::Production)
            .await?;
        let development = self
            .list_modules(&request.project_path, ListingScope::Development)
            .await?;

        // Step 2: Workspace projects are the top-level entries of the listings
        let workspace_modules = workspace_modules(&production, &development);
        let mut handler = PnpmDependencyHandler::new(&self.manifest_reader);
        handler.set_workspace_module_dirs(workspace_modules.keys().cloned());

        // Step 3: Build one graph for all projects and scopes
        self.progress_reporter
            .report("📊 Building dependency graph...");
        let mut builder = DependencyGraphBuilder::new(&handler);
        let total = production.len() + development.len();
        let scoped = production
            .iter()
            .map(|module| (module, DEPENDENCIES_SCOPE))
            .chain(development.iter().map(|module| (module, DEV_DEPENDENCIES_SCOPE)));

        for (index, (module, scope)) in scoped.enumerate() {
            let project_id = handler.identifier_for(module)?;
            let scope_name = qualify_scope(&project_id, scope);
            builder.add_scope(&scope_name);

            for dependency in scope_roots(module, scope) {
                builder.add_dependency(&scope_name, dependency)?;
            }

            self.progress_reporter
                .report_progress(index + 1, total, Some(project_id.name()));
        }

        let graph = builder.build();
        let packages: Vec<_> = builder.packages().cloned().collect();
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} package(s) in {} graph node(s)",
            packages.len(),
            graph.node_count()
        ));

        // Step 4: Projects and issues
        let projects = self.create_projects(&handler, &workspace_modules, &request.project_path)?;
        let issue_count = self.report_issues(&graph);

        // Step 5: Map to SPDX
        let result = ResolutionResult::new(projects, packages, graph, request.excludes.clone());
        let mut params = request.document_params.clone();
        if params.document_name.trim().is_empty() {
            params.document_name = default_document_name(&request.project_path);
        }

        let document = SpdxDocumentMapper::map(
            &result,
            &self.license_info_resolver,
            &self.license_text_provider,
            &params,
        )?;

        self.progress_reporter.report(&format!(
            "📦 Document describes {} project(s) and {} package(s)",
            document.document_describes.len(),
            document.packages.len() - document.document_describes.len()
        ));

        Ok(SbomResponse::new(document, result.graph().clone(), issue_count))
    }

    async fn list_modules(&self, project_path: &Path, scope: ListingScope) -> Result<Vec<ModuleInfo>> {
        self.progress_reporter.report(&format!(
            "📖 Listing pnpm modules ({}) in: {}",
            scope.pnpm_flag(),
            project_path.display()
        ));

        let modules = self
            .listing_reader
            .list_modules(project_path, scope)
            .await?;

        self.progress_reporter
            .report(&format!("✅ Detected {} project(s)", modules.len()));
        Ok(modules)
    }

    fn create_projects<M: ManifestReader>(
        &self,
        handler: &PnpmDependencyHandler<M>,
        workspace_modules: &BTreeMap<PathBuf, &ModuleInfo>,
        project_path: &Path,
    ) -> Result<Vec<Project>> {
        workspace_modules
            .values()
            .map(|module| {
                handler.create_project(
                    module,
                    project_path,
                    &[DEPENDENCIES_SCOPE, DEV_DEPENDENCIES_SCOPE],
                )
            })
            .collect()
    }

    /// Reports every issue attached to the graph; returns how many there were
    fn report_issues(&self, graph: &DependencyGraph) -> usize {
        let mut count = 0;
        for (id, issues) in graph.issues() {
            for issue in issues {
                self.progress_reporter
                    .report_error(&format!("⚠️  Warning: {}: {}", id, issue));
                count += 1;
            }
        }
        count
    }
}

fn validate_project_path(project_path: &Path) -> Result<()> {
    let reason = if !project_path.exists() {
        Some("Path does not exist")
    } else if !project_path.is_dir() {
        Some("Path is not a directory")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SbomError::InvalidProjectPath {
            path: project_path.to_path_buf(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Top-level listing entries of both listings, keyed by directory
fn workspace_modules<'m>(
    production: &'m [ModuleInfo],
    development: &'m [ModuleInfo],
) -> BTreeMap<PathBuf, &'m ModuleInfo> {
    let mut modules = BTreeMap::new();
    for module in production.iter().chain(development) {
        modules.entry(module.path.clone()).or_insert(module);
    }
    modules
}

/// Direct dependencies of a project entry that belong to `scope`
fn scope_roots<'m>(module: &'m ModuleInfo, scope: &str) -> Vec<&'m ModuleInfo> {
    if scope == DEV_DEPENDENCIES_SCOPE {
        module.dev_dependencies.values().collect()
    } else {
        module
            .dependencies
            .values()
            .chain(module.optional_dependencies.values())
            .collect()
    }
}

fn default_document_name(project_path: &Path) -> String {
    canonical_path(project_path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_DOCUMENT_NAME.to_string())
}
