//! pnpm-sbom - SPDX 2.2 SBOM generation for pnpm workspaces
//!
//! This library builds one deduplicated dependency graph for all projects of a
//! pnpm workspace and maps it to an SPDX 2.2 document, following hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pnpm_sbom::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! // Create use case with adapters
//! let use_case = GenerateSbomUseCase::new(
//!     PnpmCommandListingReader::new(),
//!     FileSystemReader::new(),
//!     FindingsStore::empty(),
//!     DirectoryLicenseTextProvider::new(vec![]),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = SbomRequest::builder().project_path(".").build()?;
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let output = SpdxJsonFormatter::new().format(&response.document)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{SpdxJsonFormatter, SpdxYamlFormatter};
    pub use crate::adapters::outbound::licenses::{DirectoryLicenseTextProvider, FindingsStore};
    pub use crate::adapters::outbound::pnpm::{
        JsonFileListingReader, PnpmCommandListingReader, PnpmDependencyHandler,
    };
    pub use crate::application::dto::{OutputFormat, SbomRequest, SbomResponse};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        DependencyHandler, LicenseInfoResolver, LicenseTextProvider, ListingScope, ManifestReader,
        ModuleInfo, ModuleListingReader, OutputPresenter, PackageManifest, ProgressReporter,
        SbomFormatter,
    };
    pub use crate::sbom_generation::domain::spdx::{SpdxPackage, SpdxRelationshipType};
    pub use crate::sbom_generation::domain::{
        DependencyGraph, Excludes, FileFinding, FindingOrigin, Identifier, Package, PathExclude,
        Project, ScopeExclude, SpdxDocument,
    };
    pub use crate::sbom_generation::services::{
        package_spdx_id, project_spdx_id, DependencyGraphBuilder, SpdxDocumentMapper,
        SpdxDocumentParams,
    };
    pub use crate::shared::Result;
}
