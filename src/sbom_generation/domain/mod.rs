pub mod dependency_graph;
pub mod excludes;
pub mod identifier;
pub mod issue;
pub mod license_info;
pub mod package;
pub mod project;
pub mod resolution_result;
pub mod spdx;
pub mod vcs_info;

pub use dependency_graph::{DependencyEdge, DependencyGraph, DependencyNode, PackageLinkage};
pub use excludes::{Excludes, PathExclude, ScopeExclude};
pub use identifier::Identifier;
pub use issue::{Issue, Severity};
pub use license_info::{FileFinding, FindingOrigin, ProcessedDeclaredLicense};
pub use package::{Hash, HashAlgorithm, Package, PackageBuilder, RemoteArtifact};
pub use project::Project;
pub use resolution_result::ResolutionResult;
pub use spdx::SpdxDocument;
pub use vcs_info::{VcsInfo, VcsType};
