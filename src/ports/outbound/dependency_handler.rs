use crate::sbom_generation::domain::{Identifier, Issue, Package, PackageLinkage};
use crate::shared::Result;

/// DependencyHandler port resolving raw dependency references of a package manager
///
/// The dependency graph builder is generic over this trait so that the graph
/// algorithm does not depend on the shape of a particular listing format.
/// `D` is the raw reference type, e.g. one entry of a module listing.
pub trait DependencyHandler<D> {
    /// Computes the stable identifier of a reference
    ///
    /// # Errors
    /// Returns an error if the identifier cannot be derived, e.g. when the
    /// manifest of a workspace project cannot be read.
    fn identifier_for(&self, dependency: &D) -> Result<Identifier>;

    /// Direct child references of `dependency`
    fn dependencies_for<'a>(&self, dependency: &'a D) -> Vec<&'a D>;

    /// Whether `dependency` is an external package or a workspace project
    fn linkage_for(&self, dependency: &D) -> PackageLinkage;

    /// Creates the package for an external reference
    ///
    /// Returns `Ok(None)` for workspace projects. Recoverable anomalies are
    /// pushed to `issues` instead of failing.
    ///
    /// # Errors
    /// Returns an error if the package cannot be constructed, e.g. because its
    /// name or version is empty.
    fn create_package(&self, dependency: &D, issues: &mut Vec<Issue>) -> Result<Option<Package>>;
}
