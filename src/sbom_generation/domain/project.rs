use super::package::{validate_component, MAX_PACKAGE_NAME_LENGTH, MAX_VERSION_LENGTH};
use super::{Identifier, ProcessedDeclaredLicense, VcsInfo};
use crate::shared::Result;
use std::collections::BTreeSet;

/// Scope holding required and optional runtime dependencies
pub const DEPENDENCIES_SCOPE: &str = "dependencies";

/// Scope holding development dependencies
pub const DEV_DEPENDENCIES_SCOPE: &str = "devDependencies";

/// Builds the qualified scope name `namespace:name:version:scope` for a project
pub fn qualify_scope(project_id: &Identifier, scope: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        project_id.namespace(),
        project_id.name(),
        project_id.version(),
        scope
    )
}

/// Inverse of [`qualify_scope`], returning the unqualified scope name
pub fn unqualified_scope(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// Project entity: a first-party module of the analyzed workspace
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: Identifier,
    definition_file_path: String,
    authors: BTreeSet<String>,
    declared_licenses: BTreeSet<String>,
    declared_licenses_processed: ProcessedDeclaredLicense,
    description: String,
    homepage_url: String,
    vcs: VcsInfo,
    vcs_processed: VcsInfo,
    scope_names: BTreeSet<String>,
}

impl Project {
    /// Creates a project with the given identifier
    ///
    /// # Arguments
    /// * `id` - Identifier of the project; name and version must not be empty
    /// * `definition_file_path` - Path of the `package.json`, relative to the analysis root
    ///
    /// # Errors
    /// Returns a validation error when the project name or version is empty.
    pub fn new(id: Identifier, definition_file_path: impl Into<String>) -> Result<Self> {
        validate_component("Project", "name", id.name(), MAX_PACKAGE_NAME_LENGTH, &id)?;
        validate_component("Project", "version", id.version(), MAX_VERSION_LENGTH, &id)?;

        Ok(Self {
            id,
            definition_file_path: definition_file_path.into(),
            authors: BTreeSet::new(),
            declared_licenses: BTreeSet::new(),
            declared_licenses_processed: ProcessedDeclaredLicense::default(),
            description: String::new(),
            homepage_url: String::new(),
            vcs: VcsInfo::empty(),
            vcs_processed: VcsInfo::empty(),
            scope_names: BTreeSet::new(),
        })
    }

    pub fn with_authors(mut self, authors: BTreeSet<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_declared_licenses(
        mut self,
        declared: BTreeSet<String>,
        processed: ProcessedDeclaredLicense,
    ) -> Self {
        self.declared_licenses = declared;
        self.declared_licenses_processed = processed;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets homepage and VCS; the processed VCS falls back to the homepage
    pub fn with_vcs(mut self, vcs: VcsInfo, homepage_url: impl Into<String>) -> Self {
        self.homepage_url = homepage_url.into();
        self.vcs_processed = vcs.normalized(&self.homepage_url);
        self.vcs = vcs;
        self
    }

    /// Registers the qualified names of the given unqualified scopes
    pub fn with_scopes<'a>(mut self, scopes: impl IntoIterator<Item = &'a str>) -> Self {
        for scope in scopes {
            self.scope_names.insert(qualify_scope(&self.id, scope));
        }
        self
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn definition_file_path(&self) -> &str {
        &self.definition_file_path
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

    pub fn vcs(&self) -> &VcsInfo {
        &self.vcs
    }

    pub fn vcs_processed(&self) -> &VcsInfo {
        &self.vcs_processed
    }

    /// Qualified scope names of this project
    pub fn scope_names(&self) -> &BTreeSet<String> {
        &self.scope_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_id() -> Identifier {
        Identifier::new("PNPM", "@acme", "web", "1.2.0")
    }

    #[test]
    fn test_project_new_requires_name() {
        let id = Identifier::new("PNPM", "", "", "1.0.0");
        let result = Project::new(id, "package.json");
        assert!(result.unwrap_err().to_string().contains("Project name cannot be empty"));
    }

    #[test]
    fn test_project_new_requires_version() {
        let id = Identifier::new("PNPM", "", "app", "");
        let result = Project::new(id, "package.json");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Project version cannot be empty"));
    }

    #[test]
    fn test_with_scopes_qualifies_names() {
        let project = Project::new(project_id(), "apps/web/package.json")
            .unwrap()
            .with_scopes([DEPENDENCIES_SCOPE, DEV_DEPENDENCIES_SCOPE]);

        let scopes: Vec<&String> = project.scope_names().iter().collect();
        assert_eq!(
            scopes,
            vec!["@acme:web:1.2.0:dependencies", "@acme:web:1.2.0:devDependencies"]
        );
    }

    #[test]
    fn test_unqualified_scope() {
        let qualified = qualify_scope(&project_id(), DEV_DEPENDENCIES_SCOPE);
        assert_eq!(unqualified_scope(&qualified), "devDependencies");
        assert_eq!(unqualified_scope("dependencies"), "dependencies");
    }

    #[test]
    fn test_with_vcs_falls_back_to_homepage() {
        let project = Project::new(project_id(), "apps/web/package.json")
            .unwrap()
            .with_vcs(VcsInfo::empty(), "https://github.com/acme/monorepo#readme");

        assert_eq!(
            project.vcs_processed().url,
            "https://github.com/acme/monorepo.git"
        );
        assert!(project.vcs().is_empty());
    }
}
