use super::project::unqualified_scope;
use super::{DependencyGraph, Excludes, Identifier, Package, Project};
use std::collections::{BTreeMap, BTreeSet};

/// ResolutionResult aggregate: everything known about an analyzed workspace
///
/// Exclusion state is computed once on construction:
/// - a project is excluded when a path exclude matches its definition file;
/// - a package is excluded when every scope it is reachable from is excluded,
///   either by a scope exclude or because the owning project is excluded.
///
/// Packages that are not reachable from any scope are never excluded.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    projects: BTreeMap<Identifier, Project>,
    packages: BTreeMap<Identifier, Package>,
    graph: DependencyGraph,
    excludes: Excludes,
    excluded_projects: BTreeSet<Identifier>,
    excluded_packages: BTreeSet<Identifier>,
    excluded_scopes: BTreeSet<String>,
}

impl ResolutionResult {
    pub fn new(
        projects: impl IntoIterator<Item = Project>,
        packages: impl IntoIterator<Item = Package>,
        graph: DependencyGraph,
        excludes: Excludes,
    ) -> Self {
        let projects: BTreeMap<Identifier, Project> = projects
            .into_iter()
            .map(|project| (project.id().clone(), project))
            .collect();
        let packages: BTreeMap<Identifier, Package> = packages
            .into_iter()
            .map(|package| (package.id().clone(), package))
            .collect();

        let excluded_projects: BTreeSet<Identifier> = projects
            .values()
            .filter(|project| excludes.is_path_excluded(project.definition_file_path()))
            .map(|project| project.id().clone())
            .collect();

        let mut excluded_scopes = BTreeSet::new();
        for project in projects.values() {
            let project_excluded = excluded_projects.contains(project.id());
            for scope in project.scope_names() {
                if project_excluded || excludes.is_scope_excluded(unqualified_scope(scope)) {
                    excluded_scopes.insert(scope.clone());
                }
            }
        }

        let mut reachable_included: BTreeSet<&Identifier> = BTreeSet::new();
        let mut reachable_excluded: BTreeSet<&Identifier> = BTreeSet::new();
        for scope in graph.scopes().keys() {
            let reachable = graph.reachable_from_scope(scope);
            if excluded_scopes.contains(scope) {
                reachable_excluded.extend(reachable);
            } else {
                reachable_included.extend(reachable);
            }
        }

        let excluded_packages = reachable_excluded
            .difference(&reachable_included)
            .filter(|id| packages.contains_key(**id))
            .map(|id| (*id).clone())
            .collect();

        Self {
            projects,
            packages,
            graph,
            excludes,
            excluded_projects,
            excluded_packages,
            excluded_scopes,
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn excludes(&self) -> &Excludes {
        &self.excludes
    }

    pub fn project(&self, id: &Identifier) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn package(&self, id: &Identifier) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Projects sorted by identifier
    ///
    /// # Arguments
    /// * `omit_excluded` - Skip projects matched by a path exclude
    /// * `include_sub_projects` - Keep projects that other projects depend on
    pub fn projects(&self, omit_excluded: bool, include_sub_projects: bool) -> Vec<&Project> {
        self.projects
            .values()
            .filter(|project| !(omit_excluded && self.is_excluded(project.id())))
            .filter(|project| include_sub_projects || !self.is_sub_project(project.id()))
            .collect()
    }

    /// Packages sorted by identifier
    pub fn packages(&self, omit_excluded: bool) -> Vec<&Package> {
        self.packages
            .values()
            .filter(|package| !(omit_excluded && self.is_excluded(package.id())))
            .collect()
    }

    /// Whether the project or package with this identifier is excluded
    pub fn is_excluded(&self, id: &Identifier) -> bool {
        self.excluded_projects.contains(id) || self.excluded_packages.contains(id)
    }

    pub fn is_scope_excluded(&self, qualified_scope: &str) -> bool {
        self.excluded_scopes.contains(qualified_scope)
    }

    /// A sub-project is a project that other projects of the workspace depend on
    pub fn is_sub_project(&self, id: &Identifier) -> bool {
        self.projects.contains_key(id) && self.graph.contains_project_node(id)
    }

    /// Direct dependencies of a project or package
    ///
    /// For projects, the roots of all its scopes are merged; with
    /// `omit_excluded` excluded scopes and excluded dependencies are skipped.
    pub fn dependencies(&self, id: &Identifier, omit_excluded: bool) -> BTreeSet<&Identifier> {
        let direct: BTreeSet<&Identifier> = match self.projects.get(id) {
            Some(project) => project
                .scope_names()
                .iter()
                .filter(|scope| !(omit_excluded && self.is_scope_excluded(scope)))
                .flat_map(|scope| self.graph.scope_roots(scope))
                .collect(),
            None => self.graph.direct_dependencies_of(id),
        };

        direct
            .into_iter()
            .filter(|dep| !(omit_excluded && self.is_excluded(dep)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::project::{
        qualify_scope, DEPENDENCIES_SCOPE, DEV_DEPENDENCIES_SCOPE,
    };
    use crate::sbom_generation::domain::{
        DependencyEdge, DependencyNode, PackageLinkage, PathExclude, ScopeExclude,
    };

    fn npm(name: &str) -> Identifier {
        Identifier::new("NPM", "", name, "1.0.0")
    }

    fn pnpm(name: &str) -> Identifier {
        Identifier::new("PNPM", "", name, "1.0.0")
    }

    fn node(pkg: usize, linkage: PackageLinkage) -> DependencyNode {
        DependencyNode {
            pkg,
            fragment: 0,
            linkage,
            issues: Vec::new(),
        }
    }

    /// app: dependencies -> [lib-a, tools], devDependencies -> [test-kit]
    /// tools: dependencies -> [lib-a]
    /// test-kit -> lib-b; lib-c is not reachable at all
    fn sample_result(excludes: Excludes) -> ResolutionResult {
        let app = pnpm("app");
        let tools = pnpm("tools");

        let packages = vec![npm("lib-a"), npm("test-kit"), npm("lib-b"), tools.clone()];
        let nodes = vec![
            node(0, PackageLinkage::Dynamic),
            node(1, PackageLinkage::Dynamic),
            node(2, PackageLinkage::Dynamic),
            node(3, PackageLinkage::ProjectDynamic),
        ];
        let edges = BTreeSet::from([
            DependencyEdge { from: 1, to: 2 },
            DependencyEdge { from: 3, to: 0 },
        ]);
        let scopes = BTreeMap::from([
            (qualify_scope(&app, DEPENDENCIES_SCOPE), vec![0, 3]),
            (qualify_scope(&app, DEV_DEPENDENCIES_SCOPE), vec![1]),
            (qualify_scope(&tools, DEPENDENCIES_SCOPE), vec![0]),
        ]);
        let graph = DependencyGraph::new(packages, nodes, edges, scopes);

        let projects = vec![
            Project::new(app, "package.json")
                .unwrap()
                .with_scopes([DEPENDENCIES_SCOPE, DEV_DEPENDENCIES_SCOPE]),
            Project::new(tools, "packages/tools/package.json")
                .unwrap()
                .with_scopes([DEPENDENCIES_SCOPE]),
        ];
        let packages = ["lib-a", "test-kit", "lib-b", "lib-c"]
            .iter()
            .map(|name| Package::builder(npm(name)).build().unwrap());

        ResolutionResult::new(projects, packages, graph, excludes)
    }

    fn ids<'a>(items: impl IntoIterator<Item = &'a Identifier>) -> Vec<String> {
        items.into_iter().map(|id| id.name().to_string()).collect()
    }

    #[test]
    fn test_projects_skip_sub_projects() {
        let result = sample_result(Excludes::default());

        assert_eq!(ids(result.projects(true, false).iter().map(|p| p.id())), vec!["app"]);
        assert_eq!(
            ids(result.projects(true, true).iter().map(|p| p.id())),
            vec!["app", "tools"]
        );
        assert!(result.is_sub_project(&pnpm("tools")));
    }

    #[test]
    fn test_project_dependencies_merge_scopes() {
        let result = sample_result(Excludes::default());
        let deps = result.dependencies(&pnpm("app"), true);
        assert_eq!(ids(deps), vec!["lib-a", "test-kit", "tools"]);
    }

    #[test]
    fn test_scope_exclude_excludes_only_exclusively_reached_packages() {
        let excludes = Excludes {
            paths: vec![],
            scopes: vec![ScopeExclude {
                pattern: DEV_DEPENDENCIES_SCOPE.to_string(),
                reason: "DEV_DEPENDENCY_OF".to_string(),
                comment: String::new(),
            }],
        };
        let result = sample_result(excludes);

        assert!(result.is_excluded(&npm("test-kit")));
        assert!(result.is_excluded(&npm("lib-b")));
        assert!(!result.is_excluded(&npm("lib-a")));
        // Unreachable packages are kept
        assert!(!result.is_excluded(&npm("lib-c")));

        assert_eq!(
            ids(result.packages(true).iter().map(|p| p.id())),
            vec!["lib-a", "lib-c"]
        );
        assert_eq!(ids(result.dependencies(&pnpm("app"), true)), vec!["lib-a", "tools"]);
        assert_eq!(
            ids(result.dependencies(&pnpm("app"), false)),
            vec!["lib-a", "test-kit", "tools"]
        );
    }

    #[test]
    fn test_path_exclude_excludes_project_and_its_scopes() {
        let excludes = Excludes {
            paths: vec![PathExclude {
                pattern: "packages/*".to_string(),
                reason: "BUILD_TOOL_OF".to_string(),
                comment: String::new(),
            }],
            scopes: vec![],
        };
        let result = sample_result(excludes);

        assert!(result.is_excluded(&pnpm("tools")));
        assert!(result.is_scope_excluded(&qualify_scope(&pnpm("tools"), DEPENDENCIES_SCOPE)));
        // Still reachable from the non-excluded app scope
        assert!(!result.is_excluded(&npm("lib-a")));
        assert_eq!(result.projects(true, true).len(), 1);
    }

    #[test]
    fn test_package_dependencies() {
        let result = sample_result(Excludes::default());
        assert_eq!(ids(result.dependencies(&npm("test-kit"), true)), vec!["lib-b"]);
        assert!(result.dependencies(&npm("lib-c"), true).is_empty());
    }
}
