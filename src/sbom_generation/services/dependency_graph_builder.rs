use crate::ports::outbound::DependencyHandler;
use crate::sbom_generation::domain::{
    DependencyEdge, DependencyGraph, DependencyNode, Identifier, Issue, Package, PackageLinkage,
};
use crate::shared::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

/// Content key of a fragment: identifier index, linkage and child nodes
type FragmentKey = (usize, PackageLinkage, BTreeSet<usize>);

/// DependencyGraphBuilder service building one graph for all projects of a workspace
///
/// Raw references are resolved through a [`DependencyHandler`]. Every distinct
/// reference is resolved once and memoized, and fragments with equal content
/// are shared between all parents and scopes that reach them.
///
/// Packages are registered on first sight; later registrations with an equal
/// identifier are dropped.
pub struct DependencyGraphBuilder<'a, D, H>
where
    D: Eq + Hash,
    H: DependencyHandler<D>,
{
    handler: &'a H,
    memo: HashMap<&'a D, usize>,
    identifiers: Vec<Identifier>,
    identifier_indices: HashMap<Identifier, usize>,
    nodes: Vec<DependencyNode>,
    fragments: HashMap<FragmentKey, usize>,
    fragment_counts: HashMap<usize, usize>,
    edges: BTreeSet<DependencyEdge>,
    scopes: BTreeMap<String, Vec<usize>>,
    packages: BTreeMap<Identifier, Package>,
}

impl<'a, D, H> DependencyGraphBuilder<'a, D, H>
where
    D: Eq + Hash,
    H: DependencyHandler<D>,
{
    pub fn new(handler: &'a H) -> Self {
        Self {
            handler,
            memo: HashMap::new(),
            identifiers: Vec::new(),
            identifier_indices: HashMap::new(),
            nodes: Vec::new(),
            fragments: HashMap::new(),
            fragment_counts: HashMap::new(),
            edges: BTreeSet::new(),
            scopes: BTreeMap::new(),
            packages: BTreeMap::new(),
        }
    }

    /// Registers `dependency` and its subtree as a root of `scope_name`
    ///
    /// # Arguments
    /// * `scope_name` - Qualified scope name, e.g. `:app:1.0.0:dependencies`
    /// * `dependency` - Direct dependency of the scope
    ///
    /// # Errors
    /// Any error of the handler aborts the build.
    pub fn add_dependency(&mut self, scope_name: &str, dependency: &'a D) -> Result<&mut Self> {
        let node = self.resolve(dependency)?;

        let roots = self.scopes.entry(scope_name.to_string()).or_default();
        if !roots.contains(&node) {
            roots.push(node);
        }

        Ok(self)
    }

    /// Registers a scope without any dependencies
    pub fn add_scope(&mut self, scope_name: &str) -> &mut Self {
        self.scopes.entry(scope_name.to_string()).or_default();
        self
    }

    /// Returns the graph built from all dependencies added so far
    pub fn build(&self) -> DependencyGraph {
        DependencyGraph::new(
            self.identifiers.clone(),
            self.nodes.clone(),
            self.edges.clone(),
            self.scopes.clone(),
        )
    }

    /// Packages collected so far, sorted by identifier
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    fn resolve(&mut self, dependency: &'a D) -> Result<usize> {
        if let Some(&node) = self.memo.get(dependency) {
            return Ok(node);
        }

        let handler = self.handler;
        let id = handler.identifier_for(dependency)?;
        let linkage = handler.linkage_for(dependency);

        let mut issues = Vec::new();
        if let Some(package) = handler.create_package(dependency, &mut issues)? {
            self.packages
                .entry(package.id().clone())
                .or_insert(package);
        }

        let mut children = BTreeSet::new();
        for child in handler.dependencies_for(dependency) {
            children.insert(self.resolve(child)?);
        }

        let pkg = self.intern(id);
        let node = self.fragment_node(pkg, linkage, children, issues);
        self.memo.insert(dependency, node);

        Ok(node)
    }

    fn intern(&mut self, id: Identifier) -> usize {
        if let Some(&index) = self.identifier_indices.get(&id) {
            return index;
        }

        let index = self.identifiers.len();
        self.identifiers.push(id.clone());
        self.identifier_indices.insert(id, index);
        index
    }

    fn fragment_node(
        &mut self,
        pkg: usize,
        linkage: PackageLinkage,
        children: BTreeSet<usize>,
        issues: Vec<Issue>,
    ) -> usize {
        let key = (pkg, linkage, children);
        if let Some(&node) = self.fragments.get(&key) {
            let existing = &mut self.nodes[node].issues;
            for issue in issues {
                if !existing.contains(&issue) {
                    existing.push(issue);
                }
            }
            return node;
        }

        let fragment_count = self.fragment_counts.entry(pkg).or_insert(0);
        let fragment = *fragment_count;
        *fragment_count += 1;

        let node = self.nodes.len();
        self.nodes.push(DependencyNode {
            pkg,
            fragment,
            linkage,
            issues,
        });
        self.edges
            .extend(key.2.iter().map(|&to| DependencyEdge { from: node, to }));
        self.fragments.insert(key, node);

        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Minimal reference shape for exercising the builder
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct TestRef {
        name: String,
        version: String,
        description: String,
        project: bool,
        children: Vec<TestRef>,
    }

    fn dep(name: &str, children: Vec<TestRef>) -> TestRef {
        TestRef {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            project: false,
            children,
        }
    }

    #[derive(Default)]
    struct TestHandler {
        resolved: RefCell<Vec<String>>,
    }

    impl DependencyHandler<TestRef> for TestHandler {
        fn identifier_for(&self, dependency: &TestRef) -> Result<Identifier> {
            self.resolved.borrow_mut().push(dependency.name.clone());
            if dependency.name == "broken" {
                anyhow::bail!("cannot read manifest of 'broken'");
            }
            let id_type = if dependency.project { "PNPM" } else { "NPM" };
            Ok(Identifier::new(id_type, "", &dependency.name, &dependency.version))
        }

        fn dependencies_for<'a>(&self, dependency: &'a TestRef) -> Vec<&'a TestRef> {
            dependency.children.iter().collect()
        }

        fn linkage_for(&self, dependency: &TestRef) -> PackageLinkage {
            if dependency.project {
                PackageLinkage::ProjectDynamic
            } else {
                PackageLinkage::Dynamic
            }
        }

        fn create_package(
            &self,
            dependency: &TestRef,
            issues: &mut Vec<Issue>,
        ) -> Result<Option<Package>> {
            if dependency.project {
                return Ok(None);
            }
            if dependency.description.is_empty() {
                issues.push(Issue::hint("TEST", format!("'{}' has no description", dependency.name)));
            }
            let id = Identifier::new("NPM", "", &dependency.name, &dependency.version);
            Package::builder(id)
                .description(dependency.description.clone())
                .build()
                .map(Some)
        }
    }

    #[test]
    fn test_shared_subtree_is_one_fragment() {
        let shared = dep("shared", vec![dep("leaf", vec![])]);
        let a = dep("a", vec![shared.clone()]);
        let b = dep("b", vec![shared.clone()]);
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("app:dependencies", &a).unwrap();
        builder.add_dependency("app:dependencies", &b).unwrap();
        let graph = builder.build();

        let shared_id = Identifier::new("NPM", "", "shared", "1.0.0");
        assert_eq!(graph.fragment_count(&shared_id), 1);
        assert_eq!(graph.node_count(), 4);
        assert!(graph.node_count() <= graph.packages().len());
        assert_eq!(graph.scope_roots("app:dependencies").len(), 2);
    }

    #[test]
    fn test_equal_references_are_resolved_once() {
        let shared = dep("shared", vec![]);
        let a = dep("a", vec![shared.clone()]);
        let b = dep("b", vec![shared.clone()]);
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("s", &a).unwrap();
        builder.add_dependency("s", &b).unwrap();

        let resolved = handler.resolved.borrow();
        assert_eq!(resolved.iter().filter(|name| *name == "shared").count(), 1);
    }

    #[test]
    fn test_same_identifier_with_different_subtrees() {
        let a = dep("a", vec![dep("x", vec![dep("y", vec![])])]);
        let b = dep("b", vec![dep("x", vec![])]);
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("s", &a).unwrap();
        builder.add_dependency("s", &b).unwrap();
        let graph = builder.build();

        let x = Identifier::new("NPM", "", "x", "1.0.0");
        assert_eq!(graph.fragment_count(&x), 2);
        let fragments: BTreeSet<usize> = graph
            .nodes()
            .iter()
            .filter(|node| graph.packages()[node.pkg] == x)
            .map(|node| node.fragment)
            .collect();
        assert_eq!(fragments, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_same_root_is_not_added_twice() {
        let a = dep("a", vec![]);
        let a_again = a.clone();
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder
            .add_dependency("s", &a)
            .unwrap()
            .add_dependency("s", &a_again)
            .unwrap();

        assert_eq!(builder.build().scopes()["s"].len(), 1);
    }

    #[test]
    fn test_first_seen_package_wins() {
        let mut first = dep("lib", vec![]);
        first.description = "first".to_string();
        let mut second = dep("lib", vec![dep("extra", vec![])]);
        second.description = "second".to_string();
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("s", &first).unwrap();
        builder.add_dependency("t", &second).unwrap();

        let libs: Vec<&Package> = builder
            .packages()
            .filter(|package| package.id().name() == "lib")
            .collect();
        assert_eq!(libs.len(), 1);
        assert_eq!(libs[0].description(), "first");
    }

    #[test]
    fn test_projects_have_no_package() {
        let mut sibling = dep("sibling", vec![dep("lib", vec![])]);
        sibling.project = true;
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("s", &sibling).unwrap();
        let graph = builder.build();

        let names: Vec<&str> = builder.packages().map(|p| p.id().name()).collect();
        assert_eq!(names, vec!["lib"]);
        assert!(graph.contains_project_node(&Identifier::new("PNPM", "", "sibling", "1.0.0")));
    }

    #[test]
    fn test_handler_error_aborts_build() {
        let root = dep("a", vec![dep("broken", vec![])]);
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        let err = builder.add_dependency("s", &root).err().unwrap();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_package_construction_error_aborts_build() {
        let mut root = dep("a", vec![]);
        root.version = String::new();
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        let err = builder.add_dependency("s", &root).err().unwrap();
        assert!(err.to_string().contains("version cannot be empty"));
    }

    #[test]
    fn test_issues_are_attached_to_nodes() {
        let root = dep("a", vec![]);
        let handler = TestHandler::default();

        let mut builder = DependencyGraphBuilder::new(&handler);
        builder.add_dependency("s", &root).unwrap();
        let graph = builder.build();

        let issues = graph.issues();
        let a = Identifier::new("NPM", "", "a", "1.0.0");
        assert_eq!(issues[&a].len(), 1);
        assert!(issues[&a][0].message().contains("no description"));
    }

    #[test]
    fn test_empty_scope() {
        let handler = TestHandler::default();
        let mut builder: DependencyGraphBuilder<'_, TestRef, TestHandler> =
            DependencyGraphBuilder::new(&handler);
        builder.add_scope("app:devDependencies");

        let graph = builder.build();
        assert!(graph.scopes().contains_key("app:devDependencies"));
        assert!(graph.scope_roots("app:devDependencies").is_empty());
    }
}
