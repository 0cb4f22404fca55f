use super::{Identifier, Issue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How a graph node is linked into the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageLinkage {
    /// An external package fetched from a registry or other remote location
    Dynamic,
    /// Another project of the same workspace
    ProjectDynamic,
}

/// A deduplicated fragment of the dependency graph
///
/// `pkg` indexes into [`DependencyGraph::packages`]. `fragment` distinguishes
/// nodes that share an identifier but have different subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub pkg: usize,
    pub fragment: usize,
    pub linkage: PackageLinkage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

/// Directed edge between two node indices, from dependent to dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: usize,
    pub to: usize,
}

/// DependencyGraph aggregate shared by all projects of a workspace
///
/// Every scope (a qualified name like `PNPM::app:1.0.0:dependencies`) lists the
/// node indices of its direct dependencies. Subtrees reachable from several
/// scopes are stored once and referenced from each of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    packages: Vec<Identifier>,
    nodes: Vec<DependencyNode>,
    edges: BTreeSet<DependencyEdge>,
    scopes: BTreeMap<String, Vec<usize>>,
}

impl DependencyGraph {
    pub fn new(
        packages: Vec<Identifier>,
        nodes: Vec<DependencyNode>,
        edges: BTreeSet<DependencyEdge>,
        scopes: BTreeMap<String, Vec<usize>>,
    ) -> Self {
        Self {
            packages,
            nodes,
            edges,
            scopes,
        }
    }

    pub fn packages(&self) -> &[Identifier] {
        &self.packages
    }

    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeSet<DependencyEdge> {
        &self.edges
    }

    pub fn scopes(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.scopes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of fragment nodes for the given identifier
    pub fn fragment_count(&self, id: &Identifier) -> usize {
        self.nodes
            .iter()
            .filter(|node| self.packages.get(node.pkg) == Some(id))
            .count()
    }

    /// Identifier of the node at `index`, if any
    pub fn identifier_of(&self, index: usize) -> Option<&Identifier> {
        self.nodes
            .get(index)
            .and_then(|node| self.packages.get(node.pkg))
    }

    /// Identifiers of the direct dependencies registered for `scope`
    pub fn scope_roots(&self, scope: &str) -> BTreeSet<&Identifier> {
        self.scopes
            .get(scope)
            .map(|roots| {
                roots
                    .iter()
                    .filter_map(|&index| self.identifier_of(index))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct dependencies of `id`, merged over all fragments of that identifier
    pub fn direct_dependencies_of(&self, id: &Identifier) -> BTreeSet<&Identifier> {
        let node_indices: BTreeSet<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| self.packages.get(node.pkg) == Some(id))
            .map(|(index, _)| index)
            .collect();

        self.edges
            .iter()
            .filter(|edge| node_indices.contains(&edge.from))
            .filter_map(|edge| self.identifier_of(edge.to))
            .collect()
    }

    /// All identifiers reachable from the roots of `scope`, the roots included
    pub fn reachable_from_scope(&self, scope: &str) -> BTreeSet<&Identifier> {
        let mut visited: BTreeSet<usize> = BTreeSet::new();
        let mut queue: VecDeque<usize> = self
            .scopes
            .get(scope)
            .map(|roots| roots.iter().copied().collect())
            .unwrap_or_default();

        while let Some(index) = queue.pop_front() {
            if !visited.insert(index) {
                continue;
            }
            queue.extend(
                self.edges
                    .range(DependencyEdge { from: index, to: 0 }..)
                    .take_while(|edge| edge.from == index)
                    .map(|edge| edge.to),
            );
        }

        visited
            .into_iter()
            .filter_map(|index| self.identifier_of(index))
            .collect()
    }

    /// Whether `id` occurs as a workspace project node inside the graph
    pub fn contains_project_node(&self, id: &Identifier) -> bool {
        self.nodes.iter().any(|node| {
            node.linkage == PackageLinkage::ProjectDynamic && self.packages.get(node.pkg) == Some(id)
        })
    }

    /// Issues attached to nodes, grouped by the identifier they concern
    pub fn issues(&self) -> BTreeMap<&Identifier, Vec<&Issue>> {
        let mut issues: BTreeMap<&Identifier, Vec<&Issue>> = BTreeMap::new();
        for node in self.nodes.iter().filter(|node| !node.issues.is_empty()) {
            if let Some(id) = self.packages.get(node.pkg) {
                issues.entry(id).or_default().extend(node.issues.iter());
            }
        }
        issues
    }
}
