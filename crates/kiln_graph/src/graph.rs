//! The import graph and its connected components.

use std::collections::HashMap;

use kiln_cache::Registry;
use kiln_common::{InternalError, KilnResult};
use kiln_source::Source;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;

/// Directed graph over sources; an edge `a -> b` means `a` imports `b`.
///
/// Built fresh from the registry for every compile and never persisted.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

/// A maximal set of sources connected by imports in either direction.
///
/// Members are sorted by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Paths of the member sources.
    pub sources: Vec<String>,
}

impl Component {
    /// Returns `true` if `path` is a member.
    pub fn contains(&self, path: &str) -> bool {
        self.sources.binary_search_by(|p| p.as_str().cmp(path)).is_ok()
    }

    /// Returns the number of member sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the component has no members.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl DependencyGraph {
    /// Builds the graph over every source in `registry`.
    pub fn build(registry: &Registry) -> KilnResult<Self> {
        Self::from_sources(registry.sources())
    }

    /// Builds the graph over `sources`.
    ///
    /// Every import must name one of `sources`; an import that does not is
    /// an internal error, since import resolution is expected to have been
    /// validated before the graph is built.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a Source>) -> KilnResult<Self> {
        let sources: Vec<&Source> = sources.into_iter().collect();
        let mut dg = Self::default();

        for src in &sources {
            let path = src.path();
            let node = dg.graph.add_node(path.clone());
            dg.index.insert(path, node);
        }

        for src in &sources {
            let from = dg.index[&src.path()];
            for import in &src.imports {
                let to = *dg
                    .index
                    .get(import)
                    .ok_or_else(|| InternalError::dangling_edge(&src.path(), import))?;
                dg.graph.update_edge(from, to, ());
            }
        }

        tracing::debug!(
            vertices = dg.graph.node_count(),
            edges = dg.graph.edge_count(),
            "built dependency graph"
        );
        Ok(dg)
    }

    /// Returns the number of sources in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct import edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the paths imported by `path`, sorted.
    pub fn imports_of(&self, path: &str) -> Vec<&str> {
        let Some(&node) = self.index.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }

    /// Partitions the graph into weakly connected components.
    ///
    /// Every source belongs to exactly one component. Components are ordered
    /// by the insertion position of their first member.
    pub fn components(&self) -> Vec<Component> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.raw_edges() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Component> = Vec::new();
        for node in self.graph.node_indices() {
            let root = sets.find(node.index());
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Component {
                    sources: Vec::new(),
                });
                components.len() - 1
            });
            components[slot].sources.push(self.graph[node].clone());
        }

        for component in &mut components {
            component.sources.sort();
        }
        components
    }
}
