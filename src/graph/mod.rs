pub mod dependency;

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};

use crate::error::GraphError;
use crate::identity::QualifiedNameType;
use crate::project::DependencyProvider;
use dependency::{Dependency, DependencyType};

/// The per-project dependency graph: a directed petgraph StableGraph with an
/// O(1) identity lookup index.
///
/// Edges run `source -> target` ("source depends on target"); the engine's
/// hot query is the reverse walk [`get_dependants`](Self::get_dependants).
/// After a full build the graph is a complete snapshot of every object's
/// dependencies at that moment; [`update`](Self::update) keeps it accurate
/// incrementally.
pub struct DependencyGraph {
    /// The underlying directed graph, nodes keyed by object identity.
    graph: StableGraph<QualifiedNameType, DependencyType, Directed>,
    /// Maps object identities to their node indices for O(1) lookup.
    node_index: HashMap<QualifiedNameType, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Build a graph from a full scan: derive the outgoing edges of every
    /// object the provider enumerates. This is the initial construction
    /// path; afterwards the graph evolves only through [`update`](Self::update).
    pub fn build(provider: &dyn DependencyProvider) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        let ids = provider.object_ids().map_err(GraphError::Scan)?;
        tracing::debug!(objects = ids.len(), "building dependency graph from full scan");
        for id in ids {
            graph.update(&id, provider)?;
        }
        Ok(graph)
    }

    /// Rebuild a graph from a flat list of edges, e.g. a persisted snapshot.
    pub fn from_edges(edges: impl IntoIterator<Item = Dependency>) -> Self {
        let mut graph = Self::new();
        for dep in edges {
            graph.add_edge(&dep);
        }
        graph
    }

    /// Every stored edge whose target is `target`: the objects in this
    /// project whose generated artifacts depend on it.
    ///
    /// Returns an empty vector for unknown targets; an object may be queried
    /// before it is first indexed, which is a normal transient state.
    pub fn get_dependants(&self, target: &QualifiedNameType) -> Vec<Dependency> {
        let Some(&idx) = self.node_index.get(target) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| {
                Dependency::new(
                    self.graph[edge.source()].clone(),
                    target.clone(),
                    *edge.weight(),
                )
            })
            .collect()
    }

    /// Re-derive `id`'s outgoing edges and replace any previously stored
    /// edges for `id` as a source. `Ok(None)` from the provider means the
    /// object no longer exists and its edges are removed entirely.
    ///
    /// On derivation failure the previous edge set is left unchanged and the
    /// error propagates; a stale node can still be rebuilt, a silently
    /// emptied one masks a missed rebuild. Idempotent for unchanged content.
    pub fn update(
        &mut self,
        id: &QualifiedNameType,
        provider: &dyn DependencyProvider,
    ) -> Result<(), GraphError> {
        let derived = provider
            .dependencies_of(id)
            .map_err(|source| GraphError::Derivation {
                id: id.clone(),
                source,
            })?;

        self.remove_outgoing(id);
        match derived {
            Some(deps) => {
                tracing::trace!(object = %id, edges = deps.len(), "replacing outgoing edges");
                // Providers may legitimately report the same relation twice
                // (e.g. an association and a validation rule over the same
                // target); identical triples are stored once.
                let mut seen: HashSet<Dependency> = HashSet::with_capacity(deps.len());
                for dep in deps {
                    if seen.insert(dep.clone()) {
                        self.add_edge(&dep);
                    }
                }
            }
            None => {
                tracing::trace!(object = %id, "object gone, outgoing edges removed");
            }
        }
        self.prune_isolated(id);
        Ok(())
    }

    /// Iterate all stored edges as `(source, target, type)` triples. Feeds
    /// the persisted snapshot.
    pub fn edges(&self) -> impl Iterator<Item = Dependency> + '_ {
        self.graph.edge_references().map(|edge| {
            Dependency::new(
                self.graph[edge.source()].clone(),
                self.graph[edge.target()].clone(),
                *edge.weight(),
            )
        })
    }

    /// Number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn add_edge(&mut self, dep: &Dependency) {
        let source_idx = self.intern(dep.source());
        let target_idx = self.intern(dep.target());
        self.graph.add_edge(source_idx, target_idx, dep.dep_type());
    }

    /// Node index for `id`, adding a node if the identity is new.
    fn intern(&mut self, id: &QualifiedNameType) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(id) {
            return existing;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_index.insert(id.clone(), idx);
        idx
    }

    /// Drop every outgoing edge of `id`, pruning targets that end up with no
    /// edges at all.
    fn remove_outgoing(&mut self, id: &QualifiedNameType) {
        let Some(&idx) = self.node_index.get(id) else {
            return;
        };
        let edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        let mut touched: Vec<NodeIndex> = Vec::with_capacity(edges.len());
        for (edge_id, target_idx) in edges {
            self.graph.remove_edge(edge_id);
            touched.push(target_idx);
        }
        for target_idx in touched {
            self.prune_node(target_idx);
        }
    }

    /// Prune `id`'s node if it no longer participates in any edge.
    fn prune_isolated(&mut self, id: &QualifiedNameType) {
        if let Some(&idx) = self.node_index.get(id) {
            self.prune_node(idx);
        }
    }

    fn prune_node(&mut self, idx: NodeIndex) {
        let has_incoming = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .is_some();
        let has_outgoing = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .next()
            .is_some();
        if !has_incoming && !has_outgoing {
            if let Some(id) = self.graph.remove_node(idx) {
                self.node_index.remove(&id);
            }
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
