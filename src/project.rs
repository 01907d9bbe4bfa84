use std::fmt;
use std::sync::Arc;

use crate::graph::dependency::Dependency;
use crate::identity::QualifiedNameType;

/// Identifies a project in the workspace. Keys the graph registry and the
/// per-project buckets of a resolution result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What a project's configured builder set can do. Queried by the resolver to
/// decide how `CompositionMasterDetail` edges propagate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderCapabilities {
    /// True when one of the project's builders generates a composition
    /// (master plus all details) as a single unit, so touching any detail
    /// invalidates the whole aggregate.
    pub contains_aggregate_root_builder: bool,
}

/// The engine's view of a project. Implemented by the surrounding project
/// model; the engine never discovers projects or their references itself.
pub trait Project: Send + Sync {
    fn id(&self) -> &ProjectId;

    /// Whether the project is currently buildable. A project with invalid
    /// configuration cannot contribute rebuild candidates and is skipped.
    fn can_be_built(&self) -> bool;

    /// The projects whose build configuration declares a dependency on this
    /// project's output. Direct references only; transitive reach comes from
    /// the resolver's own recursion.
    fn referencing_projects(&self) -> Vec<Arc<dyn Project>>;

    fn builder_capabilities(&self) -> BuilderCapabilities;
}

/// A handle to a model object in a change set, as delivered by the resource
/// change notification. The engine only needs the identity.
pub trait ObjectHandle {
    fn qualified_name_type(&self) -> QualifiedNameType;
}

/// Derives a model object's outgoing dependencies from its current parsed
/// state. This is the parsing collaborator the graph calls during a full
/// build and on every incremental [`update`](crate::graph::DependencyGraph::update).
pub trait DependencyProvider {
    /// Every object identity currently present in the project. Used for the
    /// initial full-scan graph construction.
    fn object_ids(&self) -> anyhow::Result<Vec<QualifiedNameType>>;

    /// The outgoing dependency edges of `id`, or `Ok(None)` if the object no
    /// longer exists. Errors are propagated by the caller; a failed
    /// derivation must never silently empty a graph node.
    fn dependencies_of(&self, id: &QualifiedNameType)
        -> anyhow::Result<Option<Vec<Dependency>>>;
}
