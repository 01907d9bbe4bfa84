//! Incremental dependency-tracking and rebuild-invalidation engine for
//! model-driven development projects.
//!
//! Given the set of model objects that changed or were removed in one
//! project, the engine determines exactly which other objects — possibly in
//! other, independently built projects — must be rebuilt, without rebuilding
//! everything and without missing transitive effects.
//!
//! The three moving parts:
//!
//! - [`DependencyGraph`] — per project, the reverse-queryable store of typed
//!   dependency edges, rebuilt object by object as the project changes.
//! - [`DependencyGraphStore`] — the registry mapping projects to their
//!   graphs, with lazy snapshot loading and a workspace-save checkpoint.
//! - [`DependencyResolver`] — the cross-project walk that expands a changed
//!   identity into a per-project map of rebuild-relevant dependencies,
//!   following each edge type's own propagation rule.
//!
//! The engine computes *what* needs rebuilding, not in what order generation
//! runs; scheduling stays with the build driver, which also supplies change
//! notifications ([`ObjectHandle`]), the project model ([`Project`]) and the
//! per-object dependency derivation ([`DependencyProvider`]).

pub mod error;
pub mod graph;
pub mod identity;
pub mod multimap;
pub mod project;
pub mod resolver;
pub mod store;

pub use error::GraphError;
pub use graph::dependency::{Continuation, Dependency, DependencyType};
pub use graph::DependencyGraph;
pub use identity::{ObjectKind, QualifiedNameType};
pub use project::{BuilderCapabilities, DependencyProvider, ObjectHandle, Project, ProjectId};
pub use resolver::{DependencyResolver, ResolutionResult};
pub use store::DependencyGraphStore;
