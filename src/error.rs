use thiserror::Error;

use crate::identity::QualifiedNameType;

/// Errors surfaced by the dependency graph.
///
/// Absent graphs, unbuildable projects, unknown lookup targets and cyclic
/// project references are all normal states handled structurally, not
/// errors; only failures that would otherwise mask a missed rebuild
/// propagate.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The parsing collaborator failed while deriving an object's outgoing
    /// edges. The graph keeps the previous edge set for that object; a stale
    /// node is recoverable, a silently emptied one is not.
    #[error("failed to derive dependencies of {id}")]
    Derivation {
        id: QualifiedNameType,
        #[source]
        source: anyhow::Error,
    },

    /// The parsing collaborator failed to enumerate a project's objects
    /// during full-scan graph construction.
    #[error("failed to enumerate project objects")]
    Scan(#[source] anyhow::Error),
}
