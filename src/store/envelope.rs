use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::dependency::Dependency;
use crate::graph::DependencyGraph;
use crate::project::ProjectId;

/// Current snapshot format version. Bump when the serialized layout of
/// identities or dependency triples changes — bincode discriminant layout is
/// positional, so any enum variant addition is a breaking change.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File extension for per-project snapshot files.
pub const SNAPSHOT_EXT: &str = "depgraph";

/// Envelope wrapping a project's persisted dependency graph as a flat list
/// of `(source, target, type)` triples, with version metadata.
///
/// Triples rather than the graph structure itself: the edge list is the
/// lossless contract, node indices are an in-memory detail rebuilt on load.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SnapshotEnvelope {
    pub version: u32,
    pub project: ProjectId,
    pub edges: Vec<Dependency>,
}

/// Snapshot file path for a project: `<snapshot_dir>/<project>.depgraph`.
pub fn snapshot_path(snapshot_dir: &Path, project: &ProjectId) -> PathBuf {
    snapshot_dir.join(format!("{}.{SNAPSHOT_EXT}", project.as_str()))
}

/// Persist a graph snapshot atomically: temp file in the target directory,
/// then rename. Creates the snapshot directory if needed.
pub fn save_snapshot(
    snapshot_dir: &Path,
    project: &ProjectId,
    graph: &DependencyGraph,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(snapshot_dir)?;

    let envelope = SnapshotEnvelope {
        version: SNAPSHOT_VERSION,
        project: project.clone(),
        edges: graph.edges().collect(),
    };

    let target = snapshot_path(snapshot_dir, project);
    let mut tmp = tempfile::NamedTempFile::new_in(snapshot_dir)?;
    bincode::serde::encode_into_std_write(&envelope, &mut tmp, bincode::config::standard())?;
    tmp.as_file().flush()?;
    tmp.persist(&target)?;

    tracing::debug!(project = %project, edges = envelope.edges.len(), "saved graph snapshot");
    Ok(())
}

/// Load a project's persisted graph. Returns `None` if the snapshot file
/// does not exist, carries a different version, or fails to decode — all of
/// which the caller treats as "no snapshot, perform a full build".
pub fn load_snapshot(snapshot_dir: &Path, project: &ProjectId) -> Option<DependencyGraph> {
    let target = snapshot_path(snapshot_dir, project);
    let bytes = std::fs::read(&target).ok()?;
    let result = bincode::serde::decode_from_slice::<SnapshotEnvelope, _>(
        &bytes,
        bincode::config::standard(),
    );
    match result {
        Ok((envelope, _)) if envelope.version == SNAPSHOT_VERSION && envelope.project == *project => {
            tracing::debug!(project = %project, edges = envelope.edges.len(), "loaded graph snapshot");
            Some(DependencyGraph::from_edges(envelope.edges))
        }
        _ => None, // version mismatch or corrupt snapshot; caller rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::dependency::DependencyType;
    use crate::identity::{ObjectKind, QualifiedNameType};

    fn sample_graph() -> DependencyGraph {
        let a = QualifiedNameType::new("a.Super", ObjectKind::ProductComponentType);
        let b = QualifiedNameType::new("b.Sub", ObjectKind::ProductComponentType);
        let c = QualifiedNameType::new("c.Cmpt", ObjectKind::ProductComponent);
        DependencyGraph::from_edges([
            Dependency::new(b.clone(), a, DependencyType::Subtype),
            Dependency::new(c, b, DependencyType::InstanceOf),
        ])
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectId::new("motor");
        let graph = sample_graph();

        save_snapshot(dir.path(), &project, &graph).unwrap();
        let loaded = load_snapshot(dir.path(), &project).expect("snapshot should load");

        assert_eq!(loaded.edge_count(), graph.edge_count());
        let a = QualifiedNameType::new("a.Super", ObjectKind::ProductComponentType);
        assert_eq!(loaded.get_dependants(&a), graph.get_dependants(&a));
    }

    #[test]
    fn test_load_missing_snapshot_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_snapshot(dir.path(), &ProjectId::new("nothing")).is_none());
    }

    #[test]
    fn test_corrupt_snapshot_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectId::new("motor");
        std::fs::write(snapshot_path(dir.path(), &project), b"not a snapshot").unwrap();
        assert!(load_snapshot(dir.path(), &project).is_none());
    }

    #[test]
    fn test_snapshot_for_other_project_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let motor = ProjectId::new("motor");
        save_snapshot(dir.path(), &motor, &sample_graph()).unwrap();

        // A file renamed to another project's slot must not load.
        std::fs::rename(
            snapshot_path(dir.path(), &motor),
            snapshot_path(dir.path(), &ProjectId::new("home")),
        )
        .unwrap();
        assert!(load_snapshot(dir.path(), &ProjectId::new("home")).is_none());
    }
}
