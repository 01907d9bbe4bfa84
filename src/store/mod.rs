pub mod envelope;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::graph::DependencyGraph;
use crate::project::ProjectId;

/// Registry holding one [`DependencyGraph`] per project, with lazy load from
/// and save to durable snapshots at workspace lifecycle points.
///
/// All graph access goes through the store — that is what keeps
/// "one graph instance per project" an enforced invariant. The store is an
/// explicit object handed to the build driver, never process-global, so
/// tests can run isolated registries side by side.
///
/// Each graph sits behind its own `RwLock`: a project's incremental build
/// writes only its own graph, while resolver walks from any project read
/// into it concurrently. The registry map itself is guarded separately and
/// never held across a graph access.
pub struct DependencyGraphStore {
    graphs: Mutex<HashMap<ProjectId, Arc<RwLock<DependencyGraph>>>>,
    /// Where snapshots live; `None` disables persistence (tests, one-shot
    /// builds).
    snapshot_dir: Option<PathBuf>,
}

impl DependencyGraphStore {
    /// A store persisting snapshots under `snapshot_dir`.
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            graphs: Mutex::new(HashMap::new()),
            snapshot_dir: Some(snapshot_dir.into()),
        }
    }

    /// A store without durable storage: every project starts as "never
    /// built" and `saving` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            graphs: Mutex::new(HashMap::new()),
            snapshot_dir: None,
        }
    }

    /// The graph for `project`: the in-memory instance if loaded, else a
    /// previously persisted snapshot, else `None` — which means the project
    /// has never been built and the caller must run a full build.
    pub fn get(&self, project: &ProjectId) -> Option<Arc<RwLock<DependencyGraph>>> {
        let mut graphs = self.graphs.lock();
        if let Some(graph) = graphs.get(project) {
            return Some(Arc::clone(graph));
        }
        let dir = self.snapshot_dir.as_deref()?;
        let loaded = envelope::load_snapshot(dir, project)?;
        let graph = Arc::new(RwLock::new(loaded));
        graphs.insert(project.clone(), Arc::clone(&graph));
        Some(graph)
    }

    /// Register the graph produced by a project's full build, replacing any
    /// previous instance.
    pub fn insert(&self, project: ProjectId, graph: DependencyGraph) -> Arc<RwLock<DependencyGraph>> {
        let graph = Arc::new(RwLock::new(graph));
        self.graphs.lock().insert(project, Arc::clone(&graph));
        graph
    }

    /// Workspace-save checkpoint: persist every currently loaded graph so
    /// the next start resumes without a full rescan. Storage failures
    /// propagate; a silently dropped snapshot would mask missed rebuilds
    /// after restart.
    pub fn saving(&self) -> anyhow::Result<()> {
        let Some(dir) = self.snapshot_dir.as_deref() else {
            return Ok(());
        };
        let loaded: Vec<(ProjectId, Arc<RwLock<DependencyGraph>>)> = self
            .graphs
            .lock()
            .iter()
            .map(|(id, graph)| (id.clone(), Arc::clone(graph)))
            .collect();
        for (project, graph) in loaded {
            envelope::save_snapshot(dir, &project, &graph.read())?;
        }
        Ok(())
    }

    /// Discard the in-memory graph when a project is closed. The next `get`
    /// falls back to the last saved snapshot, if any.
    pub fn project_closed(&self, project: &ProjectId) {
        if self.graphs.lock().remove(project).is_some() {
            tracing::debug!(project = %project, "discarded dependency graph");
        }
    }

    /// Number of graphs currently held in memory.
    pub fn loaded_count(&self) -> usize {
        self.graphs.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::dependency::{Dependency, DependencyType};
    use crate::identity::{ObjectKind, QualifiedNameType};

    fn edge() -> Dependency {
        Dependency::new(
            QualifiedNameType::new("b.Sub", ObjectKind::ProductComponentType),
            QualifiedNameType::new("a.Super", ObjectKind::ProductComponentType),
            DependencyType::Subtype,
        )
    }

    #[test]
    fn test_get_unknown_project_returns_none() {
        let store = DependencyGraphStore::in_memory();
        assert!(store.get(&ProjectId::new("fresh")).is_none());
    }

    #[test]
    fn test_insert_then_get_returns_same_instance() {
        let store = DependencyGraphStore::in_memory();
        let project = ProjectId::new("p1");
        let inserted = store.insert(project.clone(), DependencyGraph::from_edges([edge()]));
        let fetched = store.get(&project).unwrap();
        assert!(
            Arc::ptr_eq(&inserted, &fetched),
            "one graph instance per project"
        );
    }

    #[test]
    fn test_saving_then_fresh_store_loads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectId::new("motor");
        {
            let store = DependencyGraphStore::new(dir.path());
            store.insert(project.clone(), DependencyGraph::from_edges([edge()]));
            store.saving().unwrap();
        }

        // New process: nothing in memory, snapshot on disk.
        let store = DependencyGraphStore::new(dir.path());
        let graph = store.get(&project).expect("snapshot should be lazily loaded");
        assert_eq!(graph.read().edge_count(), 1);
    }

    #[test]
    fn test_project_closed_discards_graph() {
        let store = DependencyGraphStore::in_memory();
        let project = ProjectId::new("p1");
        store.insert(project.clone(), DependencyGraph::from_edges([edge()]));
        assert_eq!(store.loaded_count(), 1);

        store.project_closed(&project);
        assert_eq!(store.loaded_count(), 0);
        assert!(
            store.get(&project).is_none(),
            "without persistence a closed project is gone"
        );
    }

    #[test]
    fn test_close_then_reopen_falls_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectId::new("motor");
        let store = DependencyGraphStore::new(dir.path());
        store.insert(project.clone(), DependencyGraph::from_edges([edge()]));
        store.saving().unwrap();

        store.project_closed(&project);
        let graph = store.get(&project).expect("reopened project loads the saved snapshot");
        assert_eq!(graph.read().edge_count(), 1);
    }

    #[test]
    fn test_in_memory_saving_is_noop() {
        let store = DependencyGraphStore::in_memory();
        store.insert(ProjectId::new("p1"), DependencyGraph::new());
        store.saving().unwrap();
    }
}
