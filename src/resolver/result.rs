use std::collections::HashSet;

use crate::graph::dependency::Dependency;
use crate::identity::QualifiedNameType;
use crate::multimap::MultiValueMap;
use crate::project::ProjectId;

/// The outcome of one resolver run: for each affected project, the
/// deduplicated set of dependency edges that make its objects
/// rebuild-relevant.
///
/// The build driver extracts, per project, the `source` identities via
/// [`rebuild_candidates`](Self::rebuild_candidates), schedules their rebuild,
/// and calls `DependencyGraph::update` for each once regeneration completes.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    map: MultiValueMap<ProjectId, Dependency>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self {
            map: MultiValueMap::new(),
        }
    }

    /// Record `dependency` under `project`. Returns `false` if that exact
    /// edge was already recorded for the project.
    pub(crate) fn insert(&mut self, project: ProjectId, dependency: Dependency) -> bool {
        self.map.insert(project, dependency)
    }

    /// The recorded edges for one project, if it contributed any.
    pub fn dependencies(&self, project: &ProjectId) -> Option<&HashSet<Dependency>> {
        self.map.get(project)
    }

    /// The `source` identities of every edge recorded for `project`: the
    /// objects the driver must rebuild (or handle as deletions) there.
    pub fn rebuild_candidates(&self, project: &ProjectId) -> HashSet<QualifiedNameType> {
        self.map
            .get(project)
            .map(|deps| deps.iter().map(|d| d.source().clone()).collect())
            .unwrap_or_default()
    }

    /// Every project that contributed at least one edge.
    pub fn projects(&self) -> impl Iterator<Item = &ProjectId> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectId, &HashSet<Dependency>)> {
        self.map.iter()
    }

    pub fn project_count(&self) -> usize {
        self.map.keys().count()
    }

    /// Total number of recorded edges across all projects.
    pub fn dependency_count(&self) -> usize {
        self.map.value_count()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Merge another result into this one, deduplicating per project. Used
    /// by the batch entry point.
    pub fn merge(&mut self, other: ResolutionResult) {
        self.map.merge(other.map);
    }
}
