mod result;

pub use result::ResolutionResult;

use std::collections::HashSet;
use std::sync::Arc;

use crate::graph::dependency::{Continuation, Dependency, DependencyType};
use crate::identity::QualifiedNameType;
use crate::project::{ObjectHandle, Project, ProjectId};
use crate::store::DependencyGraphStore;

/// Expands a change set into the full set of objects, across projects, whose
/// generated artifacts must be rebuilt.
///
/// A resolver is bound to a single home project; it walks the home project's
/// dependency graph and, through each project's referencing projects, the
/// graphs of every project that transitively consumes the home project's
/// output. All graph access goes through the shared [`DependencyGraphStore`],
/// taken per graph and per visit — a walk is a snapshot consistent only up to
/// the order of graph accesses, never a cross-graph transaction.
pub struct DependencyResolver {
    store: Arc<DependencyGraphStore>,
    project: Arc<dyn Project>,
}

impl DependencyResolver {
    pub fn new(store: Arc<DependencyGraphStore>, project: Arc<dyn Project>) -> Self {
        Self { store, project }
    }

    /// Batch entry point for an incremental build cycle: resolves every
    /// added, changed or removed object once and merges the results. Carries
    /// no semantics beyond iterating [`collect_dependencies`](Self::collect_dependencies).
    pub fn collect_dependencies_for_incremental_build(
        &self,
        added_or_changed: &[&dyn ObjectHandle],
        removed: &[&dyn ObjectHandle],
    ) -> ResolutionResult {
        let mut result = ResolutionResult::new();
        for handle in added_or_changed.iter().chain(removed.iter()) {
            result.merge(self.collect_dependencies(&handle.qualified_name_type()));
        }
        result
    }

    /// Everything that must be rebuilt because `id` changed, grouped by
    /// project. Idempotent for an unchanged set of graphs.
    pub fn collect_dependencies(&self, id: &QualifiedNameType) -> ResolutionResult {
        let mut result = ResolutionResult::new();
        let mut seen_projects: HashSet<ProjectId> = HashSet::new();
        tracing::debug!(object = %id, project = %self.project.id(), "collecting dependants");
        self.collect(id, &mut seen_projects, false, &mut result);
        tracing::debug!(
            object = %id,
            projects = result.project_count(),
            dependencies = result.dependency_count(),
            "dependant collection finished"
        );
        result
    }

    /// One recursion step: local expansion over the home graph, then fan-out
    /// into unseen referencing projects. `instances_only` is the restrictive
    /// continuation mode entered through `Reference`/`Datatype` edges.
    fn collect(
        &self,
        id: &QualifiedNameType,
        seen_projects: &mut HashSet<ProjectId>,
        instances_only: bool,
        result: &mut ResolutionResult,
    ) {
        // A project without a graph has never been built; a project that
        // cannot be built has nothing meaningful to contribute. Both stop
        // this branch entirely.
        let Some(graph) = self.store.get(self.project.id()) else {
            tracing::trace!(project = %self.project.id(), "no dependency graph, skipping");
            return;
        };
        if !self.project.can_be_built() {
            tracing::trace!(project = %self.project.id(), "project not buildable, skipping");
            return;
        }

        let dependants = graph.read().get_dependants(id);
        for dependency in dependants {
            if instances_only && dependency.dep_type() != DependencyType::InstanceOf {
                continue;
            }
            self.record_and_continue(dependency, seen_projects, result);
        }

        self.collect_from_referencing_projects(id, seen_projects, instances_only, result);
    }

    /// Record one found edge under the home project's bucket and, if it was
    /// not already recorded, keep walking from its source per the
    /// continuation policy. The newly-recorded guard is what terminates
    /// in-project edge cycles.
    fn record_and_continue(
        &self,
        dependency: Dependency,
        seen_projects: &mut HashSet<ProjectId>,
        result: &mut ResolutionResult,
    ) {
        let continuation = dependency
            .dep_type()
            .continuation(&self.project.builder_capabilities());
        let source = dependency.source().clone();
        if !result.insert(self.project.id().clone(), dependency) {
            return;
        }
        match continuation {
            Continuation::Terminal => {}
            Continuation::Unfiltered => self.collect(&source, seen_projects, false, result),
            Continuation::InstancesOnly => self.collect(&source, seen_projects, true, result),
        }
    }

    /// Cross-project expansion: every direct referencing project not yet
    /// visited repeats the same walk against its own graph. The shared
    /// visited set is what terminates reference cycles between projects.
    fn collect_from_referencing_projects(
        &self,
        id: &QualifiedNameType,
        seen_projects: &mut HashSet<ProjectId>,
        instances_only: bool,
        result: &mut ResolutionResult,
    ) {
        seen_projects.insert(self.project.id().clone());
        for referencing in self.project.referencing_projects() {
            if seen_projects.contains(referencing.id()) {
                continue;
            }
            tracing::trace!(
                object = %id,
                from = %self.project.id(),
                into = %referencing.id(),
                "expanding into referencing project"
            );
            let resolver = DependencyResolver::new(Arc::clone(&self.store), referencing);
            resolver.collect(id, seen_projects, instances_only, result);
        }
    }
}
