use std::fmt;

use crate::identity::QualifiedNameType;
use crate::project::BuilderCapabilities;

/// The kind of directed dependency edge between two model objects.
///
/// The kind decides how far the resolver keeps walking once it has recorded
/// the edge; see [`DependencyType::continuation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DependencyType {
    /// Source is declared as a subtype/specialization of target.
    Subtype,
    /// Source is a runtime instance or content object of the type target
    /// (product component of a type, enum content of an enum type, table
    /// content of a table structure).
    InstanceOf,
    /// Source holds a structural reference to target (association, or a
    /// composition detail-to-master link) that is not a subtype/instance
    /// relation.
    Reference,
    /// Source is a detail object whose composition master is target. Only
    /// relevant to builders that generate the whole master+detail aggregate
    /// as a single unit.
    CompositionMasterDetail,
    /// Source's declared datatype resolves to target, e.g. an attribute
    /// typed as an enumeration.
    Datatype,
    /// Source's validation logic references target, e.g. a table used as a
    /// validation lookup.
    Validation,
}

/// How the resolver continues after recording an edge of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Record the edge; do not recurse from its source.
    Terminal,
    /// Recurse from the edge's source with no filter: every dependency type
    /// found there is recorded and continues by its own rule.
    Unfiltered,
    /// Recurse from the edge's source, but at that next hop only `InstanceOf`
    /// edges are recorded (and they are terminal); everything else found
    /// there is discarded.
    InstancesOnly,
}

impl DependencyType {
    /// The complete propagation policy, in one place.
    ///
    /// A subtype's generated artifact is inseparable from a changed
    /// supertype, so `Subtype` cascades without restriction. A structural
    /// reference or datatype use must reach the concrete instances that need
    /// regenerating but must not re-trigger a full structural cascade.
    /// `CompositionMasterDetail` only cascades when the project's builder
    /// materializes the whole aggregate as one unit.
    pub fn continuation(self, capabilities: &BuilderCapabilities) -> Continuation {
        match self {
            DependencyType::Subtype => Continuation::Unfiltered,
            DependencyType::CompositionMasterDetail => {
                if capabilities.contains_aggregate_root_builder {
                    Continuation::Unfiltered
                } else {
                    Continuation::Terminal
                }
            }
            DependencyType::Reference | DependencyType::Datatype => Continuation::InstancesOnly,
            DependencyType::InstanceOf | DependencyType::Validation => Continuation::Terminal,
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyType::Subtype => "subtype",
            DependencyType::InstanceOf => "instanceof",
            DependencyType::Reference => "reference",
            DependencyType::CompositionMasterDetail => "composition-master-detail",
            DependencyType::Datatype => "datatype",
            DependencyType::Validation => "validation",
        };
        f.write_str(s)
    }
}

/// A directed, typed dependency edge: `source`'s generated artifact depends
/// on `target`. Pure value type; equality and hashing are structural over the
/// whole triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dependency {
    source: QualifiedNameType,
    target: QualifiedNameType,
    dep_type: DependencyType,
}

impl Dependency {
    pub fn new(
        source: QualifiedNameType,
        target: QualifiedNameType,
        dep_type: DependencyType,
    ) -> Self {
        Self {
            source,
            target,
            dep_type,
        }
    }

    pub fn source(&self) -> &QualifiedNameType {
        &self.source
    }

    pub fn target(&self) -> &QualifiedNameType {
        &self.target
    }

    pub fn dep_type(&self) -> DependencyType {
        self.dep_type
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.source, self.dep_type, self.target)
    }
}
