use std::fmt;

/// The kind of model object an identity refers to.
///
/// The kind is part of the identity because a project may contain, say, an
/// enum type and a table structure with the same qualified name; they are
/// distinct objects with distinct dependency entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    /// A model (policy-side) type definition.
    ModelType,
    /// A product component type definition.
    ProductComponentType,
    /// A product component: a configured instance of a product component type.
    ProductComponent,
    /// An enumeration type definition.
    EnumType,
    /// The value content of an enumeration type kept in a separate object.
    EnumContent,
    /// A table structure definition.
    TableStructure,
    /// The row content of a table kept in a separate object.
    TableContent,
}

impl ObjectKind {
    /// Stable lowercase identifier, used in Display output and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::ModelType => "model-type",
            ObjectKind::ProductComponentType => "product-cmpt-type",
            ObjectKind::ProductComponent => "product-cmpt",
            ObjectKind::EnumType => "enum-type",
            ObjectKind::EnumContent => "enum-content",
            ObjectKind::TableStructure => "table-structure",
            ObjectKind::TableContent => "table-content",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity of a model object: its fully-qualified name plus its kind.
///
/// Used as the graph node key and as a map key throughout the engine;
/// equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct QualifiedNameType {
    /// Fully-qualified object name, e.g. `motor.MotorPolicy`.
    pub qualified_name: String,
    /// The object kind the name refers to.
    pub kind: ObjectKind,
}

impl QualifiedNameType {
    pub fn new(qualified_name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }
}

impl fmt::Display for QualifiedNameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.qualified_name, self.kind)
    }
}
