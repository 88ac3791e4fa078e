//! Projection target shapes.
//!
//! The shape of a projection is decided once, by the calling DSL layer, as an
//! explicit tagged variant. The compiler never inspects the host type system
//! to discover it.

use serde::{Deserialize, Serialize};

use super::values::FieldKind;

/// One field of the projection target shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetField {
    /// Target field name (also the SELECT alias).
    pub name: String,
    /// Source entity field to read from; defaults to the target name.
    pub source_field: Option<String>,
    /// Destination kind, fixing the row-value conversion for this field.
    pub kind: FieldKind,
}

impl TargetField {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            source_field: None,
            kind,
        }
    }

    /// Read from a differently-named source field.
    pub fn from_source(mut self, source: &str) -> Self {
        self.source_field = Some(source.to_string());
        self
    }

    pub(crate) fn source(&self) -> &str {
        self.source_field.as_deref().unwrap_or(&self.name)
    }
}

/// Target shape of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// A single scalar field.
    SingleField(TargetField),
    /// Named-member construction (settable fields on the result type).
    ObjectShape(Vec<TargetField>),
    /// Positional construction (one constructor taking all fields in order).
    PositionalShape(Vec<TargetField>),
}

impl Selector {
    /// Single scalar field selection.
    pub fn single(name: &str, kind: FieldKind) -> Self {
        Selector::SingleField(TargetField::new(name, kind))
    }

    /// Auto-mapping by same-name fields against a declared result shape.
    pub fn auto<R: ResultShape>() -> Self {
        Selector::ObjectShape(R::target_fields())
    }

    pub(crate) fn fields(&self) -> &[TargetField] {
        match self {
            Selector::SingleField(f) => std::slice::from_ref(f),
            Selector::ObjectShape(fields) => fields,
            Selector::PositionalShape(fields) => fields,
        }
    }
}

/// A result type that declares its own field list, enabling auto-mapping.
pub trait ResultShape {
    fn target_fields() -> Vec<TargetField>;
}
