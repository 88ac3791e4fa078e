//! Entity metadata: declared mappings and the resolved descriptors the
//! compiler works from.
//!
//! A type declares an [`EntityMapping`] once; [`EntityDescriptor::from_mapping`]
//! normalizes it (name derivation, ignored-field filtering, primary-key
//! election) into the immutable form every compile consults.

pub mod naming;
pub mod registry;

pub use registry::EntityRegistry;

use crate::ast::{FieldKind, Value};
use crate::dialect::SqlGenerator;
use crate::error::{RelqError, RelqResult};
use naming::to_snake_case;

/// Declared mapping for one entity field.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    pub name: &'static str,
    /// Explicit column name; derived from `name` when absent.
    pub column: Option<&'static str>,
    pub kind: FieldKind,
    pub primary_key: bool,
    /// Database-generated key, excluded from INSERT column lists.
    pub identity: bool,
    pub nullable: bool,
    /// Ignored fields never reach the descriptor.
    pub ignored: bool,
}

impl FieldMapping {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column: None,
            kind,
            primary_key: false,
            identity: false,
            nullable: false,
            ignored: false,
        }
    }

    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}

/// Declared mapping for an entity type.
#[derive(Debug, Clone)]
pub struct EntityMapping {
    pub type_name: &'static str,
    /// Explicit table name; derived from `type_name` when absent.
    pub table: Option<&'static str>,
    pub schema: Option<&'static str>,
    pub fields: Vec<FieldMapping>,
}

impl EntityMapping {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            table: None,
            schema: None,
            fields: Vec::new(),
        }
    }

    pub fn table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }
}

/// A type that can be stored and queried.
///
/// `values` returns the current field values in declared order, skipping
/// ignored fields, parallel to the descriptor's column list.
pub trait Entity: 'static {
    fn mapping() -> EntityMapping;
    fn values(&self) -> Vec<Value>;
}

/// One resolved column of an entity descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub field: String,
    pub column: String,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub identity: bool,
    pub nullable: bool,
}

/// Resolved, immutable metadata for one entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub type_name: String,
    pub table: String,
    pub schema: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    /// Index into `columns` of the elected primary key, when one is flagged.
    pub primary_key: Option<usize>,
}

impl EntityDescriptor {
    /// Normalize a declared mapping. Fails when every field is ignored,
    /// since a descriptor with no columns can satisfy no statement.
    pub fn from_mapping(mapping: &EntityMapping) -> RelqResult<Self> {
        let mut columns = Vec::with_capacity(mapping.fields.len());
        let mut primary_key = None;
        for field in mapping.fields.iter().filter(|f| !f.ignored) {
            if field.primary_key && primary_key.is_none() {
                primary_key = Some(columns.len());
            }
            columns.push(ColumnDescriptor {
                field: field.name.to_string(),
                column: field
                    .column
                    .map(str::to_string)
                    .unwrap_or_else(|| to_snake_case(field.name)),
                kind: field.kind,
                primary_key: field.primary_key,
                identity: field.identity,
                nullable: field.nullable,
            });
        }
        if columns.is_empty() {
            return Err(RelqError::UnknownType(mapping.type_name.to_string()));
        }
        Ok(Self {
            type_name: mapping.type_name.to_string(),
            table: mapping
                .table
                .map(str::to_string)
                .unwrap_or_else(|| to_snake_case(mapping.type_name)),
            schema: mapping.schema.map(str::to_string),
            columns,
            primary_key,
        })
    }

    pub fn column_for_field(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Column name for a field reference. Unknown fields fall back to the
    /// lowercased field name rather than failing the whole compile.
    pub fn resolve_column(&self, field: &str) -> String {
        match self.column_for_field(field) {
            Some(col) => col.column.clone(),
            None => field.to_lowercase(),
        }
    }

    pub fn primary_key_column(&self) -> Option<&ColumnDescriptor> {
        self.primary_key.map(|i| &self.columns[i])
    }

    /// Quoted table reference, schema-qualified when a schema is declared.
    pub fn qualified_table(&self, generator: &dyn SqlGenerator) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}",
                generator.quote_identifier(schema),
                generator.quote_identifier(&self.table)
            ),
            None => generator.quote_identifier(&self.table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> EntityMapping {
        EntityMapping::new("UserAccount")
            .field(FieldMapping::new("ID", FieldKind::Int).primary_key().identity())
            .field(FieldMapping::new("UserName", FieldKind::Text))
            .field(FieldMapping::new("Secret", FieldKind::Text).ignored())
    }

    #[test]
    fn derives_snake_case_names() {
        let d = EntityDescriptor::from_mapping(&mapping()).unwrap();
        assert_eq!(d.table, "user_account");
        assert_eq!(d.columns[0].column, "id");
        assert_eq!(d.columns[1].column, "user_name");
    }

    #[test]
    fn ignored_fields_are_dropped() {
        let d = EntityDescriptor::from_mapping(&mapping()).unwrap();
        assert_eq!(d.columns.len(), 2);
        assert!(d.column_for_field("Secret").is_none());
    }

    #[test]
    fn first_flagged_primary_key_is_elected() {
        let d = EntityDescriptor::from_mapping(&mapping()).unwrap();
        let pk = d.primary_key_column().unwrap();
        assert_eq!(pk.field, "ID");
        assert!(pk.identity);
    }

    #[test]
    fn all_ignored_is_an_error() {
        let m = EntityMapping::new("Ghost")
            .field(FieldMapping::new("Hidden", FieldKind::Int).ignored());
        assert!(matches!(
            EntityDescriptor::from_mapping(&m),
            Err(RelqError::UnknownType(name)) if name == "Ghost"
        ));
    }

    #[test]
    fn unknown_field_falls_back_to_lowercase() {
        let d = EntityDescriptor::from_mapping(&mapping()).unwrap();
        assert_eq!(d.resolve_column("Mystery"), "mystery");
    }
}
