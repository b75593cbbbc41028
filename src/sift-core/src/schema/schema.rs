//! Ordered collection of fields with unique names.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use common_error::{SiftError, SiftResult};

use super::Field;

/// Shared reference to a schema.
pub type SchemaRef = Arc<Schema>;

/// Ordered sequence of fields. Names are unique.
///
/// Deserialization goes through [`Schema::try_new`], so a serialized schema
/// is held to the same rules as one built in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaFields")]
pub struct Schema {
    fields: Vec<Field>,
}

/// Unchecked wire form of a schema.
#[derive(Deserialize)]
struct SchemaFields {
    fields: Vec<Field>,
}

impl TryFrom<SchemaFields> for Schema {
    type Error = SiftError;

    fn try_from(raw: SchemaFields) -> SiftResult<Self> {
        Self::try_new(raw.fields)
    }
}

impl Schema {
    /// Create a schema from its fields.
    ///
    /// Fails with `SchemaMismatch` on a duplicate name and with `TypeMismatch`
    /// on a field declared with the `Null` type.
    pub fn try_new(fields: Vec<Field>) -> SiftResult<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SiftError::schema_mismatch(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            if !field.data_type.is_column_type() {
                return Err(SiftError::type_mismatch(format!(
                    "field '{}' cannot be declared with type {}",
                    field.name, field.data_type
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Create an empty schema.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap this schema in an `Arc`.
    pub fn into_ref(self) -> SchemaRef {
        Arc::new(self)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field at `index`, if present.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Position of the field called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field called `name`, if present.
    pub fn field_with_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str("]")
    }
}
