use super::schema::Schema;

/// A named table together with its schema.
///
/// Both parts come from startup configuration, never from user input, which
/// is what makes them safe to interpolate into command text.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    /// The table name.
    pub(crate) name: String,

    /// The table's schema defining its columns.
    pub(crate) schema: Schema,
}

impl TableDef {
    /// Creates a new table definition with the given name and schema.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
