use std::collections::BTreeMap;

use crate::{
    DatabaseError, Kind, Schema,
    cli::input::Prompter,
};

/// An inclusive integer range with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    min: i64,
    max: i64,
}

impl IntRange {
    /// Creates a range from two bounds given in either order.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

/// Search filter: text patterns and integer ranges, all combined with AND.
///
/// Both maps are keyed by schema column index, so a criterion can only ever
/// name a column the schema declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    text: BTreeMap<usize, String>,
    ranges: BTreeMap<usize, IntRange>,
}

impl SearchCriteria {
    /// `LIKE` pattern for a column. `%` and `_` keep their SQL meaning.
    pub fn add_text(&mut self, column: usize, pattern: impl Into<String>) {
        self.text.insert(column, pattern.into());
    }

    pub fn add_range(&mut self, column: usize, range: IntRange) {
        self.ranges.insert(column, range);
    }

    pub fn text(&self) -> &BTreeMap<usize, String> {
        &self.text
    }

    pub fn ranges(&self) -> &BTreeMap<usize, IntRange> {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.ranges.is_empty()
    }
}

/// Collects search criteria one column at a time, checking each column's kind.
///
/// Integer columns take a range, text columns a pattern. Any other kind is
/// rejected with [`DatabaseError::UnsupportedKind`].
pub struct PredicateBuilder<'a> {
    schema: &'a Schema,
    criteria: SearchCriteria,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            criteria: SearchCriteria::default(),
        }
    }

    fn column_of_kind(&self, column: usize, wanted: Kind) -> Result<(), DatabaseError> {
        let column_def = self.schema.column_at(column)?;
        match column_def.kind {
            Kind::Integer | Kind::Text if column_def.kind == wanted => Ok(()),
            Kind::Integer | Kind::Text => Err(DatabaseError::TypeMismatch(format!(
                "column {} is {}, not {wanted}",
                column_def.name, column_def.kind
            ))),
            other => Err(DatabaseError::UnsupportedKind {
                column: column_def.name.clone(),
                kind: other,
            }),
        }
    }

    /// Adds a case-insensitive pattern for a text column.
    pub fn text(
        &mut self,
        column: usize,
        pattern: impl Into<String>,
    ) -> Result<&mut Self, DatabaseError> {
        self.column_of_kind(column, Kind::Text)?;
        self.criteria.add_text(column, pattern);
        Ok(self)
    }

    /// Adds a range for an integer column. The bounds may come in any order.
    pub fn range(&mut self, column: usize, a: i64, b: i64) -> Result<&mut Self, DatabaseError> {
        self.column_of_kind(column, Kind::Integer)?;
        self.criteria.add_range(column, IntRange::new(a, b));
        Ok(self)
    }

    /// Asks the input collaborator for the criterion of one column.
    ///
    /// Integer columns are asked for a maximum and then a minimum, each
    /// checked against the column's range. Text columns are asked for a
    /// single pattern.
    pub fn prompt_column<P: Prompter>(
        &mut self,
        column: usize,
        input: &mut P,
    ) -> Result<&mut Self, DatabaseError> {
        let column_def = self.schema.column_at(column)?;
        let name = column_def.name.clone();

        match column_def.kind {
            Kind::Integer => {
                let range = column_def.range.clone();
                let first = input.read_integer(&format!("Input max {name}"), range.clone())?;
                let second = input.read_integer(&format!("Input min {name}"), range)?;
                self.range(column, first, second)
            }
            Kind::Text => {
                let pattern = input.read_text(&format!("Input {name}"), None)?;
                self.text(column, pattern)
            }
            other => Err(DatabaseError::UnsupportedKind { column: name, kind: other }),
        }
    }

    pub fn build(self) -> SearchCriteria {
        self.criteria
    }
}
