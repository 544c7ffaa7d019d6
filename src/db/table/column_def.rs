use std::ops::RangeInclusive;

use crate::core::types::{Kind, Value};

/// Definition of a single column in the stock table.
///
/// Carries everything the rest of the crate needs to know about a column:
/// the SQL name and kind for commands, the default for DDL, the display
/// width for rendering and the accepted range for integer input.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// The column name as shown in headers. Lowercased for SQL.
    pub name: String,

    /// The storage kind for values in this column.
    pub kind: Kind,

    /// Default written into the DDL, if any.
    pub default: Option<Value>,

    /// Number of characters a rendered cell is right-justified to.
    pub width: usize,

    /// Accepted values for entered integers. `None` means unbounded.
    pub range: Option<RangeInclusive<i64>>,

    /// Whether entered text is normalised to a leading capital.
    pub capitalized: bool,
}

impl ColumnDef {
    /// Creates a new column definition with no default, range or normalisation.
    pub fn new(name: &str, kind: Kind, width: usize) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            default: None,
            width,
            range: None,
            capitalized: false,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn capitalized(mut self) -> Self {
        self.capitalized = true;
        self
    }

    /// Identifier used in command text.
    pub fn sql_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Longest text accepted for this column.
    ///
    /// One short of the display width so adjacent right-justified cells
    /// keep a separating space.
    pub fn max_text_len(&self) -> usize {
        self.width.saturating_sub(1)
    }
}
