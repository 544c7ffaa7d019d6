use super::{column_def::ColumnDef, record::Record};
use crate::{
    DatabaseError,
    core::types::{Kind, Value},
};

/// Oldest model year accepted for stock.
pub const MIN_YEAR: i64 = 1970;

/// Upper bound for both mileage and price.
pub const MAX_MILEAGE_OR_PRICE: i64 = 250_000;

/// The ordered column layout of the stock table.
///
/// Column 0 is always the integer primary key. A schema is built once at
/// startup and never changes afterwards, so the columns are only reachable
/// through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a schema from its column definitions.
    ///
    /// Fails when the first column is not a usable primary key.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, DatabaseError> {
        match columns.first() {
            Some(pk) if pk.kind == Kind::Integer && pk.default.is_none() => Ok(Self { columns }),
            Some(pk) => Err(DatabaseError::TypeMismatch(format!(
                "primary key column {} must be INTEGER without a default",
                pk.name
            ))),
            None => Err(DatabaseError::ColumnIndex { index: 0, count: 0 }),
        }
    }

    /// The used-car stock layout, with `Year` capped at `current_year`.
    pub fn used_cars(current_year: i64) -> Self {
        Self {
            columns: vec![
                ColumnDef::new("ID", Kind::Integer, 5),
                ColumnDef::new("Make", Kind::Text, 10),
                ColumnDef::new("Model", Kind::Text, 10),
                ColumnDef::new("Type", Kind::Text, 12).capitalized(),
                ColumnDef::new("Year", Kind::Integer, 7)
                    .with_default(Value::Integer(0))
                    .with_range(MIN_YEAR..=current_year),
                ColumnDef::new("Mileage", Kind::Integer, 10)
                    .with_default(Value::Integer(0))
                    .with_range(0..=MAX_MILEAGE_OR_PRICE),
                ColumnDef::new("Price", Kind::Integer, 8)
                    .with_default(Value::Integer(0))
                    .with_range(0..=MAX_MILEAGE_OR_PRICE),
            ],
        }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column at `index`.
    pub fn column_at(&self, index: usize) -> Result<&ColumnDef, DatabaseError> {
        self.columns.get(index).ok_or(DatabaseError::ColumnIndex {
            index,
            count: self.columns.len(),
        })
    }

    pub fn is_primary_key(&self, index: usize) -> bool {
        index == 0
    }

    pub fn primary_key(&self) -> &ColumnDef {
        &self.columns[0]
    }

    /// Checks a record has one value per column and each value fits its kind.
    pub fn validate_record(&self, record: &Record) -> Result<(), DatabaseError> {
        if record.values.len() != self.columns.len() {
            return Err(DatabaseError::TypeMismatch(format!(
                "record has {} values, the schema has {} columns",
                record.values.len(),
                self.columns.len()
            )));
        }

        for (value, column) in record.values.iter().zip(&self.columns) {
            if !value.is_compatible_with(column.kind) {
                return Err(DatabaseError::TypeMismatch(format!(
                    "{value:?} cannot be stored in {} column {}",
                    column.kind, column.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_cars_layout() {
        let schema = Schema::used_cars(2024);
        let names: Vec<_> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["ID", "Make", "Model", "Type", "Year", "Mileage", "Price"]
        );
        assert_eq!(schema.column_at(4).unwrap().range, Some(1970..=2024));
        assert_eq!(schema.column_at(6).unwrap().range, Some(0..=250_000));
        assert!(schema.primary_key().default.is_none());
        assert!(schema.primary_key().range.is_none());
    }

    #[test]
    fn test_column_at_out_of_range() {
        let schema = Schema::used_cars(2024);
        assert!(schema.column_at(6).is_ok());
        assert!(matches!(
            schema.column_at(7),
            Err(DatabaseError::ColumnIndex { index: 7, count: 7 })
        ));
    }

    #[test]
    fn test_only_first_column_is_primary_key() {
        let schema = Schema::used_cars(2024);
        assert!(schema.is_primary_key(0));
        assert!((1..schema.column_count()).all(|i| !schema.is_primary_key(i)));
    }

    #[test]
    fn test_new_rejects_text_primary_key() {
        let result = Schema::new(vec![ColumnDef::new("Reg", Kind::Text, 8)]);
        assert!(matches!(result, Err(DatabaseError::TypeMismatch(_))));
        assert!(Schema::new(Vec::new()).is_err());
    }

    #[test]
    fn test_validate_record() {
        let schema = Schema::used_cars(2024);
        let valid = Record::car(None, "Ford", "Ka", "Hatchback", 2012, 50000, 2500);
        assert!(schema.validate_record(&valid).is_ok());

        let short = Record::new(vec![Value::Integer(1), Value::from("Ford")]);
        assert!(schema.validate_record(&short).is_err());

        let mut wrong_kind = valid.clone();
        wrong_kind.values[4] = Value::from("twenty");
        assert!(matches!(
            schema.validate_record(&wrong_kind),
            Err(DatabaseError::TypeMismatch(_))
        ));
    }
}
