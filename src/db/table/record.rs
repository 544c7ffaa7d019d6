use crate::core::types::Value;

/// One row of the stock table.
///
/// Values are positional and line up with the schema's columns. A NULL
/// primary key asks the store to assign the next free id.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The ordered values in this record.
    pub values: Vec<Value>,
}

impl Record {
    /// Creates a new record from a vector of values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Builds a record in the used-car layout.
    pub fn car(
        id: Option<i64>,
        make: &str,
        model: &str,
        car_type: &str,
        year: i64,
        mileage: i64,
        price: i64,
    ) -> Self {
        Self::new(vec![
            id.map_or(Value::Null, Value::Integer),
            Value::from(make),
            Value::from(model),
            Value::from(car_type),
            Value::Integer(year),
            Value::Integer(mileage),
            Value::Integer(price),
        ])
    }

    /// Gets a reference to the value at the given column index.
    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The primary key, if one has been assigned.
    pub fn id(&self) -> Option<i64> {
        self.values.first().and_then(Value::as_integer)
    }
}
