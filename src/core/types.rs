use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use strum::{Display, EnumString};

/// Storage kinds a column can be declared with.
///
/// The `Display` form is the SQL type name written into DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Kind {
    /// 64-bit signed integer.
    Integer,

    /// UTF-8 text.
    Text,

    /// 64-bit floating point number.
    ///
    /// Storable and editable, but not searchable.
    Real,
}

/// A value held in one column of a record.
///
/// Values are strongly typed and correspond to [`Kind`] definitions.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    /// A 64-bit signed integer value.
    Integer(i64),

    /// A 64-bit floating point number.
    Real(f64),

    /// A UTF-8 text string.
    Text(String),

    /// Absence of data. For the primary key this means "assign one".
    Null,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl Value {
    /// The kind of this value, `None` for NULL.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Integer(_) => Some(Kind::Integer),
            Value::Real(_) => Some(Kind::Real),
            Value::Text(_) => Some(Kind::Text),
            Value::Null => None,
        }
    }

    /// Checks if this value can be stored in a column of the given kind.
    ///
    /// NULL is accepted by every kind.
    pub fn is_compatible_with(&self, kind: Kind) -> bool {
        self.kind().is_none_or(|own| own == kind)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(r) => ToSqlOutput::from(*r),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Value::Null),
            ValueRef::Integer(i) => Ok(Value::Integer(i)),
            ValueRef::Real(r) => Ok(Value::Real(r)),
            ValueRef::Text(_) => value.as_str().map(|s| Value::Text(s.to_owned())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sql_names() {
        assert_eq!(Kind::Integer.to_string(), "INTEGER");
        assert_eq!(Kind::Text.to_string(), "TEXT");
        assert_eq!(Kind::Real.to_string(), "REAL");
    }

    #[test]
    fn test_kind_parses_case_insensitive() {
        assert_eq!("integer".parse::<Kind>().unwrap(), Kind::Integer);
        assert_eq!("Text".parse::<Kind>().unwrap(), Kind::Text);
        assert!("BLOB".parse::<Kind>().is_err());
    }

    #[test]
    fn test_value_compatibility() {
        assert!(Value::Integer(3).is_compatible_with(Kind::Integer));
        assert!(Value::Null.is_compatible_with(Kind::Text));
        assert!(!Value::Text("Ford".to_string()).is_compatible_with(Kind::Integer));
        assert!(!Value::Real(1.5).is_compatible_with(Kind::Integer));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(45900).to_string(), "45900");
        assert_eq!(Value::from("Focus").to_string(), "Focus");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
