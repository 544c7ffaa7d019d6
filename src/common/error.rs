use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::types::Kind;

/// Errors raised by the store, its command builders and the interactive loop.
#[derive(Debug, Error, Diagnostic)]
pub enum DatabaseError {
    /// The database file could not be opened. Nothing else can run.
    #[error("failed to connect to {}", .path.display())]
    #[diagnostic(code(car_stock::connection))]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("error when creating table {table}")]
    #[diagnostic(
        code(car_stock::schema),
        help("the session continues assuming the table already exists")
    )]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("entry was not written to the database, check the ID is unique")]
    #[diagnostic(code(car_stock::insert))]
    Insert {
        #[source]
        source: rusqlite::Error,
    },

    #[error("error when trying to change ID {id}, column {column}")]
    #[diagnostic(code(car_stock::update))]
    Update {
        id: i64,
        column: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("entry could not be deleted from the database, check ID {id} is valid")]
    #[diagnostic(code(car_stock::delete))]
    Delete {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },

    #[error("error when trying to find entries in the database")]
    #[diagnostic(code(car_stock::query))]
    Query {
        #[source]
        source: rusqlite::Error,
    },

    #[error("no search parameters given")]
    #[diagnostic(
        code(car_stock::empty_criteria),
        help("add at least one text pattern or numeric range")
    )]
    EmptyCriteria,

    /// A column of a kind the search path cannot express was selected.
    ///
    /// This points at inconsistent column metadata rather than bad input,
    /// so the interactive loop stops instead of reporting and continuing.
    #[error("unexpected type {kind} for column {column}")]
    #[diagnostic(code(car_stock::unsupported_kind))]
    UnsupportedKind { column: String, kind: Kind },

    #[error("column index {index} is out of range, the schema has {count} columns")]
    #[diagnostic(code(car_stock::column_index))]
    ColumnIndex { index: usize, count: usize },

    #[error("the primary key column {0} cannot be changed")]
    #[diagnostic(code(car_stock::immutable_primary_key))]
    ImmutablePrimaryKey(String),

    #[error("type mismatch: {0}")]
    #[diagnostic(code(car_stock::type_mismatch))]
    TypeMismatch(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(car_stock::io))]
    Io(#[from] std::io::Error),
}

impl DatabaseError {
    /// Whether the interactive loop has to stop on this error.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::UnsupportedKind { .. } | Self::Io(_))
    }
}

/// Rejection of a single line of scalar input. The line is asked for again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Error - Input {0} is not an integer")]
    NotAnInteger(String),

    #[error("Error - Input {0} is not a number")]
    NotANumber(String),

    #[error("Error, number must be between {min} and {max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
}
