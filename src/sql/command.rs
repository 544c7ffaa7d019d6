//! Builds the SQL text and bound values for every statement the store runs.
//!
//! Nothing here touches the connection. Identifiers are always taken from the
//! [`TableDef`] (table name and schema column names) and double-quoted; every
//! value, including ids, search patterns and range bounds, travels as a
//! numbered parameter.

use crate::{
    DatabaseError,
    core::types::Value,
    db::table::{Record, TableDef},
};

use super::predicate::SearchCriteria;

/// A single statement and its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Command {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

/// One statement executed once per parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCommand {
    pub sql: String,
    pub rows: Vec<Vec<Value>>,
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn default_literal(value: &Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "NULL".to_string(),
    }
}

fn column_list(table: &TableDef) -> String {
    table
        .schema()
        .columns()
        .iter()
        .map(|col| quote_identifier(&col.sql_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_prefix(table: &TableDef) -> String {
    format!(
        "SELECT {} FROM {}",
        column_list(table),
        quote_identifier(table.name())
    )
}

fn primary_key_name(table: &TableDef) -> String {
    quote_identifier(&table.schema().primary_key().sql_name())
}

/// `CREATE TABLE IF NOT EXISTS` for the whole schema.
///
/// The primary key is declared `INTEGER PRIMARY KEY UNIQUE`, which makes it
/// the rowid alias: never NULL once stored, and assigned automatically when a
/// NULL id is inserted. `DEFAULT` is only emitted for columns that have one.
pub fn build_create_table(table: &TableDef) -> String {
    let schema = table.schema();
    let columns = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let mut definition = format!("{} {}", quote_identifier(&col.sql_name()), col.kind);
            if schema.is_primary_key(idx) {
                definition.push_str(" PRIMARY KEY UNIQUE");
            } else if let Some(default) = &col.default {
                definition.push_str(" DEFAULT ");
                definition.push_str(&default_literal(default));
            }
            definition
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns})",
        quote_identifier(table.name())
    )
}

/// `INSERT OR IGNORE` for a batch of records.
///
/// A record whose id already exists is skipped by the engine while the rest
/// of the batch still goes in. Every record is checked against the schema
/// first.
pub fn build_insert(table: &TableDef, records: &[Record]) -> Result<BatchCommand, DatabaseError> {
    let schema = table.schema();
    for record in records {
        schema.validate_record(record)?;
    }

    let placeholders = (1..=schema.column_count())
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(BatchCommand {
        sql: format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({placeholders})",
            quote_identifier(table.name()),
            column_list(table)
        ),
        rows: records.iter().map(|r| r.values.clone()).collect(),
    })
}

/// Sets one column of the row with primary key `id`.
pub fn build_update(
    table: &TableDef,
    id: i64,
    column: usize,
    value: Value,
) -> Result<Command, DatabaseError> {
    let schema = table.schema();
    let column_def = schema.column_at(column)?;

    if schema.is_primary_key(column) {
        return Err(DatabaseError::ImmutablePrimaryKey(column_def.name.clone()));
    }

    if !value.is_compatible_with(column_def.kind) {
        return Err(DatabaseError::TypeMismatch(format!(
            "{value:?} cannot be stored in {} column {}",
            column_def.kind, column_def.name
        )));
    }

    Ok(Command::new(
        format!(
            "UPDATE {} SET {} = ?1 WHERE {} = ?2",
            quote_identifier(table.name()),
            quote_identifier(&column_def.sql_name()),
            primary_key_name(table)
        ),
        vec![value, Value::Integer(id)],
    ))
}

/// Removes the row with primary key `id`.
pub fn build_delete(table: &TableDef, id: i64) -> Command {
    Command::new(
        format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_identifier(table.name()),
            primary_key_name(table)
        ),
        vec![Value::Integer(id)],
    )
}

pub fn build_select_all(table: &TableDef) -> Command {
    Command::new(select_prefix(table), Vec::new())
}

pub fn build_select_by_id(table: &TableDef, id: i64) -> Command {
    Command::new(
        format!("{} WHERE {} = ?1", select_prefix(table), primary_key_name(table)),
        vec![Value::Integer(id)],
    )
}

/// Filtered `SELECT` for a set of search criteria.
///
/// Text criteria come first as `LIKE` clauses (case-insensitive for ASCII),
/// then range criteria as `BETWEEN` clauses, all joined with `AND`. Within each
/// group the clauses follow schema column order.
pub fn build_search(table: &TableDef, criteria: &SearchCriteria) -> Result<Command, DatabaseError> {
    if criteria.is_empty() {
        return Err(DatabaseError::EmptyCriteria);
    }

    let schema = table.schema();
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for (&column, pattern) in criteria.text() {
        let name = quote_identifier(&schema.column_at(column)?.sql_name());
        params.push(Value::Text(pattern.clone()));
        clauses.push(format!("{name} LIKE ?{}", params.len()));
    }

    for (&column, range) in criteria.ranges() {
        let name = quote_identifier(&schema.column_at(column)?.sql_name());
        params.push(Value::Integer(range.min()));
        params.push(Value::Integer(range.max()));
        clauses.push(format!(
            "{name} BETWEEN ?{} AND ?{}",
            params.len() - 1,
            params.len()
        ));
    }

    Ok(Command::new(
        format!("{} WHERE {}", select_prefix(table), clauses.join(" AND ")),
        params,
    ))
}
