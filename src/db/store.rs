use std::path::PathBuf;

use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info};

use crate::{
    DatabaseError,
    common::config::Config,
    core::types::Value,
    db::table::{Record, Schema, TableDef},
    sql::{
        command::{self, Command},
        predicate::SearchCriteria,
    },
};

/// Which rows a query selects.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every row in the table.
    All,

    /// The single row with this primary key.
    ById(i64),

    /// Rows matching every criterion.
    Criteria(SearchCriteria),
}

/// The record store: one SQLite connection and the one table it manages.
///
/// The connection is opened once and held for the whole session. It is
/// closed by [`Store::close`] on the normal path and by `Drop` on every
/// other one, including unwinding.
///
/// Update and delete do not check that the id exists. Callers that need to
/// tell the user about unknown ids look the row up first.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    table: TableDef,
    path: PathBuf,
}

impl Store {
    /// Opens (creating if needed) the database file named in `config`.
    pub fn open(config: &Config, schema: Schema) -> Result<Self, DatabaseError> {
        let path = config.database_path.clone();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::Connection {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), table = %config.table, "opened stock database");

        Ok(Self {
            conn,
            table: TableDef::new(config.table.clone(), schema),
            path,
        })
    }

    /// Opens a private in-memory database. Contents vanish on close.
    pub fn open_in_memory(table: &str, schema: Schema) -> Result<Self, DatabaseError> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::Connection {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            conn,
            table: TableDef::new(table, schema),
            path,
        })
    }

    pub fn table(&self) -> &TableDef {
        &self.table
    }

    pub fn schema(&self) -> &Schema {
        self.table.schema()
    }

    /// Creates the table if it does not exist yet. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let ddl = command::build_create_table(&self.table);
        debug!(sql = %ddl, "ensure schema");

        self.conn
            .execute(&ddl, [])
            .map_err(|source| DatabaseError::Schema {
                table: self.table.name().to_string(),
                source,
            })?;
        Ok(())
    }

    /// Inserts records, skipping any whose id is already taken.
    ///
    /// The batch runs in one transaction. Returns how many rows were
    /// actually written.
    pub fn insert(&self, records: &[Record]) -> Result<usize, DatabaseError> {
        let batch = command::build_insert(&self.table, records)?;
        debug!(sql = %batch.sql, rows = batch.rows.len(), "insert");

        let insert_error = |source| DatabaseError::Insert { source };

        let tx = self.conn.unchecked_transaction().map_err(insert_error)?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&batch.sql).map_err(insert_error)?;
            for row in &batch.rows {
                inserted += stmt
                    .execute(params_from_iter(row.iter()))
                    .map_err(insert_error)?;
            }
        }
        tx.commit().map_err(insert_error)?;

        if inserted < batch.rows.len() {
            debug!(
                skipped = batch.rows.len() - inserted,
                "ignored records with existing ids"
            );
        }

        Ok(inserted)
    }

    /// Inserts the initial stock. Cars already present are left alone.
    pub fn seed(&self, records: &[Record]) -> Result<usize, DatabaseError> {
        let inserted = self.insert(records)?;
        info!(inserted, offered = records.len(), "seeded initial stock");
        Ok(inserted)
    }

    /// Sets one column of one row. Returns the number of rows changed,
    /// which is zero for an unknown id.
    pub fn update(&self, id: i64, column: usize, value: Value) -> Result<usize, DatabaseError> {
        let update = command::build_update(&self.table, id, column, value)?;
        debug!(sql = %update.sql, id, column, "update");

        self.execute(&update).map_err(|source| DatabaseError::Update {
            id,
            column: self.schema().columns()[column].name.clone(),
            source,
        })
    }

    /// Deletes one row by id. Deleting an unknown id succeeds and returns zero.
    pub fn delete(&self, id: i64) -> Result<usize, DatabaseError> {
        let delete = command::build_delete(&self.table, id);
        debug!(sql = %delete.sql, id, "delete");

        self.execute(&delete)
            .map_err(|source| DatabaseError::Delete { id, source })
    }

    /// Prepares a query. Nothing is read until the selection is consumed.
    ///
    /// Empty search criteria are rejected here, before any statement exists.
    pub fn query(&self, filter: Filter) -> Result<Selection<'_>, DatabaseError> {
        let command = match filter {
            Filter::All => command::build_select_all(&self.table),
            Filter::ById(id) => command::build_select_by_id(&self.table, id),
            Filter::Criteria(criteria) => command::build_search(&self.table, &criteria)?,
        };

        Ok(Selection {
            store: self,
            command,
        })
    }

    /// Closes the connection, reporting any error from the final flush.
    pub fn close(self) -> Result<(), DatabaseError> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, source)| DatabaseError::Connection { path, source })?;
        debug!("closed stock database");
        Ok(())
    }

    fn execute(&self, command: &Command) -> rusqlite::Result<usize> {
        self.conn
            .execute(&command.sql, params_from_iter(command.params.iter()))
    }
}

/// The result of [`Store::query`]: a finite sequence of records that is
/// read from the table each time it is consumed.
#[derive(Debug)]
pub struct Selection<'s> {
    store: &'s Store,
    command: Command,
}

impl Selection<'_> {
    /// Runs the query and collects every matching record.
    pub fn records(&self) -> Result<Vec<Record>, DatabaseError> {
        debug!(sql = %self.command.sql, "query");
        let query_error = |source| DatabaseError::Query { source };
        let arity = self.store.schema().column_count();

        let mut stmt = self
            .store
            .conn
            .prepare(&self.command.sql)
            .map_err(query_error)?;
        let rows = stmt
            .query_map(params_from_iter(self.command.params.iter()), |row| {
                record_from_row(row, arity)
            })
            .map_err(query_error)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
    }

    /// Runs the query and reads only the first matching record.
    pub fn first(&self) -> Result<Option<Record>, DatabaseError> {
        debug!(sql = %self.command.sql, "query first");
        let query_error = |source| DatabaseError::Query { source };
        let arity = self.store.schema().column_count();

        let mut stmt = self
            .store
            .conn
            .prepare(&self.command.sql)
            .map_err(query_error)?;
        let mut rows = stmt
            .query(params_from_iter(self.command.params.iter()))
            .map_err(query_error)?;

        match rows.next().map_err(query_error)? {
            Some(row) => Ok(Some(record_from_row(row, arity).map_err(query_error)?)),
            None => Ok(None),
        }
    }
}

fn record_from_row(row: &rusqlite::Row<'_>, arity: usize) -> rusqlite::Result<Record> {
    (0..arity)
        .map(|idx| row.get::<_, Value>(idx))
        .collect::<rusqlite::Result<Vec<_>>>()
        .map(Record::new)
}
