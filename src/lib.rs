//! A used-car stock tool: a schema-driven record store on SQLite and the
//! interactive menu that edits it.

pub mod cli;
pub mod common;
pub mod core;
pub mod db;
pub mod sql;

pub use common::{config::Config, error::DatabaseError};
pub use crate::core::types::{Kind, Value};
pub use db::{
    store::{Filter, Selection, Store},
    table::*,
};
