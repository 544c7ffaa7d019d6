use std::path::PathBuf;

/// Default database file, created next to the working directory on first run.
pub const DEFAULT_DATABASE_FILE: &str = "used_car_stock.db";

/// Name of the one table the tool manages.
pub const DEFAULT_TABLE: &str = "cars_for_sale";

/// Startup settings for the stock tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding the table. Created if missing.
    pub database_path: PathBuf,

    /// Table name. Interpolated into every command, so it is fixed here and
    /// never taken from user input.
    pub table: String,

    /// Insert the initial stock (insert-or-ignore) at startup.
    pub seed_initial_stock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            table: DEFAULT_TABLE.to_string(),
            seed_initial_stock: true,
        }
    }
}

impl Config {
    /// Default settings pointing at a different database file.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Self::default()
        }
    }
}
