pub mod column_def;
pub mod record;
pub mod schema;
pub mod stock;
pub mod table_def;

pub use column_def::ColumnDef;
pub use record::Record;
pub use schema::Schema;
pub use table_def::TableDef;
