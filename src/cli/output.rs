use std::io::Write;

use crate::{DatabaseError, Record, Schema};

/// The output side of the interactive session.
pub trait Renderer {
    /// Shows a titled table of records, or a "no data" line when empty.
    fn render(&mut self, title: &str, schema: &Schema, records: &[Record])
    -> Result<(), DatabaseError>;

    /// Shows a free-standing line such as a menu entry or an error report.
    fn message(&mut self, text: &str) -> Result<(), DatabaseError>;
}

/// Formats records as right-justified columns, one line per record.
pub fn format_records(title: &str, schema: &Schema, records: &[Record]) -> String {
    let mut lines = vec![title.to_string()];

    lines.push(
        schema
            .columns()
            .iter()
            .map(|col| format!("{:>width$}", col.name, width = col.width))
            .collect(),
    );

    for record in records {
        lines.push(
            record
                .values
                .iter()
                .zip(schema.columns())
                .map(|(value, col)| format!("{:>width$}", value.to_string(), width = col.width))
                .collect(),
        );
    }

    if records.is_empty() {
        lines.push("No data found".to_string());
    }

    lines.join("\n")
}

/// Writes tables and messages to any writer, normally stdout.
pub struct TableOutput<W> {
    out: W,
}

impl<W: Write> TableOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TableOutput<W> {
    fn render(
        &mut self,
        title: &str,
        schema: &Schema,
        records: &[Record],
    ) -> Result<(), DatabaseError> {
        writeln!(self.out, "{}", format_records(title, schema, records))?;
        self.out.flush()?;
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<(), DatabaseError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}
