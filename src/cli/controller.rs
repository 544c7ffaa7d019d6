//! The interactive menu, run as an explicit state machine.

use std::io::ErrorKind;

use strum::{EnumIter, EnumMessage, FromRepr, IntoEnumIterator};
use tracing::{error, warn};

use crate::{
    Config, DatabaseError, Kind, Record, Value,
    cli::{
        input::{Prompter, capitalize},
        output::Renderer,
    },
    db::{
        store::{Filter, Store},
        table::stock::initial_stock,
    },
    sql::predicate::PredicateBuilder,
};

/// Entries of the main menu, listed in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumMessage)]
#[repr(u8)]
pub enum MenuOption {
    #[strum(message = "Display entire database")]
    ListAll = 1,
    #[strum(message = "Add a new entry")]
    Add = 2,
    #[strum(message = "Change an entry")]
    Change = 3,
    #[strum(message = "Delete an entry")]
    Delete = 4,
    #[strum(message = "Search database")]
    Search = 5,
    #[strum(message = "Exit")]
    Exit = 0,
}

/// States of the interactive loop. `Exit` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MenuPrompt,
    ListAll,
    Add,
    Change,
    Delete,
    Search,
    Exit,
}

impl From<MenuOption> for State {
    fn from(option: MenuOption) -> Self {
        match option {
            MenuOption::ListAll => State::ListAll,
            MenuOption::Add => State::Add,
            MenuOption::Change => State::Change,
            MenuOption::Delete => State::Delete,
            MenuOption::Search => State::Search,
            MenuOption::Exit => State::Exit,
        }
    }
}

/// Everything between opening and closing the connection: creates the table,
/// writes the initial stock, then runs the menu until the user exits.
///
/// A table that cannot be created is reported and the session carries on as
/// though it exists.
pub fn start_session<P: Prompter, R: Renderer>(
    store: &Store,
    config: &Config,
    input: P,
    mut output: R,
) -> Result<(), DatabaseError> {
    if let Err(err) = store.ensure_schema() {
        error!(%err, "could not create table, assuming it exists");
        output.message(&describe(&err))?;
    }

    if config.seed_initial_stock {
        match store.seed(&initial_stock()) {
            Ok(_) => {
                let records = store.query(Filter::All)?.records()?;
                output.render(
                    "Database after inserting initial stock of cars",
                    store.schema(),
                    &records,
                )?;
            }
            Err(err) => {
                warn!(%err, "initial stock not written");
                output.message(&describe(&err))?;
            }
        }
    }

    Controller::new(store, input, output).run()
}

/// Drives the menu: reads an intent, runs one store interaction, shows the
/// result, and goes back to the menu.
///
/// Failures of a single action are reported and the loop carries on. Only
/// errors for which [`DatabaseError::ends_session`] holds stop it.
pub struct Controller<'s, P, R> {
    store: &'s Store,
    input: P,
    output: R,
}

impl<'s, P: Prompter, R: Renderer> Controller<'s, P, R> {
    pub fn new(store: &'s Store, input: P, output: R) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Runs from `MenuPrompt` until `Exit`.
    pub fn run(&mut self) -> Result<(), DatabaseError> {
        let mut state = State::MenuPrompt;
        while state != State::Exit {
            state = self.step(state)?;
        }
        Ok(())
    }

    /// Performs one transition of the state machine.
    pub fn step(&mut self, state: State) -> Result<State, DatabaseError> {
        match state {
            State::MenuPrompt => self.prompt_menu(),
            State::Exit => Ok(State::Exit),
            action => {
                if let Err(err) = self.perform(action) {
                    if err.ends_session() {
                        error!(%err, ?action, "ending session");
                        return Err(err);
                    }
                    warn!(%err, ?action, "action failed");
                    self.output.message(&describe(&err))?;
                }
                Ok(State::MenuPrompt)
            }
        }
    }

    fn prompt_menu(&mut self) -> Result<State, DatabaseError> {
        self.output.message("\nOptions :")?;
        for option in MenuOption::iter() {
            let label = option.get_message().unwrap_or_default();
            self.output.message(&format!("{}. {label}", option as u8))?;
        }

        let choice = match self.input.read_integer("Choose option", Some(0..=5)) {
            Ok(choice) => choice,
            Err(DatabaseError::Io(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                return Ok(State::Exit);
            }
            Err(err) => return Err(err),
        };

        Ok(u8::try_from(choice)
            .ok()
            .and_then(MenuOption::from_repr)
            .map_or(State::MenuPrompt, State::from))
    }

    fn perform(&mut self, action: State) -> Result<(), DatabaseError> {
        match action {
            State::ListAll => self.show_all("Car Database"),
            State::Add => self.add(),
            State::Change => self.change(),
            State::Delete => self.delete(),
            State::Search => self.search(),
            State::MenuPrompt | State::Exit => Ok(()),
        }
    }

    fn show_all(&mut self, title: &str) -> Result<(), DatabaseError> {
        let store = self.store;
        let records = store.query(Filter::All)?.records()?;
        self.output.render(title, store.schema(), &records)
    }

    fn add(&mut self) -> Result<(), DatabaseError> {
        let store = self.store;
        let mut values = vec![Value::Null];
        for (idx, column) in store.schema().columns().iter().enumerate().skip(1) {
            let value = match self.read_value(idx, &format!("Input {}", column.name))? {
                Value::Text(text) if column.capitalized => Value::Text(capitalize(&text)),
                value => value,
            };
            values.push(value);
        }

        store.insert(&[Record::new(values)])?;
        self.show_all("Database with new car added")
    }

    fn change(&mut self) -> Result<(), DatabaseError> {
        let store = self.store;
        let Some(id) = self.existing_id("Enter car ID number to be changed")? else {
            return Ok(());
        };

        let column = self.choose_column("Enter column name to be changed")?;
        let name = &store.schema().column_at(column)?.name;
        let value = self.read_value(column, &format!("Enter new value for {name}"))?;
        store.update(id, column, value)?;

        let changed = store.query(Filter::ById(id))?.records()?;
        self.output.render("Changed entry", store.schema(), &changed)
    }

    fn delete(&mut self) -> Result<(), DatabaseError> {
        let Some(id) = self.existing_id("Enter ID number of car to be deleted")? else {
            return Ok(());
        };

        self.store.delete(id)?;
        self.output.message(&format!("Deleted ID number {id}"))
    }

    fn search(&mut self) -> Result<(), DatabaseError> {
        let store = self.store;
        let column = self.choose_column("Enter search column name")?;

        let mut builder = PredicateBuilder::new(store.schema());
        builder.prompt_column(column, &mut self.input)?;

        let records = store.query(Filter::Criteria(builder.build()))?.records()?;
        self.output.render("Search Results", store.schema(), &records)
    }

    /// Reads an id and looks it up. Unknown ids are reported and yield `None`.
    fn existing_id(&mut self, prompt: &str) -> Result<Option<i64>, DatabaseError> {
        let id = self.input.read_integer(prompt, None)?;
        if self.store.query(Filter::ById(id))?.first()?.is_some() {
            return Ok(Some(id));
        }

        self.output.message(&format!("Invalid ID number {id}"))?;
        Ok(None)
    }

    /// Lists the non-key columns and reads a choice among them.
    fn choose_column(&mut self, prompt: &str) -> Result<usize, DatabaseError> {
        let store = self.store;
        let count = store.schema().column_count();
        if count < 2 {
            return Err(DatabaseError::ColumnIndex { index: 1, count });
        }

        let listing = store
            .schema()
            .columns()
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, column)| format!("{idx} : {}", column.name))
            .collect::<Vec<_>>()
            .join(",  ");
        self.output.message("Column numbers & names")?;
        self.output.message(&listing)?;

        let last = i64::try_from(count - 1).unwrap_or(i64::MAX);
        let choice = self.input.read_integer(prompt, Some(1..=last))?;
        usize::try_from(choice).map_err(|_| DatabaseError::ColumnIndex { index: 0, count })
    }

    /// Reads a value for one column according to its kind.
    fn read_value(&mut self, column: usize, prompt: &str) -> Result<Value, DatabaseError> {
        let column_def = self.store.schema().column_at(column)?;

        Ok(match column_def.kind {
            Kind::Integer => Value::Integer(
                self.input
                    .read_integer(prompt, column_def.range.clone())?,
            ),
            Kind::Real => Value::Real(self.input.read_real(prompt)?),
            Kind::Text => Value::Text(
                self.input
                    .read_text(prompt, Some(column_def.max_text_len()))?,
            ),
        })
    }
}

/// An error and its sources on one line, as shown to the user.
fn describe(err: &DatabaseError) -> String {
    let mut text = format!("Error - {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(&format!(": {cause}"));
        source = std::error::Error::source(cause);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ColumnDef, Schema,
        cli::{input::LineInput, output::TableOutput},
    };
    use std::io::Cursor;

    fn stocked_store() -> Store {
        let store = Store::open_in_memory("cars_for_sale", Schema::used_cars(2024)).unwrap();
        store.ensure_schema().unwrap();
        store.insert(&initial_stock()[..5]).unwrap();
        store
    }

    /// Runs a scripted session and returns the rendered output.
    fn run_script(store: &Store, script: &str) -> Result<String, DatabaseError> {
        let mut out = Vec::new();
        let input = LineInput::new(Cursor::new(script.to_string()), std::io::sink());
        let result = Controller::new(store, input, TableOutput::new(&mut out)).run();
        result.map(|()| String::from_utf8(out).unwrap())
    }

    fn price_of(store: &Store, id: i64) -> Option<Value> {
        store
            .query(Filter::ById(id))
            .unwrap()
            .first()
            .unwrap()
            .and_then(|record| record.get_value(6).cloned())
    }

    #[test]
    fn test_menu_lists_options_in_order() {
        let labels: Vec<_> = MenuOption::iter().map(|o| o as u8).collect();
        assert_eq!(labels, vec![1, 2, 3, 4, 5, 0]);
        assert_eq!(MenuOption::from_repr(3), Some(MenuOption::Change));
        assert_eq!(MenuOption::from_repr(6), None);
    }

    #[test]
    fn test_exit_from_menu() {
        let store = stocked_store();
        let mut out = Vec::new();
        let input = LineInput::new(Cursor::new("0\n"), std::io::sink());
        let mut controller = Controller::new(&store, input, TableOutput::new(&mut out));

        assert_eq!(controller.step(State::MenuPrompt).unwrap(), State::Exit);
        assert_eq!(controller.step(State::Exit).unwrap(), State::Exit);
    }

    #[test]
    fn test_end_of_input_exits() {
        let store = stocked_store();
        assert!(run_script(&store, "").is_ok());
    }

    #[test]
    fn test_list_all() {
        let store = stocked_store();
        let output = run_script(&store, "1\n0\n").unwrap();

        assert!(output.contains("Car Database"));
        assert!(output.contains("Skoda"));
        assert!(output.contains("1. Display entire database"));
    }

    #[test]
    fn test_add_assigns_id_and_capitalizes_type() {
        let store = stocked_store();
        let output = run_script(&store, "2\nKia\nRio\nhatchBACK\n2018\n30000\n7500\n0\n").unwrap();

        let added = store.query(Filter::ById(6)).unwrap().first().unwrap().unwrap();
        assert_eq!(added, Record::car(Some(6), "Kia", "Rio", "Hatchback", 2018, 30000, 7500));
        assert!(output.contains("Database with new car added"));
    }

    #[test]
    fn test_add_reprompts_out_of_range_year() {
        let store = stocked_store();
        run_script(&store, "2\nKia\nRio\nSaloon\n1969\n2018\n30000\n7500\n0\n").unwrap();

        let added = store.query(Filter::ById(6)).unwrap().first().unwrap().unwrap();
        assert_eq!(added.get_value(4), Some(&Value::Integer(2018)));
    }

    #[test]
    fn test_change_price() {
        let store = stocked_store();
        let output = run_script(&store, "3\n2\n6\n6800\n0\n").unwrap();

        assert_eq!(price_of(&store, 2), Some(Value::Integer(6800)));
        assert!(output.contains("Changed entry"));
    }

    #[test]
    fn test_change_keeps_type_as_typed() {
        let store = stocked_store();
        run_script(&store, "3\n1\n3\nestate\n0\n").unwrap();

        let changed = store.query(Filter::ById(1)).unwrap().first().unwrap().unwrap();
        assert_eq!(changed.get_value(3), Some(&Value::from("estate")));
    }

    #[test]
    fn test_change_truncates_text() {
        let store = stocked_store();
        run_script(&store, "3\n4\n2\nMultipla Family\n0\n").unwrap();

        let changed = store.query(Filter::ById(4)).unwrap().first().unwrap().unwrap();
        assert_eq!(changed.get_value(2), Some(&Value::from("Multipla ")));
    }

    #[test]
    fn test_change_unknown_id_is_reported() {
        let store = stocked_store();
        let output = run_script(&store, "3\n42\n0\n").unwrap();

        assert!(output.contains("Invalid ID number 42"));
        assert!(!output.contains("Changed entry"));
    }

    #[test]
    fn test_delete() {
        let store = stocked_store();
        run_script(&store, "4\n3\n0\n").unwrap();

        assert_eq!(price_of(&store, 3), None);
        assert!(price_of(&store, 4).is_some());
    }

    #[test]
    fn test_delete_unknown_id_is_reported() {
        let store = stocked_store();
        let output = run_script(&store, "4\n9\n0\n").unwrap();

        assert!(output.contains("Invalid ID number 9"));
        assert_eq!(store.query(Filter::All).unwrap().records().unwrap().len(), 5);
    }

    #[test]
    fn test_search_by_make() {
        let store = stocked_store();
        let output = run_script(&store, "5\n1\nford\n0\n").unwrap();

        assert!(output.contains("Search Results"));
        assert!(output.contains("Fiesta"));
        assert!(!output.contains("Fabia"));
    }

    #[test]
    fn test_search_without_matches() {
        let store = stocked_store();
        let output = run_script(&store, "5\n4\n1980\n1970\n0\n").unwrap();

        assert!(output.contains("Search Results"));
        assert!(output.contains("No data found"));
    }

    #[test]
    fn test_unsupported_kind_ends_session() {
        let schema = Schema::new(vec![
            ColumnDef::new("ID", Kind::Integer, 5),
            ColumnDef::new("Engine", Kind::Real, 6),
        ])
        .unwrap();
        let store = Store::open_in_memory("engines", schema).unwrap();
        store.ensure_schema().unwrap();

        let result = run_script(&store, "5\n1\n0\n");
        assert!(matches!(
            result,
            Err(DatabaseError::UnsupportedKind { kind: Kind::Real, .. })
        ));
    }

    #[test]
    fn test_real_column_is_editable() {
        let schema = Schema::new(vec![
            ColumnDef::new("ID", Kind::Integer, 5),
            ColumnDef::new("Engine", Kind::Real, 6),
        ])
        .unwrap();
        let store = Store::open_in_memory("engines", schema).unwrap();
        store.ensure_schema().unwrap();

        run_script(&store, "2\n1.6\n3\n1\n1\n2.0\n0\n").unwrap();
        let record = store.query(Filter::ById(1)).unwrap().first().unwrap().unwrap();
        assert_eq!(record.get_value(1), Some(&Value::Real(2.0)));
    }

    #[test]
    fn test_store_failure_is_reported_and_loop_continues() {
        let store = Store::open_in_memory("cars_for_sale", Schema::used_cars(2024)).unwrap();
        let output = run_script(&store, "1\n0\n").unwrap();

        assert!(output.contains("Error - error when trying to find entries"));
        assert!(output.contains("no such table"));
    }

    #[test]
    fn test_schema_without_data_columns_rejects_column_choice() {
        let schema = Schema::new(vec![ColumnDef::new("ID", Kind::Integer, 5)]).unwrap();
        let store = Store::open_in_memory("ids", schema).unwrap();
        store.ensure_schema().unwrap();

        let output = run_script(&store, "5\n0\n").unwrap();
        assert!(output.contains("Error - column index 1 is out of range, the schema has 1 columns"));
        assert_eq!(output.matches("Options :").count(), 2);
    }

    #[test]
    fn test_session_seeds_and_renders_initial_stock() {
        let store = Store::open_in_memory("cars_for_sale", Schema::used_cars(2024)).unwrap();
        let mut out = Vec::new();
        let input = LineInput::new(Cursor::new("0\n"), std::io::sink());
        start_session(&store, &Config::default(), input, TableOutput::new(&mut out)).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Database after inserting initial stock of cars"));
        assert_eq!(store.query(Filter::All).unwrap().records().unwrap().len(), 8);
    }

    #[test]
    fn test_session_continues_when_table_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_database_path(dir.path().join("stock.db"));
        rusqlite::Connection::open(&config.database_path)
            .unwrap()
            .execute_batch("CREATE TABLE parts (name TEXT); CREATE INDEX cars_for_sale ON parts (name);")
            .unwrap();

        let store = Store::open(&config, Schema::used_cars(2024)).unwrap();
        assert!(matches!(
            store.ensure_schema(),
            Err(DatabaseError::Schema { ref table, .. }) if table == "cars_for_sale"
        ));

        let mut out = Vec::new();
        let input = LineInput::new(Cursor::new("1\n0\n"), std::io::sink());
        start_session(&store, &config, input, TableOutput::new(&mut out)).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Error - error when creating table cars_for_sale"));
        assert!(!output.contains("Database after inserting initial stock of cars"));
        assert!(output.contains("no such table"));
        assert_eq!(output.matches("Options :").count(), 2);
        store.close().unwrap();
    }
}
