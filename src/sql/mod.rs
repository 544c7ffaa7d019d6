pub mod command;
pub mod predicate;
