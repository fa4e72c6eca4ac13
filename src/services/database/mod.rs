//! SQLite connection and schema management for the event database.

mod connection;
mod migrations;
mod schema;

pub use connection::Database;
