//! The SQLite schema read by [super::SqliteStore] and helpers for filling it.

use rusqlite::Connection;
use time::Date;

use crate::{
    tag_report::TagId,
    transaction::{TransactionId, TransactionKind},
};

/// Create the tables and indexes if they do not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
            date TEXT NOT NULL,
            description TEXT,
            tag_id INTEGER,
            FOREIGN KEY(tag_id) REFERENCES tag(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_tag_id ON \"transaction\"(tag_id);",
    )
}

/// Create a tag and return its generated ID.
pub fn create_tag(name: &str, connection: &Connection) -> Result<TagId, rusqlite::Error> {
    connection.execute("INSERT INTO tag (name) VALUES (?1);", (name,))?;

    Ok(connection.last_insert_rowid())
}

/// A transaction that has not been written to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    pub tag_id: Option<TagId>,
}

impl NewTransaction {
    /// Start building a transaction without a description or tag.
    pub fn build(amount: f64, kind: TransactionKind, category: &str, date: Date) -> Self {
        Self {
            amount,
            kind,
            category: category.to_owned(),
            date,
            description: None,
            tag_id: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn tag_id(mut self, tag_id: Option<TagId>) -> Self {
        self.tag_id = tag_id;
        self
    }
}

/// Write a transaction and return its generated ID.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionId, rusqlite::Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (category, amount, type, date, description, tag_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &transaction.category,
            transaction.amount,
            transaction.kind.as_str(),
            transaction.date,
            &transaction.description,
            transaction.tag_id,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}
