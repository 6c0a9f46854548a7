//! The transaction record as read from the data store.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// The name of the table that holds transactions.
pub const TRANSACTION_TABLE: &str = "transaction";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[default]
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("income") {
            Ok(Self::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(Self::Expense)
        } else {
            Err(Error::invalid_parameter(
                "type",
                format!("expected \"Income\" or \"Expense\", got \"{s}\""),
            ))
        }
    }
}

/// A single income or expense.
///
/// Transactions are owned by the data store and never modified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub description: Option<String>,
}

/// The projection of a transaction needed for category breakdowns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// The projection of a transaction holding only its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TransactionDate {
    #[serde(with = "iso_date")]
    pub date: Date,
}
