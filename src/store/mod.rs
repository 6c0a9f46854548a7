//! The data access facade.
//!
//! Reporting code talks to the data store only through [DataStore]: it either
//! runs a named procedure or queries a table with simple filters. Results come
//! back loosely typed as JSON and are decoded into concrete types at this
//! boundary, so a malformed row is rejected here rather than deep inside an
//! aggregation.

mod procedures;
mod query;
mod schema;
mod sqlite;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

pub use procedures::{REPORTS_BY_TAGS, TRANSACTIONS_BY_TAG_ID, total_procedure};
pub use query::{Filter, FilterOp, FilterValue, Order, SortDirection, TableQuery};
pub use schema::{NewTransaction, create_tag, create_transaction, initialize};
pub use sqlite::SqliteStore;

/// Named arguments passed to a procedure.
pub type ProcedureArgs = Map<String, Value>;

/// A store that can run named procedures and filtered table queries.
///
/// Every call is all-or-nothing: it returns a value or an [Error::RemoteCall]
/// naming the procedure or table that failed.
pub trait DataStore: Send + Sync {
    /// Run the procedure `name` and return its result, either a scalar or an
    /// array of row objects.
    fn run_procedure(&self, name: &str, args: &ProcedureArgs) -> Result<Value, Error>;

    /// Run a table query and return the matching rows as JSON objects.
    fn query(&self, query: &TableQuery) -> Result<Vec<Value>, Error>;
}

/// Run a procedure that returns a single number.
///
/// A `null` result, e.g. the sum over no rows, counts as zero.
///
/// # Errors
/// Returns [Error::MalformedRow] if the procedure returns anything other than a
/// number or `null`.
pub fn call_scalar(
    store: &dyn DataStore,
    name: &str,
    args: &ProcedureArgs,
) -> Result<f64, Error> {
    match store.run_procedure(name, args)? {
        Value::Null => Ok(0.0),
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::malformed_row(name, format!("{number} is not a finite number"))),
        other => Err(Error::malformed_row(
            name,
            format!("expected a number, got {other}"),
        )),
    }
}

/// Run a procedure that returns rows and decode each row as `T`.
///
/// # Errors
/// Returns [Error::MalformedRow] if the result is not an array or a row does
/// not decode.
pub fn call_rows<T: DeserializeOwned>(
    store: &dyn DataStore,
    name: &str,
    args: &ProcedureArgs,
) -> Result<Vec<T>, Error> {
    match store.run_procedure(name, args)? {
        Value::Array(rows) => decode_rows(name, rows),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::malformed_row(
            name,
            format!("expected an array of rows, got {other}"),
        )),
    }
}

/// Run a table query and decode each row as `T`.
pub fn select<T: DeserializeOwned>(
    store: &dyn DataStore,
    query: &TableQuery,
) -> Result<Vec<T>, Error> {
    let rows = store.query(query)?;
    decode_rows(query.table(), rows)
}

fn decode_rows<T: DeserializeOwned>(source_name: &str, rows: Vec<Value>) -> Result<Vec<T>, Error> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .inspect_err(|error| {
                    tracing::error!("could not decode row from {source_name}: {error}")
                })
                .map_err(|error| Error::malformed_row(source_name, error))
        })
        .collect()
}
