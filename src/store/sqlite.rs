//! A [DataStore] backed by a SQLite database.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Value as SqlValue, ValueRef},
};
use serde_json::{Map, Number, Value};

use crate::{
    Error,
    clock::Clock,
    period::Period,
    store::{
        DataStore, FilterValue, ProcedureArgs, REPORTS_BY_TAGS, SortDirection,
        TRANSACTIONS_BY_TAG_ID, TableQuery, procedures::parse_total_procedure, schema::initialize,
    },
    transaction::TransactionKind,
};

/// A SQLite database that answers the reporting procedures and table queries.
///
/// Period windows, e.g. "this week", are resolved with the store's own clock.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
    clock: Clock,
}

impl SqliteStore {
    /// Wrap `connection`, creating the tables if needed.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if the schema cannot be created.
    pub fn new(connection: Connection, clock: Clock) -> Result<Self, Error> {
        initialize(&connection).map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            clock,
        })
    }

    /// Open the database file at `path`, creating it if it does not exist.
    pub fn open(path: &Path, clock: Clock) -> Result<Self, Error> {
        let connection = Connection::open(path)
            .inspect_err(|error| tracing::error!("could not open database at {path:?}: {error}"))
            .map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        Self::new(connection, clock)
    }

    /// Run `f` with exclusive access to the underlying connection.
    ///
    /// This is intended for writing data, e.g. seeding a database. Reporting
    /// code should go through [DataStore].
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, Error> {
        let connection = self.lock()?;
        f(&connection).map_err(|error| Error::StoreUnavailable(error.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    fn total(
        &self,
        connection: &Connection,
        kind: TransactionKind,
        period: Period,
    ) -> Result<Value, rusqlite::Error> {
        let total: f64 = match period.date_range(self.clock.today()) {
            Some(range) => connection.query_row(
                "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
                WHERE type = ?1 AND date BETWEEN ?2 AND ?3",
                (kind.as_str(), range.start, range.end),
                |row| row.get(0),
            )?,
            None => connection.query_row(
                "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\" WHERE type = ?1",
                (kind.as_str(),),
                |row| row.get(0),
            )?,
        };

        Ok(Number::from_f64(total).map_or(Value::Null, Value::Number))
    }

    fn reports_by_tags(&self, connection: &Connection) -> Result<Value, rusqlite::Error> {
        let mut stmt = connection.prepare(
            "SELECT
                ROW_NUMBER() OVER (ORDER BY SUM(t.amount) DESC, tag.name ASC) AS id,
                tag.id AS tag_id,
                tag.name AS tag_name,
                SUM(t.amount) AS amount
            FROM tag
            INNER JOIN \"transaction\" t ON t.tag_id = tag.id
            WHERE t.type = 'Expense'
            GROUP BY tag.id, tag.name
            ORDER BY id ASC",
        )?;

        collect_rows(&mut stmt, [])
    }

    fn transactions_by_tag_id(
        &self,
        connection: &Connection,
        args: &ProcedureArgs,
    ) -> Result<Value, Error> {
        let tag_id = args
            .get("tag_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::remote_call(TRANSACTIONS_BY_TAG_ID, "missing integer argument \"tag_id\"")
            })?;

        let mut stmt = connection
            .prepare(
                "SELECT id, category, amount, type, date, description
                FROM \"transaction\"
                WHERE tag_id = ?1
                ORDER BY date DESC, id DESC",
            )
            .map_err(|error| Error::remote_call(TRANSACTIONS_BY_TAG_ID, error))?;

        collect_rows(&mut stmt, [tag_id])
            .map_err(|error| Error::remote_call(TRANSACTIONS_BY_TAG_ID, error))
    }
}

impl DataStore for SqliteStore {
    fn run_procedure(&self, name: &str, args: &ProcedureArgs) -> Result<Value, Error> {
        tracing::debug!("running procedure {name} with {args:?}");
        let connection = self.lock()?;

        if let Some((kind, period)) = parse_total_procedure(name) {
            return self
                .total(&connection, kind, period)
                .map_err(|error| Error::remote_call(name, error));
        }

        match name {
            REPORTS_BY_TAGS => self
                .reports_by_tags(&connection)
                .map_err(|error| Error::remote_call(name, error)),
            TRANSACTIONS_BY_TAG_ID => self.transactions_by_tag_id(&connection, args),
            _ => Err(Error::remote_call(name, "no such procedure")),
        }
    }

    fn query(&self, query: &TableQuery) -> Result<Vec<Value>, Error> {
        let (sql, params) = build_select(query)?;
        tracing::debug!("running query {sql} with {params:?}");

        let connection = self.lock()?;
        let mut stmt = connection
            .prepare(&sql)
            .map_err(|error| Error::remote_call(query.table(), error))?;

        match collect_rows(&mut stmt, params_from_iter(params)) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(_) => Ok(Vec::new()),
            Err(error) => Err(Error::remote_call(query.table(), error)),
        }
    }
}

/// Translate a [TableQuery] into SQL and its bound parameters.
///
/// Table and column names cannot be bound as parameters, so they are checked
/// to be plain identifiers and then quoted.
fn build_select(query: &TableQuery) -> Result<(String, Vec<SqlValue>), Error> {
    let table = quote_identifier(query.table(), query.table())?;

    let columns = if query.columns().is_empty() {
        "*".to_owned()
    } else {
        query
            .columns()
            .iter()
            .map(|column| quote_identifier(column, query.table()))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {table}");
    let mut params = Vec::with_capacity(query.filters().len());

    for (i, filter) in query.filters().iter().enumerate() {
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        let column = quote_identifier(&filter.column, query.table())?;
        sql.push_str(&format!(" {keyword} {column} {} ?", filter.op.as_sql()));
        params.push(to_sql_value(&filter.value));
    }

    if let Some(order) = query.order() {
        let column = quote_identifier(&order.column, query.table())?;
        let direction = match order.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {column} {direction}"));
    }

    if let Some(range) = query.row_range() {
        let limit = (range.end() + 1).saturating_sub(*range.start());
        sql.push_str(&format!(" LIMIT {limit} OFFSET {}", range.start()));
    }

    Ok((sql, params))
}

fn quote_identifier(identifier: &str, table: &str) -> Result<String, Error> {
    let is_plain = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_plain {
        Ok(format!("\"{identifier}\""))
    } else {
        Err(Error::remote_call(
            table,
            format!("invalid identifier \"{identifier}\""),
        ))
    }
}

fn to_sql_value(value: &FilterValue) -> SqlValue {
    match value {
        FilterValue::Integer(value) => SqlValue::Integer(*value),
        FilterValue::Real(value) => SqlValue::Real(*value),
        FilterValue::Text(value) => SqlValue::Text(value.clone()),
    }
}

/// Run `stmt` and convert every row into a JSON object keyed by column name.
fn collect_rows(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> Result<Value, rusqlite::Error> {
    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_owned())
        .collect();

    let rows = stmt
        .query_map(params, |row| map_row(row, &column_names))?
        .collect::<Result<Vec<Value>, rusqlite::Error>>()?;

    Ok(Value::Array(rows))
}

fn map_row(row: &Row, column_names: &[String]) -> Result<Value, rusqlite::Error> {
    let mut object = Map::with_capacity(column_names.len());

    for (i, name) in column_names.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(value) => Value::from(value),
            ValueRef::Real(value) => Number::from_f64(value).map_or(Value::Null, Value::Number),
            ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
        };
        object.insert(name.clone(), value);
    }

    Ok(Value::Object(object))
}
