//! Stores for exercising the reporting code in tests.

use std::sync::Mutex;

use rusqlite::Connection;
use serde_json::Value;
use time::Date;

use crate::{
    Error,
    clock::Clock,
    store::{DataStore, ProcedureArgs, SqliteStore, TableQuery},
};

/// An empty in-memory database whose clock is fixed to `today`.
pub fn get_test_store(today: Date) -> SqliteStore {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    SqliteStore::new(connection, Clock::Fixed(today)).expect("Could not initialize test store")
}

/// Records the name of every procedure and table it is asked for, then
/// forwards the call.
pub struct RecordingStore<S> {
    inner: S,
    calls: Mutex<Vec<String>>,
}

impl<S: DataStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call in the order it was made, procedures as their name and
    /// queries as "query:<table>".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn procedure_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("query:"))
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("query:"))
            .count()
    }
}

impl<S: DataStore> DataStore for RecordingStore<S> {
    fn run_procedure(&self, name: &str, args: &ProcedureArgs) -> Result<Value, Error> {
        self.calls.lock().unwrap().push(name.to_owned());
        self.inner.run_procedure(name, args)
    }

    fn query(&self, query: &TableQuery) -> Result<Vec<Value>, Error> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("query:{}", query.table()));
        self.inner.query(query)
    }
}

/// Fails every call to the procedure or table named `failing_name`, optionally
/// only after a number of successful calls to it.
pub struct FailingStore<S> {
    inner: S,
    failing_name: String,
    successes_before_failure: Mutex<usize>,
}

impl<S: DataStore> FailingStore<S> {
    pub fn new(inner: S, failing_name: &str) -> Self {
        Self::after(inner, failing_name, 0)
    }

    /// Let `successes` calls to `failing_name` through before failing.
    pub fn after(inner: S, failing_name: &str, successes: usize) -> Self {
        Self {
            inner,
            failing_name: failing_name.to_owned(),
            successes_before_failure: Mutex::new(successes),
        }
    }

    fn check(&self, name: &str) -> Result<(), Error> {
        if name != self.failing_name {
            return Ok(());
        }

        let mut remaining = self.successes_before_failure.lock().unwrap();
        if *remaining == 0 {
            Err(Error::remote_call(name, "simulated failure"))
        } else {
            *remaining -= 1;
            Ok(())
        }
    }
}

impl<S: DataStore> DataStore for FailingStore<S> {
    fn run_procedure(&self, name: &str, args: &ProcedureArgs) -> Result<Value, Error> {
        self.check(name)?;
        self.inner.run_procedure(name, args)
    }

    fn query(&self, query: &TableQuery) -> Result<Vec<Value>, Error> {
        self.check(query.table())?;
        self.inner.query(query)
    }
}
