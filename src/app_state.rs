//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{clock::Clock, store::DataStore};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The data store every report is computed from.
    pub store: Arc<dyn DataStore>,

    /// Resolves the current date for period windows and the time-series report.
    pub clock: Clock,
}

impl AppState {
    /// Create a new [AppState] that serves reports from `store`.
    pub fn new(store: impl DataStore + 'static, clock: Clock) -> Self {
        Self {
            store: Arc::new(store),
            clock,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
