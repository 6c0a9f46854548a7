//! Tag-based reports, computed by the data store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Error,
    store::{
        DataStore, ProcedureArgs, REPORTS_BY_TAGS, TRANSACTIONS_BY_TAG_ID, TableQuery, call_rows,
    },
    transaction::Transaction,
};

/// The name of the table that holds tags.
pub const TAG_TABLE: &str = "tag";

/// Database identifier for a tag.
pub type TagId = i64;

/// The amount spent under one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagReport {
    pub id: i64,
    #[serde(alias = "tag_id")]
    pub tag_id: TagId,
    #[serde(alias = "tag_name")]
    pub tag_name: String,
    pub amount: f64,
}

/// The per-tag totals, exactly as the store reports them.
pub fn reports_by_tags(store: &dyn DataStore) -> Result<Vec<TagReport>, Error> {
    call_rows(store, REPORTS_BY_TAGS, &ProcedureArgs::new())
        .inspect_err(|error| tracing::error!("could not get reports by tags: {error}"))
}

/// The transactions carrying the tag `tag_id`.
///
/// # Errors
/// Returns [Error::TagNotFound] without fetching any transactions if the tag
/// does not exist.
pub fn transactions_by_tag_id(
    store: &dyn DataStore,
    tag_id: TagId,
) -> Result<Vec<Transaction>, Error> {
    let query = TableQuery::new(TAG_TABLE).select(&["id"]).eq("id", tag_id);
    let tags = store.query(&query)?;

    if tags.is_empty() {
        tracing::debug!("tag {tag_id} does not exist");
        return Err(Error::TagNotFound(tag_id));
    }

    let mut args = ProcedureArgs::new();
    args.insert("tag_id".to_owned(), Value::from(tag_id));

    call_rows(store, TRANSACTIONS_BY_TAG_ID, &args).inspect_err(|error| {
        tracing::error!("could not get transactions for tag {tag_id}: {error}")
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{TagReport, reports_by_tags, transactions_by_tag_id};
    use crate::{
        Error,
        store::{
            NewTransaction, SqliteStore, TRANSACTIONS_BY_TAG_ID, create_tag, create_transaction,
        },
        test_utils::{FailingStore, RecordingStore, get_test_store},
        transaction::TransactionKind,
    };

    fn get_store_with_tagged_transactions() -> SqliteStore {
        let store = get_test_store(date!(2024 - 03 - 31));
        store
            .with_connection(|connection| {
                let holiday = create_tag("Holiday", connection)?;
                let groceries = create_tag("Groceries", connection)?;
                create_transaction(
                    NewTransaction::build(600.0, TransactionKind::Expense, "Travel", date!(2024 - 03 - 02))
                        .tag_id(Some(holiday))
                        .description("Flights"),
                    connection,
                )?;
                create_transaction(
                    NewTransaction::build(45.0, TransactionKind::Expense, "Food", date!(2024 - 03 - 05))
                        .tag_id(Some(holiday)),
                    connection,
                )?;
                create_transaction(
                    NewTransaction::build(80.0, TransactionKind::Expense, "Food", date!(2024 - 03 - 04))
                        .tag_id(Some(groceries)),
                    connection,
                )?;
                Ok(())
            })
            .unwrap();
        store
    }

    #[test]
    fn tag_report_decodes_store_rows() {
        let report: TagReport = serde_json::from_value(
            json!({ "id": 1, "tag_id": 4, "tag_name": "Holiday", "amount": 645.0 }),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "id": 1, "tagId": 4, "tagName": "Holiday", "amount": 645.0 })
        );
    }

    #[test]
    fn reports_by_tags_passes_rows_through() {
        let store = get_store_with_tagged_transactions();

        let reports = reports_by_tags(&store).unwrap();

        assert_eq!(
            reports,
            vec![
                TagReport {
                    id: 1,
                    tag_id: 1,
                    tag_name: "Holiday".to_owned(),
                    amount: 645.0,
                },
                TagReport {
                    id: 2,
                    tag_id: 2,
                    tag_name: "Groceries".to_owned(),
                    amount: 80.0,
                },
            ]
        );
    }

    #[test]
    fn transactions_by_tag_id_returns_newest_first() {
        let store = get_store_with_tagged_transactions();

        let transactions = transactions_by_tag_id(&store, 1).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].date, date!(2024 - 03 - 05));
        assert_eq!(transactions[1].description.as_deref(), Some("Flights"));
    }

    #[test]
    fn missing_tag_fails_without_calling_procedure() {
        let store = RecordingStore::new(get_store_with_tagged_transactions());

        let result = transactions_by_tag_id(&store, 999);

        assert_eq!(result, Err(Error::TagNotFound(999)));
        assert_eq!(store.calls(), vec!["query:tag"]);
    }

    #[test]
    fn procedure_failure_propagates() {
        let store = FailingStore::new(get_store_with_tagged_transactions(), TRANSACTIONS_BY_TAG_ID);

        let result = transactions_by_tag_id(&store, 1);

        assert_eq!(
            result,
            Err(Error::remote_call(TRANSACTIONS_BY_TAG_ID, "simulated failure"))
        );
    }
}
