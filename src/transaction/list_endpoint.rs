//! Defines the endpoint for listing every transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, transaction::TransactionStore};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The store holding the cached transactions.
    pub transaction_store: Arc<Mutex<TransactionStore>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler that responds with all transactions as a JSON array, oldest first.
///
/// The transactions come from the in-memory cache, the data file is not read again.
pub async fn list_transactions_endpoint(State(state): State<ListTransactionsState>) -> Response {
    let store = match state.transaction_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire transaction store lock: {error}");
            return Error::StoreLockError.into_response();
        }
    };

    (StatusCode::OK, Json(store.transactions())).into_response()
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use axum_test::TestServer;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::{
        app_state::test_utils::{DATA_FILE_NAME, get_test_state},
        build_router, endpoints,
        transaction::Transaction,
    };

    fn get_test_server(dir: &TempDir) -> TestServer {
        TestServer::new(build_router(get_test_state(dir))).expect("Could not create test server.")
    }

    async fn create(server: &TestServer, category: &str) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"date": "2025-01-01", "category": category, "amount": 1}))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn fresh_store_lists_empty_array() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server(&dir);

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
        assert!(dir.path().join("data").join(DATA_FILE_NAME).is_file());
    }

    #[tokio::test]
    async fn lists_transactions_in_creation_order() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server(&dir);
        let first = create(&server, "Food").await;
        let second = create(&server, "Rent").await;

        let transactions = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(transactions, [first, second]);
    }

    #[tokio::test]
    async fn external_edits_are_not_seen_until_restart() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server(&dir);
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("data").join(DATA_FILE_NAME))
            .unwrap();
        file.write_all(b"manual,2025-02-01,Gift,,20,\n").unwrap();

        server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .assert_json(&json!([]));

        let restarted = get_test_server(&dir);
        let transactions = restarted
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, "manual");
    }
}
