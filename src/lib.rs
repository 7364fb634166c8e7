//! Ledgerline is a minimal personal finance tracker.
//!
//! This library provides a JSON API for listing and adding transactions, which
//! are stored in a comma separated text file, and serves a static web page
//! that uses the API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod config;
mod endpoints;
mod error;
mod id;
mod logging;
mod routing;
pub mod transaction;

pub use app_state::AppState;
pub use config::{Config, DEFAULT_DATA_FILE, DEFAULT_PORT, DEFAULT_STATIC_DIR};
pub use endpoints::TRANSACTIONS_API;
pub use error::Error;
pub use id::{IdGenerator, IdStrategy, TimestampIdGenerator, UuidGenerator};
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionBuilder, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// An async task that waits for the server behind `handle` to start listening, then creates the
/// data file again if it went missing while the server was starting.
///
/// Returns without doing anything if the server stops before it starts listening.
pub async fn ensure_data_file_once_listening(handle: Handle<SocketAddr>, state: AppState) {
    let Some(addr) = handle.listening().await else {
        return;
    };

    tracing::info!("HTTP server listening on {}", addr);

    let result = match state.transaction_store.lock() {
        Ok(store) => store.ensure_exists(),
        Err(error) => {
            tracing::error!("could not acquire transaction store lock: {error}");
            return;
        }
    };

    if let Err(error) = result {
        tracing::error!("Could not create the data file: {error}");
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, net::SocketAddr};

    use axum_server::Handle;
    use tempfile::TempDir;

    use crate::{
        app_state::test_utils::{DATA_FILE_NAME, get_test_state},
        build_router, ensure_data_file_once_listening,
    };

    #[tokio::test]
    async fn data_file_is_recreated_once_listening() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);
        let data_file = dir.path().join("data").join(DATA_FILE_NAME);
        fs::remove_file(&data_file).unwrap();

        let handle: Handle<SocketAddr> = Handle::new();
        let server = axum_server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .handle(handle.clone())
            .serve(build_router(state.clone()).into_make_service());
        tokio::spawn(server);

        ensure_data_file_once_listening(handle.clone(), state).await;
        handle.shutdown();

        assert_eq!(
            fs::read_to_string(&data_file).unwrap(),
            "id,date,category,payee,amount,notes\n"
        );
    }
}
