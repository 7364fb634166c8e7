//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
///
/// Paths that do not match an API route are served from the static directory,
/// with `/` serving its `index.html`.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .fallback_service(static_files)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use tempfile::TempDir;

    use crate::{app_state::test_utils::get_test_state, build_router};

    fn get_test_server_with_static_files(dir: &TempDir) -> TestServer {
        let static_dir = dir.path().join("static");
        fs::create_dir_all(&static_dir).unwrap();
        fs::write(static_dir.join("index.html"), "<h1>Ledger</h1>").unwrap();
        fs::write(static_dir.join("app.js"), "console.log('hi');").unwrap();

        TestServer::new(build_router(get_test_state(dir))).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_serves_landing_page() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server_with_static_files(&dir);

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("<h1>Ledger</h1>");
    }

    #[tokio::test]
    async fn serves_static_assets_verbatim() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server_with_static_files(&dir);

        server.get("/app.js").await.assert_text("console.log('hi');");
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let dir = TempDir::new().unwrap();
        let server = get_test_server_with_static_files(&dir);

        server
            .get("/does/not/exist.html")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
