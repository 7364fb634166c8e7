//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A create request was missing the date, category or amount.
    #[error("date, category, and amount are required")]
    MissingRequiredField,

    /// The amount in a create request could not be read as a number.
    ///
    /// Callers should pass in the text of the rejected amount.
    #[error("amount must be a number")]
    InvalidAmount(String),

    /// The request body could not be parsed as a JSON object.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The request body could not be read within [crate::REQUEST_BODY_LIMIT] bytes.
    #[error("request body is too large")]
    RequestBodyTooLarge,

    /// A row in the data file has an amount that is not a number.
    ///
    /// `line` is the one-based line number in the data file, counting the header.
    #[error("corrupt record on line {line}: {reason}")]
    CorruptRecord {
        /// The line number of the bad row.
        line: u64,
        /// Why the row was rejected.
        reason: String,
    },

    /// Reading or writing the data file failed.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not access the data file: {0}")]
    Storage(String),

    /// Could not acquire the transaction store lock.
    #[error("could not acquire the transaction store lock")]
    StoreLockError,
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        tracing::error!("an unhandled I/O error occurred: {}", value);
        Error::Storage(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        tracing::error!("an unhandled CSV error occurred: {}", value);
        Error::Storage(value.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the client sending a bad request.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::MissingRequiredField | Error::InvalidAmount(_) | Error::InvalidRequestBody(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidAmount(ref amount) => {
                tracing::debug!("rejected non-numeric amount {amount:?}");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::RequestBodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            error if error.is_validation_error() => (StatusCode::BAD_REQUEST, error.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    async fn body_text(error: Error) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = body_text(Error::MissingRequiredField).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"date, category, and amount are required"}"#);
    }

    #[tokio::test]
    async fn invalid_amount_hides_rejected_text() {
        let (status, body) = body_text(Error::InvalidAmount("abc".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"amount must be a number"}"#);
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let (status, body) = body_text(Error::RequestBodyTooLarge).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, r#"{"error":"request body is too large"}"#);
    }

    #[tokio::test]
    async fn storage_errors_do_not_leak_details() {
        let (status, body) = body_text(Error::Storage("disk on fire".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"internal server error"}"#);
    }
}
