//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error,
    id::IdGenerator,
    transaction::{
        Transaction, TransactionBuilder, TransactionStore,
        codec::{AmountError, parse_amount, sanitize_field},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store the new transaction is added to.
    pub transaction_store: Arc<Mutex<TransactionStore>>,
    /// Generates the ID of the new transaction.
    pub id_generator: Arc<dyn IdGenerator>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            id_generator: state.id_generator.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
///
/// Every field is optional and loosely typed here so that missing fields can be
/// reported with a useful message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    /// When the transaction happened.
    pub date: Option<Value>,
    /// What the transaction was for.
    pub category: Option<Value>,
    /// Who was paid.
    pub payee: Option<Value>,
    /// A JSON number, or a string holding a number.
    pub amount: Option<Value>,
    /// Extra details.
    pub notes: Option<Value>,
}

impl TransactionRequest {
    /// Check the required fields and read the amount.
    ///
    /// Text fields may be sent as strings, numbers or booleans, which are stored
    /// as their text. `null` counts as a missing field.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidRequestBody] if a text field is an array or object,
    /// - [Error::MissingRequiredField] if the date or category is missing or blank, or the
    ///   amount is missing or null,
    /// - or [Error::InvalidAmount] if the amount is not a finite number.
    pub fn validate(self) -> Result<TransactionBuilder, Error> {
        let date = coerce_text("date", self.date)?;
        let category = coerce_text("category", self.category)?;
        let payee = coerce_text("payee", self.payee)?.unwrap_or_default();
        let notes = coerce_text("notes", self.notes)?.unwrap_or_default();

        let present = |field: Option<String>| {
            field
                .map(|text| sanitize_field(&text))
                .filter(|text| !text.is_empty())
        };

        let (Some(date), Some(category), Some(amount)) =
            (present(date), present(category), self.amount)
        else {
            return Err(Error::MissingRequiredField);
        };

        let amount = coerce_amount(&amount)?;

        Ok(Transaction::build(&date, &category, amount)
            .payee(&payee)
            .notes(&notes))
    }
}

fn coerce_text(name: &str, value: Option<Value>) -> Result<Option<String>, Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => Err(Error::InvalidRequestBody(format!(
            "{name} must be text, a number or a boolean"
        ))),
    }
}

fn coerce_amount(amount: &Value) -> Result<f64, Error> {
    match amount {
        Value::Number(number) => number
            .as_f64()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| Error::InvalidAmount(number.to_string())),
        Value::String(text) => {
            parse_amount(text).map_err(|AmountError(text)| Error::InvalidAmount(text))
        }
        other => Err(Error::InvalidAmount(other.to_string())),
    }
}

/// A route handler for creating a new transaction, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    request: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::debug!("could not parse create transaction request: {rejection}");
            return Error::InvalidRequestBody(rejection.body_text()).into_response();
        }
    };

    let builder = match request.validate() {
        Ok(builder) => builder,
        Err(error) => return error.into_response(),
    };

    let transaction = builder.finalize(&state.id_generator.generate());

    let mut store = match state.transaction_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire transaction store lock: {error}");
            return Error::StoreLockError.into_response();
        }
    };

    match store.insert(transaction) {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}
