//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The codec between transactions and lines of the data file
//! - The store that keeps the data file and its in-memory copy in step
//! - Route handlers for listing and creating transactions

pub mod codec;
mod create_endpoint;
mod list_endpoint;
mod model;
pub mod store;

pub use create_endpoint::{TransactionRequest, create_transaction_endpoint};
pub use list_endpoint::list_transactions_endpoint;
pub use model::{Transaction, TransactionBuilder};
pub use store::TransactionStore;
