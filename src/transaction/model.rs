//! Defines the data model for transactions.

use serde::{Deserialize, Serialize};

use crate::transaction::codec::sanitize_field;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The opaque, server generated ID of the transaction.
    pub id: String,
    /// When the transaction happened, as entered by the user.
    pub date: String,
    /// What the money was spent on or earned from, e.g. "Groceries".
    pub category: String,
    /// Who was paid or who paid, may be empty.
    pub payee: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Free text notes, may be empty.
    pub notes: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(date: &str, category: &str, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            date: date.to_owned(),
            category: category.to_owned(),
            payee: String::new(),
            amount,
            notes: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to the empty string. Once the fields are set,
/// call [TransactionBuilder::finalize] with an ID to create the [Transaction].
///
/// # Examples
///
/// ```
/// use ledgerline::Transaction;
///
/// let transaction = Transaction::build("2025-01-15", "Coffee", -4.5)
///     .payee("Corner Cafe")
///     .finalize("abc123");
///
/// assert_eq!(transaction.id, "abc123");
/// assert_eq!(transaction.notes, "");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The date of the transaction.
    ///
    /// Stored as given, the only requirement is that it is not empty.
    pub date: String,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,

    /// The other party of the transaction.
    pub payee: String,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    pub amount: f64,

    /// Extra details about the transaction.
    pub notes: String,
}

impl TransactionBuilder {
    /// Set the payee for the transaction.
    pub fn payee(mut self, payee: &str) -> Self {
        self.payee = payee.to_owned();
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    /// Create the [Transaction] with the given `id`.
    ///
    /// Text fields are sanitized the same way the data file stores them, so the
    /// returned transaction is exactly what a reload from disk will produce.
    pub fn finalize(self, id: &str) -> Transaction {
        Transaction {
            id: sanitize_field(id),
            date: sanitize_field(&self.date),
            category: sanitize_field(&self.category),
            payee: sanitize_field(&self.payee),
            amount: self.amount,
            notes: sanitize_field(&self.notes),
        }
    }
}
