//! The comma separated data file and the in-memory copy of its transactions.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::{
    Error,
    transaction::{
        Transaction,
        codec::{DELIMITER, HEADER, decode_record, encode},
    },
};

/// Create the data file at `path`, and its parent directories, if they do not exist.
///
/// A new file only contains the header line. An existing file is left untouched.
///
/// # Errors
/// Returns [Error::Storage] if the directory or file cannot be created.
pub fn ensure_exists(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(error) => return Err(error.into()),
    };

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(HEADER)?;
    writer.flush()?;

    tracing::info!("Created data file {}", path.display());

    Ok(())
}

/// Read every transaction in the data file at `path`, in file order.
///
/// The file is created first if it does not exist. The header line and blank
/// lines are skipped.
///
/// # Errors
/// Returns:
/// - [Error::Storage] if the file cannot be created or read,
/// - or [Error::CorruptRecord] if a row has a missing or non-numeric amount.
pub fn load_all(path: &Path) -> Result<Vec<Transaction>, Error> {
    ensure_exists(path)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(DELIMITER)
        .quoting(false)
        .flexible(true)
        .from_path(path)?;

    let mut transactions = Vec::new();

    for record in reader.records() {
        let record = record?;

        if is_blank(&record) {
            continue;
        }

        let transaction = decode_record(&record).map_err(|error| Error::CorruptRecord {
            line: record.position().map_or(0, |position| position.line()),
            reason: error.to_string(),
        })?;

        transactions.push(transaction);
    }

    Ok(transactions)
}

/// Append `transaction` as a new line at the end of the data file at `path`.
///
/// This does not update any [TransactionStore].
///
/// # Errors
/// Returns [Error::Storage] if the file cannot be written.
pub fn append_one(path: &Path, transaction: &Transaction) -> Result<(), Error> {
    let line = encode(transaction)?;

    ensure_exists(path)?;
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(line.as_bytes())?;

    Ok(())
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// The transactions of the data file, cached in memory.
///
/// The cache is filled once by [TransactionStore::open] and then only grows
/// through [TransactionStore::insert]. Edits made to the file by other programs
/// are not seen until the store is opened again.
#[derive(Debug)]
pub struct TransactionStore {
    path: PathBuf,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Open the data file at `path`, creating it if needed, and load its transactions.
    ///
    /// # Errors
    /// Returns any error from [load_all].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let transactions = load_all(&path)?;

        tracing::debug!(
            "Loaded {} transactions from {}",
            transactions.len(),
            path.display()
        );

        Ok(Self { path, transactions })
    }

    /// The location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All transactions in the order they were added.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Recreate the data file if it has gone missing.
    pub fn ensure_exists(&self) -> Result<(), Error> {
        ensure_exists(&self.path)
    }

    /// Save `transaction` to the data file and then add it to the cache.
    ///
    /// The cache is only updated once the file write succeeds.
    ///
    /// # Errors
    /// Returns [Error::Storage] if the file cannot be written.
    pub fn insert(&mut self, transaction: Transaction) -> Result<Transaction, Error> {
        append_one(&self.path, &transaction)?;
        tracing::debug!("Appended transaction {}", transaction.id);

        self.transactions.push(transaction.clone());

        Ok(transaction)
    }
}
