//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{Error, config::Config, id::IdGenerator, transaction::TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The transactions, shared between requests.
    ///
    /// The lock must be held for the whole of a create so that the data file and
    /// the cache receive transactions in the same order.
    pub transaction_store: Arc<Mutex<TransactionStore>>,

    /// Generates the IDs of new transactions.
    pub id_generator: Arc<dyn IdGenerator>,

    /// The directory static files are served from.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create a new [AppState] from `config`.
    ///
    /// This function will create the data file if needed and load all of its transactions.
    ///
    /// # Errors
    /// Returns an error if the data file cannot be created or read, or contains a corrupt row.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let transaction_store = TransactionStore::open(&config.data_file)?;

        Ok(Self::from_parts(
            transaction_store,
            Arc::from(config.id_strategy.generator()),
            config.static_dir.clone(),
        ))
    }

    /// Create a new [AppState] from an already opened store and a custom ID generator.
    pub fn from_parts(
        transaction_store: TransactionStore,
        id_generator: Arc<dyn IdGenerator>,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            transaction_store: Arc::new(Mutex::new(transaction_store)),
            id_generator,
            static_dir,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::{AppState, id::test_utils::SequentialIdGenerator, transaction::TransactionStore};

    /// The name of the data file inside the test directory.
    pub(crate) const DATA_FILE_NAME: &str = "transactions.csv";

    /// Create state backed by a fresh data file in `dir` with sequential IDs.
    pub(crate) fn get_test_state(dir: &TempDir) -> AppState {
        let store = TransactionStore::open(dir.path().join("data").join(DATA_FILE_NAME))
            .expect("Could not open transaction store.");

        AppState::from_parts(
            store,
            Arc::new(SequentialIdGenerator::default()),
            dir.path().join("static"),
        )
    }
}
