//! The settings needed to start the server.

use std::path::PathBuf;

use crate::id::IdStrategy;

/// The port the server listens on if none is given.
pub const DEFAULT_PORT: u16 = 3000;
/// The directory static files are served from if none is given.
pub const DEFAULT_STATIC_DIR: &str = "static";
/// The data file used if none is given.
pub const DEFAULT_DATA_FILE: &str = "data/transactions.csv";

/// The server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The port to serve the app from.
    pub port: u16,
    /// The directory holding `index.html` and other static assets.
    pub static_dir: PathBuf,
    /// The comma separated file the transactions are stored in.
    pub data_file: PathBuf,
    /// How new transaction IDs are generated.
    pub id_strategy: IdStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            id_strategy: IdStrategy::default(),
        }
    }
}
