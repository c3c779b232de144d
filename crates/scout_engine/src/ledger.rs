use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scout_core::Ledger;
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("ledger {path} is not valid progress JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write ledger: {0}")]
    Persist(#[from] PersistError),
}

/// Where run progress lives between invocations.
///
/// A store that has never been written loads as an empty ledger.
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> Result<Ledger, LedgerError>;
    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;
}

/// Ledger kept as one JSON document, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileLedger {
    fn load(&self) -> Result<Ledger, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(source) => {
                return Err(LedgerError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Ledger::new());
        }
        serde_json::from_str(&content).map_err(|source| LedgerError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let content = serde_json::to_vec(ledger)?;
        write_atomically(&self.path, &content)?;
        Ok(())
    }
}

/// In-process ledger, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<(Ledger, usize)>,
}

impl MemoryLedger {
    pub fn new(initial: Ledger) -> Self {
        Self {
            state: Mutex::new((initial, 0)),
        }
    }

    pub fn snapshot(&self) -> Ledger {
        self.state.lock().map(|s| s.0.clone()).unwrap_or_default()
    }

    /// Number of completed `save` calls.
    pub fn saves(&self) -> usize {
        self.state.lock().map(|s| s.1).unwrap_or_default()
    }
}

impl LedgerStore for MemoryLedger {
    fn load(&self) -> Result<Ledger, LedgerError> {
        Ok(self.snapshot())
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        if let Ok(mut state) = self.state.lock() {
            state.0 = ledger.clone();
            state.1 += 1;
        }
        Ok(())
    }
}
