use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use chipledger_wallet::LedgerState;

use super::{LedgerStore, StoreError};

/// Flat-file JSON store: the whole ledger lives in one pretty-printed file.
///
/// No locking and no atomic rename; a crash mid-write can truncate the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let doc: Value = serde_json::from_str(&contents)?;
        if !doc.get("players").is_some_and(Value::is_object) {
            return Err(StoreError::MissingPlayers);
        }

        Ok(Some(serde_json::from_value(doc)?))
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}
