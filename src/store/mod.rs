pub mod flat;
pub mod sqlite;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;

use crate::core::types::WordId;

pub use flat::FlatStore;
pub use sqlite::SqliteStore;

/// Errors from opening, writing, or querying a persisted model. Only
/// configuration problems surface here; a missing word or pair is
/// answered by leaving it out of the result, never by an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed model file: {0}")]
    Malformed(String),
    #[error("model database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),
}

/// Read-side contract of a persisted bigram frequency model.
///
/// Every query is batched and restricted to the words or word pairs one
/// input text can touch, so an implementation never needs to hand the
/// whole model to the caller.
pub trait BigramStore {
    /// (signature, word) rows for every real word in the model, in a
    /// deterministic order, feeding the letter-signature index. The
    /// sentinel words are not included.
    fn signature_entries(&self) -> Result<Vec<(String, String)>, StoreError>;

    /// Identifiers for exactly those of `words` present in the model.
    /// Absent words are simply not returned.
    fn resolve_vocabulary(
        &self,
        words: &HashSet<String>,
    ) -> Result<HashMap<String, WordId>, StoreError>;

    /// Frequencies for exactly those of `pairs` present in the model.
    /// Absent pairs are not returned; the decoder substitutes its default
    /// transition weight for them.
    fn batch_lookup(
        &self,
        pairs: &HashSet<(String, String)>,
    ) -> Result<HashMap<(String, String), f64>, StoreError>;
}

/// Opens a model file read-only, picking the store implementation from
/// the path extension: `.db`/`.sqlite`/`.sqlite3` for the relational
/// form, `.json`/`.bin` for the flat forms.
pub fn open(path: &Path) -> Result<Box<dyn BigramStore>, StoreError> {
    match extension(path) {
        Some("db") | Some("sqlite") | Some("sqlite3") => Ok(Box::new(SqliteStore::open(path)?)),
        Some("json") | Some("bin") => Ok(Box::new(FlatStore::load(path)?)),
        _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Persists freshly counted bigrams to `path`, picking the on-disk form
/// from the extension the same way `open` does.
pub fn write(path: &Path, counts: &HashMap<(String, String), u64>) -> Result<(), StoreError> {
    match extension(path) {
        Some("db") | Some("sqlite") | Some("sqlite3") => sqlite::write_model(path, counts),
        Some("json") => flat::write_json(path, counts),
        Some("bin") => flat::write_bincode(path, counts),
        _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_a_configuration_error() {
        let err = match open(Path::new("model.parquet")) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(matches!(err, StoreError::UnsupportedFormat(_)));
        let err = write(Path::new("model"), &HashMap::new()).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_model_file_is_a_configuration_error() {
        assert!(open(Path::new("/nonexistent/model.json")).is_err());
        assert!(open(Path::new("/nonexistent/model.db")).is_err());
    }
}
