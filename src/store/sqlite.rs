use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Transaction};
use tracing::info;

use super::{BigramStore, StoreError};
use crate::core::signature::letter_signature;
use crate::core::types::{WordId, END, START};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS letters (
        id         INTEGER PRIMARY KEY,
        signature  TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS words (
        id          INTEGER PRIMARY KEY,
        word        TEXT NOT NULL UNIQUE,
        letters_id  INTEGER NOT NULL REFERENCES letters(id)
    );

    CREATE INDEX IF NOT EXISTS idx_words_letters ON words(letters_id);

    CREATE TABLE IF NOT EXISTS bigrams (
        prev_id    INTEGER NOT NULL REFERENCES words(id),
        next_id    INTEGER NOT NULL REFERENCES words(id),
        frequency  INTEGER NOT NULL,
        UNIQUE (prev_id, next_id)
    );
";

/// Relational model form for corpora too large to hold in memory:
/// `letters` groups the vocabulary by signature, `words` maps words to
/// ids, `bigrams` holds the pair frequencies. Decoding opens the file
/// read-only and only ever queries by exact word or id pair, so memory
/// and latency stay bounded by the input text.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens an existing model read-only and verifies its schema. A
    /// missing file, a non-database file, and missing tables are all
    /// fatal configuration errors.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = Self { conn };
        store.check_schema()?;
        Ok(store)
    }

    fn check_schema(&self) -> Result<(), StoreError> {
        for table in ["letters", "words", "bigrams"] {
            let present: bool = self.conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                params![table],
                |row| row.get(0),
            )?;
            if !present {
                return Err(StoreError::Malformed(format!(
                    "model database is missing table {table}"
                )));
            }
        }
        Ok(())
    }
}

impl BigramStore for SqliteStore {
    fn signature_entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT l.signature, w.word FROM words w
             JOIN letters l ON l.id = w.letters_id
             WHERE w.word NOT IN (?1, ?2)
             ORDER BY w.id",
        )?;
        let rows = stmt.query_map(params![START, END], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn resolve_vocabulary(
        &self,
        words: &HashSet<String>,
    ) -> Result<HashMap<String, WordId>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id FROM words WHERE word = ?1")?;
        let mut resolved = HashMap::new();
        for word in words {
            let id = stmt
                .query_row(params![word], |row| row.get::<_, WordId>(0))
                .optional()?;
            if let Some(id) = id {
                resolved.insert(word.clone(), id);
            }
        }
        Ok(resolved)
    }

    fn batch_lookup(
        &self,
        pairs: &HashSet<(String, String)>,
    ) -> Result<HashMap<(String, String), f64>, StoreError> {
        let words: HashSet<String> = pairs
            .iter()
            .flat_map(|(prev, next)| [prev.clone(), next.clone()])
            .collect();
        let ids = self.resolve_vocabulary(&words)?;

        let mut stmt = self
            .conn
            .prepare("SELECT frequency FROM bigrams WHERE prev_id = ?1 AND next_id = ?2")?;
        let mut found = HashMap::new();
        for pair in pairs {
            let (Some(prev_id), Some(next_id)) = (ids.get(&pair.0), ids.get(&pair.1)) else {
                continue;
            };
            let frequency = stmt
                .query_row(params![prev_id, next_id], |row| row.get::<_, i64>(0))
                .optional()?;
            if let Some(frequency) = frequency {
                found.insert(pair.clone(), frequency as f64);
            }
        }
        Ok(found)
    }
}

/// Creates or updates the model at `path` from accumulated counts in one
/// transaction. Signature and word ids are cached in memory during the
/// build so each vocabulary row is written once.
pub fn write_model(path: &Path, counts: &HashMap<(String, String), u64>) -> Result<(), StoreError> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    {
        let mut letter_ids: HashMap<String, WordId> = HashMap::new();
        let mut word_ids: HashMap<String, WordId> = HashMap::new();

        // Deterministic insert order keeps word ids, and with them the
        // candidate enumeration order, stable across rebuilds.
        let mut ordered: Vec<(&(String, String), &u64)> = counts.iter().collect();
        ordered.sort();
        for ((prev, next), frequency) in ordered {
            let prev_id = intern_word(&tx, &mut letter_ids, &mut word_ids, prev)?;
            let next_id = intern_word(&tx, &mut letter_ids, &mut word_ids, next)?;
            tx.execute(
                "INSERT OR REPLACE INTO bigrams (prev_id, next_id, frequency) VALUES (?1, ?2, ?3)",
                params![prev_id, next_id, *frequency as i64],
            )?;
        }
    }
    tx.commit()?;
    info!(path = %path.display(), bigrams = counts.len(), "model database written");
    Ok(())
}

fn intern_word(
    tx: &Transaction<'_>,
    letter_ids: &mut HashMap<String, WordId>,
    word_ids: &mut HashMap<String, WordId>,
    word: &str,
) -> Result<WordId, StoreError> {
    if let Some(&id) = word_ids.get(word) {
        return Ok(id);
    }
    if let Some(id) = tx
        .query_row("SELECT id FROM words WHERE word = ?1", params![word], |row| row.get(0))
        .optional()?
    {
        word_ids.insert(word.to_string(), id);
        return Ok(id);
    }

    let signature = letter_signature(word);
    let letters_id = match letter_ids.get(&signature) {
        Some(&id) => id,
        None => {
            let id = match tx
                .query_row(
                    "SELECT id FROM letters WHERE signature = ?1",
                    params![signature],
                    |row| row.get(0),
                )
                .optional()?
            {
                Some(id) => id,
                None => {
                    tx.execute(
                        "INSERT INTO letters (signature) VALUES (?1)",
                        params![signature],
                    )?;
                    tx.last_insert_rowid()
                }
            };
            letter_ids.insert(signature.clone(), id);
            id
        }
    };

    tx.execute(
        "INSERT INTO words (word, letters_id) VALUES (?1, ?2)",
        params![word, letters_id],
    )?;
    let id = tx.last_insert_rowid();
    word_ids.insert(word.to_string(), id);
    Ok(id)
}
