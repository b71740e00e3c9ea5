// File: src/store/flat.rs
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{BigramStore, StoreError};
use crate::core::signature::letter_signature;
use crate::core::types::{WordId, END, START};

/// On-disk shape of a flat model: one mapping keyed `"prev:next"`. A
/// BTreeMap keeps the serialized key order stable across rebuilds.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct FlatModel(BTreeMap<String, u64>);

/// Small-model form: the whole pair-frequency mapping held in memory.
/// Serialized as a single map keyed `"prev:next"`, either as JSON (the
/// inspectable form) or bincode (the compact one). Word runs never
/// contain `:`, so the key shape is unambiguous.
pub struct FlatStore {
    frequencies: HashMap<(String, String), f64>,
    /// Sorted, sentinels included; positions double as word ids.
    vocabulary: Vec<String>,
    word_ids: HashMap<String, WordId>,
}

impl FlatStore {
    /// Loads a flat model, picking the codec from the file extension
    /// (`.bin` for bincode, JSON otherwise).
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        let model: FlatModel = match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => bincode::deserialize_from(reader)
                .map_err(|e| StoreError::Malformed(e.to_string()))?,
            _ => serde_json::from_reader(reader)
                .map_err(|e| StoreError::Malformed(e.to_string()))?,
        };
        Self::from_raw(model.0)
    }

    fn from_raw(raw: BTreeMap<String, u64>) -> Result<Self, StoreError> {
        let mut frequencies = HashMap::with_capacity(raw.len());
        for (key, count) in raw {
            let (prev, next) = key.split_once(':').ok_or_else(|| {
                StoreError::Malformed(format!("bigram key without separator: {key:?}"))
            })?;
            frequencies.insert((prev.to_string(), next.to_string()), count as f64);
        }

        let mut vocabulary: Vec<String> = frequencies
            .keys()
            .flat_map(|(prev, next)| [prev.clone(), next.clone()])
            .collect();
        vocabulary.sort_unstable();
        vocabulary.dedup();
        let word_ids = vocabulary
            .iter()
            .enumerate()
            .map(|(id, word)| (word.clone(), id as WordId))
            .collect();

        Ok(Self {
            frequencies,
            vocabulary,
            word_ids,
        })
    }
}

impl BigramStore for FlatStore {
    fn signature_entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .vocabulary
            .iter()
            .filter(|word| word.as_str() != START && word.as_str() != END)
            .map(|word| (letter_signature(word), word.clone()))
            .collect())
    }

    fn resolve_vocabulary(
        &self,
        words: &HashSet<String>,
    ) -> Result<HashMap<String, WordId>, StoreError> {
        Ok(words
            .iter()
            .filter_map(|word| self.word_ids.get(word).map(|id| (word.clone(), *id)))
            .collect())
    }

    fn batch_lookup(
        &self,
        pairs: &HashSet<(String, String)>,
    ) -> Result<HashMap<(String, String), f64>, StoreError> {
        Ok(pairs
            .iter()
            .filter_map(|pair| self.frequencies.get(pair).map(|f| (pair.clone(), *f)))
            .collect())
    }
}

/// Serializes counts as the JSON mapping `{"prev:next": count}`.
pub fn write_json(path: &Path, counts: &HashMap<(String, String), u64>) -> Result<(), StoreError> {
    write_atomic(path, |writer| {
        serde_json::to_writer(writer, &keyed(counts)).map_err(|e| StoreError::Malformed(e.to_string()))
    })
}

/// Serializes counts as the bincode equivalent of the JSON mapping.
pub fn write_bincode(
    path: &Path,
    counts: &HashMap<(String, String), u64>,
) -> Result<(), StoreError> {
    write_atomic(path, |writer| {
        bincode::serialize_into(writer, &keyed(counts)).map_err(|e| StoreError::Malformed(e.to_string()))
    })
}

fn keyed(counts: &HashMap<(String, String), u64>) -> FlatModel {
    FlatModel(
        counts
            .iter()
            .map(|((prev, next), count)| (format!("{prev}:{next}"), *count))
            .collect(),
    )
}

/// Writes through a named temp file in the target directory and persists
/// it over `path`, so a crash mid-write never leaves a torn model.
fn write_atomic<F>(path: &Path, serialize: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), StoreError>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = BufWriter::new(&temp);
    serialize(&mut writer)?;
    writer.flush()?;
    drop(writer);
    temp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
