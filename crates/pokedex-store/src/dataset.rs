//! The in-memory dataset: loading, id lookup, evolution resolution, filter options.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use pokedex_core::{Error, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::types::{EvolutionRef, FilterOptions, Pokemon};

/// An evolution reference whose `num` matches no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Id of the record holding the reference.
    pub from_id: String,
    /// The unresolved `num`.
    pub num: String,
}

/// Immutable collection of records, indexed by `id` and by `num`.
///
/// Built once at startup and never mutated; share it behind an `Arc`.
#[derive(Debug)]
pub struct Dataset {
    /// Records sorted by [`Pokemon::id_order`].
    records: Vec<Pokemon>,
    by_id: HashMap<String, usize>,
    by_num: HashMap<String, usize>,
}

impl Dataset {
    /// Load the dataset from a JSON file.
    ///
    /// Any failure here is fatal for the service: a missing or malformed file
    /// must not turn into an empty dataset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::NotFound(format!("dataset file {}", path.display()))
            }
            _ => Error::Io(e),
        })?;

        let dataset = Self::from_json_str(&data)?;
        info!(
            "Loaded {} records from {} ({} evolution keys indexed)",
            dataset.len(),
            path.display(),
            dataset.by_num.len()
        );
        Ok(dataset)
    }

    /// Parse a dataset from either a map keyed by id or a plain array of records.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        let records = match value {
            serde_json::Value::Object(map) => {
                let mut records = Vec::with_capacity(map.len());
                for (key, raw) in map {
                    let record: Pokemon = serde_json::from_value(raw)?;
                    if record.id != key {
                        return Err(Error::Dataset(format!(
                            "record keyed '{}' carries id '{}'",
                            key, record.id
                        )));
                    }
                    records.push(record);
                }
                records
            }
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<Pokemon>, _>>()?,
            _ => {
                return Err(Error::Dataset(
                    "expected a JSON object keyed by id or an array of records".into(),
                ))
            }
        };

        Self::from_records(records)
    }

    /// Build the dataset and its indexes from already-parsed records.
    pub fn from_records(mut records: Vec<Pokemon>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::Dataset("dataset contains no records".into()));
        }

        records.sort_by(|a, b| a.id_order().cmp(&b.id_order()));

        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_num = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), idx).is_some() {
                return Err(Error::Dataset(format!("duplicate id '{}'", record.id)));
            }
            if let Some(&first) = by_num.get(&record.num) {
                let first: &Pokemon = &records[first];
                warn!(
                    "num '{}' shared by '{}' and '{}'; evolutions resolve to '{}'",
                    record.num, first.name, record.name, first.name
                );
            } else {
                by_num.insert(record.num.clone(), idx);
            }
        }

        Ok(Self {
            records,
            by_id,
            by_num,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in id order.
    pub fn records(&self) -> &[Pokemon] {
        &self.records
    }

    /// Look up a record by id. Unknown ids are an absence, not an error.
    pub fn get(&self, id: &str) -> Option<&Pokemon> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// Look up a record by its evolution key.
    pub fn get_by_num(&self, num: &str) -> Option<&Pokemon> {
        self.by_num.get(num).map(|&idx| &self.records[idx])
    }

    /// Resolve evolution references to full records, keeping reference order.
    /// References with no matching `num` are dropped.
    pub fn resolve_evolutions(&self, refs: &[EvolutionRef]) -> Vec<&Pokemon> {
        refs.iter()
            .filter_map(|r| self.get_by_num(&r.num))
            .collect()
    }

    pub fn prev_evolutions_of(&self, record: &Pokemon) -> Vec<&Pokemon> {
        self.resolve_evolutions(&record.prev_evolutions)
    }

    pub fn next_evolutions_of(&self, record: &Pokemon) -> Vec<&Pokemon> {
        self.resolve_evolutions(&record.next_evolutions)
    }

    /// Every distinct type and weakness across the dataset, sorted.
    pub fn filter_options(&self) -> FilterOptions {
        let mut types = BTreeSet::new();
        let mut weaknesses = BTreeSet::new();
        for record in &self.records {
            types.extend(record.types.iter().map(String::as_str));
            weaknesses.extend(record.weaknesses.iter().map(String::as_str));
        }
        FilterOptions {
            types: types.into_iter().map(str::to_string).collect(),
            weaknesses: weaknesses.into_iter().map(str::to_string).collect(),
        }
    }

    /// Evolution references that point at no record.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.records
            .iter()
            .flat_map(|record| {
                record
                    .prev_evolutions
                    .iter()
                    .chain(record.next_evolutions.iter())
                    .filter(|r| !self.by_num.contains_key(&r.num))
                    .map(|r| DanglingReference {
                        from_id: record.id.clone(),
                        num: r.num.clone(),
                    })
            })
            .collect()
    }
}
