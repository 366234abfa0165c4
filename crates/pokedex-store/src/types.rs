//! Record types for the dataset and the values derived from it.

use serde::{Deserialize, Serialize};

/// A lightweight pointer from one record to another, resolved by `num`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionRef {
    pub num: String,
    pub name: String,
}

/// One Pokémon as stored in the dataset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: String,
    pub num: String,
    pub name: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub egg: String,
    #[serde(default)]
    pub prev_evolutions: Vec<EvolutionRef>,
    #[serde(default)]
    pub next_evolutions: Vec<EvolutionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candy_count: Option<i64>,
}

impl Pokemon {
    /// Ordering key: ids that parse as integers come first in numeric order,
    /// anything else follows in string order.
    pub fn id_order(&self) -> IdOrder<'_> {
        match self.id.trim().parse::<u64>() {
            Ok(n) => IdOrder::Numeric(n),
            Err(_) => IdOrder::Text(&self.id),
        }
    }
}

/// Sort key derived from a record id. See [`Pokemon::id_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IdOrder<'a> {
    Numeric(u64),
    Text(&'a str),
}

/// Every distinct type and weakness present in the dataset, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Required type and weakness tags for a list query.
///
/// A record passes when it carries every listed type and every listed weakness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.weaknesses.is_empty()
    }
}
