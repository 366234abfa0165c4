//! Service configuration, read from the environment with defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_LIMIT: usize = 999;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIN_MATCH_LEN: usize = 3;
pub const DEFAULT_MAX_QUERY_DEPTH: usize = 10;

/// How the search stage matches a term against record names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPolicy {
    /// Case-insensitive substring match, input order preserved.
    #[default]
    Substring,
    /// Typo-tolerant approximate match, ordered by relevance.
    Fuzzy,
}

impl std::fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

impl std::str::FromStr for SearchPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(Error::Config(format!(
                "unknown search policy '{}', expected 'substring' or 'fuzzy'",
                other
            ))),
        }
    }
}

/// Top-level Pokédex configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokedexConfig {
    /// HTTP server port.
    pub port: u16,
    /// JSON file holding the dataset.
    pub data_file: PathBuf,
    /// Matching policy of the search stage.
    pub search_policy: SearchPolicy,
    /// Highest normalized edit distance still counted as a fuzzy match.
    pub fuzzy_threshold: f64,
    /// Search terms shorter than this never match under the fuzzy policy.
    pub min_match_len: usize,
    /// Page size used when a list query gives no `limit`.
    pub default_limit: usize,
    /// Deepest nesting of selection sets and input values a query may use.
    pub max_query_depth: usize,
}

impl PokedexConfig {
    /// Configuration with every tunable at its default.
    pub fn with_defaults(data_file: impl AsRef<Path>) -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: data_file.as_ref().to_path_buf(),
            search_policy: SearchPolicy::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
            default_limit: DEFAULT_LIMIT,
            max_query_depth: DEFAULT_MAX_QUERY_DEPTH,
        }
    }

    /// Create configuration from environment and defaults.
    pub fn from_env(data_file: impl AsRef<Path>) -> Result<Self> {
        Self::from_lookup(data_file, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(data_file: impl AsRef<Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_defaults(data_file);

        if let Some(port) = lookup("PORT") {
            config.port = parse_var("PORT", &port)?;
        }
        if let Some(policy) = lookup("POKEDEX_SEARCH_POLICY") {
            config.search_policy = policy.parse()?;
        }
        if let Some(threshold) = lookup("POKEDEX_FUZZY_THRESHOLD") {
            let threshold: f64 = parse_var("POKEDEX_FUZZY_THRESHOLD", &threshold)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Config(format!(
                    "POKEDEX_FUZZY_THRESHOLD must be within 0.0..=1.0, got {}",
                    threshold
                )));
            }
            config.fuzzy_threshold = threshold;
        }
        if let Some(len) = lookup("POKEDEX_MIN_MATCH_LEN") {
            config.min_match_len = parse_var("POKEDEX_MIN_MATCH_LEN", &len)?;
        }
        if let Some(limit) = lookup("POKEDEX_DEFAULT_LIMIT") {
            config.default_limit = parse_var("POKEDEX_DEFAULT_LIMIT", &limit)?;
        }
        if let Some(depth) = lookup("POKEDEX_MAX_QUERY_DEPTH") {
            let depth: usize = parse_var("POKEDEX_MAX_QUERY_DEPTH", &depth)?;
            if depth == 0 {
                return Err(Error::Config(
                    "POKEDEX_MAX_QUERY_DEPTH must be at least 1".to_string(),
                ));
            }
            config.max_query_depth = depth;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: '{}'", name, raw)))
}
