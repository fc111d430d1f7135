//! Mining queries as submitted by callers: a family name, a dataset
//! identifier and a string-keyed parameter map, plus the conversion of those
//! parameters into a concrete [`Pattern`] for a given database.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;

use super::database::TransactionDb;
use super::error::{MiningError, Result};
use super::pattern::Pattern;

pub const MIN_SUPPORT: &str = "minSupport";
pub const MAX_SUPPORT: &str = "maxSupport";
pub const MIN_SIZE: &str = "minSize";
pub const MAX_SIZE: &str = "maxSize";
pub const ITEMS: &str = "items";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Frequent,
    Closed,
    Maximal,
    Rare,
    Generators,
    Minimal,
    SizeBetween,
    Presence,
    Absence,
}

impl Family {
    pub const ALL: [Family; 9] = [
        Family::Frequent,
        Family::Closed,
        Family::Maximal,
        Family::Rare,
        Family::Generators,
        Family::Minimal,
        Family::SizeBetween,
        Family::Presence,
        Family::Absence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Frequent => "frequent",
            Family::Closed => "closed",
            Family::Maximal => "maximal",
            Family::Rare => "rare",
            Family::Generators => "generators",
            Family::Minimal => "minimal",
            Family::SizeBetween => "size_between",
            Family::Presence => "presence",
            Family::Absence => "absence",
        }
    }

    /// Builds the pattern for this family from raw query parameters.
    pub fn pattern(self, params: &BTreeMap<String, String>, db: &TransactionDb) -> Result<Pattern> {
        let pattern = match self {
            Family::Frequent => Pattern::Frequent {
                min_support: support_threshold(params, MIN_SUPPORT, db)?,
            },
            Family::Closed => Pattern::Closed {
                min_support: support_threshold(params, MIN_SUPPORT, db)?,
            },
            Family::Maximal => Pattern::Maximal {
                min_support: support_threshold(params, MIN_SUPPORT, db)?,
            },
            Family::Generators => Pattern::Generator {
                min_support: support_threshold(params, MIN_SUPPORT, db)?,
            },
            Family::Rare => Pattern::Rare {
                max_support: rare_threshold(params, db)?,
            },
            Family::Minimal => Pattern::MinimalRare {
                max_support: support_threshold(params, MAX_SUPPORT, db)?,
            },
            Family::SizeBetween => {
                let min_support = support_threshold(params, MIN_SUPPORT, db)?;
                let (min_size, max_size) = size_range(params, db.nb_items())?;
                Pattern::SizeBetween {
                    min_support,
                    min_size,
                    max_size,
                }
            }
            Family::Presence | Family::Absence => {
                let min_support = support_threshold(params, MIN_SUPPORT, db)?;
                let items = item_indices(item_list(params, self)?, db.nb_items());
                if items.is_empty() {
                    warn!(
                        "No valid item left for {} constraint, mining plain closed itemsets",
                        self
                    );
                    Pattern::Closed { min_support }
                } else if self == Family::Presence {
                    Pattern::Presence {
                        min_support,
                        required: items,
                    }
                } else {
                    Pattern::Absence {
                        min_support,
                        forbidden: items,
                    }
                }
            }
        };
        Ok(pattern)
    }
}

impl FromStr for Family {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self> {
        Family::ALL
            .into_iter()
            .find(|family| family.as_str() == s.trim())
            .ok_or_else(|| MiningError::Parameter(format!("Unknown query type: {}", s)))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub family: Family,
    pub dataset: String,
    pub params: BTreeMap<String, String>,
}

impl Query {
    pub fn new(family: Family, dataset: impl Into<String>) -> Self {
        Self {
            family,
            dataset: dataset.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn pattern(&self, db: &TransactionDb) -> Result<Pattern> {
        self.family.pattern(&self.params, db)
    }
}

fn required<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            MiningError::Parameter(format!("Required parameter '{}' is missing or empty", key))
        })
}

/// `ceil(ratio * nb_transactions)` for a ratio in `(0, 1]`.
fn support_threshold(params: &BTreeMap<String, String>, key: &str, db: &TransactionDb) -> Result<u32> {
    let raw = required(params, key)?;
    let ratio: f64 = raw
        .parse()
        .map_err(|_| MiningError::Parameter(format!("Invalid {} value: {}", key, raw)))?;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(MiningError::Parameter(format!(
            "{} must be between 0.0 (exclusive) and 1.0 (inclusive)",
            key
        )));
    }
    // Plain ceil of the product: 0.07 * 100 is 7.000000000000001, giving 8.
    let scaled = ratio * db.nb_transactions() as f64;
    Ok((scaled.ceil() as u32).max(1))
}

fn rare_threshold(params: &BTreeMap<String, String>, db: &TransactionDb) -> Result<u32> {
    let max_support = support_threshold(params, MAX_SUPPORT, db)?;
    if max_support <= 1 {
        return Err(MiningError::Parameter(format!(
            "{} must result in a threshold greater than 1 transaction",
            MAX_SUPPORT
        )));
    }
    Ok(max_support)
}

fn size_param(params: &BTreeMap<String, String>, key: &str) -> Result<i64> {
    let raw = required(params, key)?;
    raw.parse()
        .map_err(|_| MiningError::Parameter(format!("Invalid {} value: {}", key, raw)))
}

fn size_range(params: &BTreeMap<String, String>, nb_items: usize) -> Result<(usize, usize)> {
    let min_size = size_param(params, MIN_SIZE)?;
    let max_size = size_param(params, MAX_SIZE)?;

    if min_size < 1 {
        return Err(MiningError::Parameter("minSize must be at least 1".to_string()));
    }
    if max_size < min_size {
        return Err(MiningError::Parameter(
            "maxSize must be greater than or equal to minSize".to_string(),
        ));
    }

    let min_size = min_size as usize;
    let mut max_size = usize::try_from(max_size).unwrap_or(usize::MAX);
    if max_size > nb_items {
        warn!(
            "maxSize is greater than the number of items in the database. Setting maxSize to {}",
            nb_items
        );
        max_size = nb_items;
    }
    Ok((min_size, max_size))
}

/// The `items` list, or its legacy alias named after the family.
fn item_list(params: &BTreeMap<String, String>, family: Family) -> Result<&str> {
    required(params, ITEMS).or_else(|err| match params.get(family.as_str()) {
        Some(raw) => Ok(raw.as_str()),
        None => Err(err),
    })
}

/// Parses comma-separated 1-based item indices into sorted 0-based ones,
/// skipping entries that are not numbers or fall outside the universe.
fn item_indices(raw: &str, nb_items: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<usize>() {
            Ok(index) if (1..=nb_items).contains(&index) => Some(index - 1),
            Ok(index) => {
                warn!(
                    "Index {} is out of range (valid range: 1-{})",
                    index, nb_items
                );
                None
            }
            Err(_) => {
                warn!("Invalid index value: {}", token);
                None
            }
        })
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}
