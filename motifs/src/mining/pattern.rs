//! The pattern families the engine can enumerate.
//!
//! Each variant carries its absolute thresholds and answers two kinds of
//! questions: pruning hooks ([`Pattern::bound`], [`Pattern::admits`],
//! [`Pattern::first_unskippable`]) that let the search drop whole subtrees,
//! and [`Pattern::accept`], which on its own decides membership. Pruning
//! only ever removes itemsets that `accept` would reject.

use std::fmt;

use super::database::{Cover, Itemset, TransactionDb};
use super::error::{MiningError, Result};

/// What the search may do below a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Keep extending.
    Open,
    /// The node is a candidate but no superset can be.
    Saturated,
    /// Neither the node nor any superset can be accepted.
    Prune,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Frequent {
        min_support: u32,
    },
    Closed {
        min_support: u32,
    },
    Maximal {
        min_support: u32,
    },
    Generator {
        min_support: u32,
    },
    /// Itemsets occurring in the data with `support < max_support`.
    Rare {
        max_support: u32,
    },
    /// Itemsets with `support < max_support` whose proper subsets all
    /// reach `max_support`. Unlike [`Pattern::Rare`], these may be absent
    /// from the data.
    MinimalRare {
        max_support: u32,
    },
    /// Closed itemsets with `min_size <= |X| <= max_size`.
    SizeBetween {
        min_support: u32,
        min_size: usize,
        max_size: usize,
    },
    /// Closed itemsets containing every `required` item index.
    Presence {
        min_support: u32,
        required: Vec<usize>,
    },
    /// Closed itemsets containing none of the `forbidden` item indices.
    Absence {
        min_support: u32,
        forbidden: Vec<usize>,
    },
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Frequent { .. } => "frequent",
            Pattern::Closed { .. } => "closed",
            Pattern::Maximal { .. } => "maximal",
            Pattern::Generator { .. } => "generator",
            Pattern::Rare { .. } => "rare",
            Pattern::MinimalRare { .. } => "minimal rare",
            Pattern::SizeBetween { .. } => "size-bounded closed",
            Pattern::Presence { .. } => "presence-constrained closed",
            Pattern::Absence { .. } => "absence-constrained closed",
        }
    }

    fn min_support(&self) -> Option<u32> {
        match self {
            Pattern::Frequent { min_support }
            | Pattern::Closed { min_support }
            | Pattern::Maximal { min_support }
            | Pattern::Generator { min_support }
            | Pattern::SizeBetween { min_support, .. }
            | Pattern::Presence { min_support, .. }
            | Pattern::Absence { min_support, .. } => Some(*min_support),
            Pattern::Rare { .. } | Pattern::MinimalRare { .. } => None,
        }
    }

    /// Rejects item indices that do not exist in `db`.
    pub fn validate(&self, db: &TransactionDb) -> Result<()> {
        let indices = match self {
            Pattern::Presence { required, .. } => required,
            Pattern::Absence { forbidden, .. } => forbidden,
            _ => return Ok(()),
        };
        match indices.iter().find(|&&item| item >= db.nb_items()) {
            Some(item) => Err(MiningError::Parameter(format!(
                "item index {} is out of range (valid range: 1-{})",
                item + 1,
                db.nb_items()
            ))),
            None => Ok(()),
        }
    }

    /// Pruning test for the node holding an itemset of `len` items.
    pub fn bound(&self, len: usize, support: u32) -> Bound {
        if let Some(min_support) = self.min_support() {
            if support < min_support {
                return Bound::Prune;
            }
        }
        match self {
            Pattern::Rare { .. } if support == 0 => Bound::Prune,
            // Every strict superset would have this node as a rare proper
            // subset. The root covers every transaction, so it stays open.
            Pattern::MinimalRare { max_support } if len > 0 && support < *max_support => {
                Bound::Saturated
            }
            Pattern::SizeBetween { max_size, .. } if len >= *max_size => Bound::Saturated,
            _ => Bound::Open,
        }
    }

    /// Whether `item` may ever be added to a candidate.
    pub fn admits(&self, item: usize) -> bool {
        match self {
            Pattern::Absence { forbidden, .. } => forbidden.binary_search(&item).is_err(),
            _ => true,
        }
    }

    /// First item index at or after `from` that a candidate cannot go
    /// without. The search never skips past it.
    pub fn first_unskippable(&self, from: usize) -> Option<usize> {
        match self {
            Pattern::Presence { required, .. } => {
                required.iter().copied().find(|&item| item >= from)
            }
            _ => None,
        }
    }

    /// Acceptance test for `itemset`, whose cover and support are given.
    pub fn accept(&self, db: &TransactionDb, itemset: &Itemset, cover: &Cover, support: u32) -> bool {
        if itemset.is_empty() {
            return false;
        }
        match self {
            Pattern::Frequent { min_support } => support >= *min_support,
            Pattern::Closed { min_support } => {
                support >= *min_support && is_closed(db, itemset, cover, support)
            }
            Pattern::Maximal { min_support } => {
                support >= *min_support && is_maximal(db, itemset, cover, *min_support)
            }
            Pattern::Generator { min_support } => {
                support >= *min_support && is_generator(db, itemset, support)
            }
            Pattern::Rare { max_support } => is_rare(support, *max_support),
            Pattern::MinimalRare { max_support } => {
                support < *max_support && has_frequent_subsets(db, itemset, *max_support)
            }
            Pattern::SizeBetween {
                min_support,
                min_size,
                max_size,
            } => {
                (*min_size..=*max_size).contains(&itemset.len())
                    && support >= *min_support
                    && is_closed(db, itemset, cover, support)
            }
            Pattern::Presence {
                min_support,
                required,
            } => {
                required.iter().all(|&item| itemset.contains(item))
                    && support >= *min_support
                    && is_closed(db, itemset, cover, support)
            }
            Pattern::Absence {
                min_support,
                forbidden,
            } => {
                forbidden.iter().all(|&item| !itemset.contains(item))
                    && support >= *min_support
                    && is_closed(db, itemset, cover, support)
            }
        }
    }

    /// Evaluates the pattern on an arbitrary itemset, outside of a search.
    pub fn holds(&self, db: &TransactionDb, itemset: &Itemset) -> bool {
        let cover = db.cover(itemset);
        let support = cover.len();
        self.accept(db, itemset, &cover, support)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Rare { max_support } | Pattern::MinimalRare { max_support } => {
                write!(f, "{} (maxSupport: {})", self.name(), max_support)
            }
            Pattern::SizeBetween {
                min_support,
                min_size,
                max_size,
            } => write!(
                f,
                "{} (minSupport: {}, size: {}..={})",
                self.name(),
                min_support,
                min_size,
                max_size
            ),
            _ => write!(
                f,
                "{} (minSupport: {})",
                self.name(),
                self.min_support().unwrap_or_default()
            ),
        }
    }
}

fn is_rare(support: u32, max_support: u32) -> bool {
    support >= 1 && support < max_support
}

/// No single-item extension keeps the support.
fn is_closed(db: &TransactionDb, itemset: &Itemset, cover: &Cover, support: u32) -> bool {
    (0..db.nb_items())
        .filter(|&item| !itemset.contains(item))
        .all(|item| cover.intersection_len(db.item_cover(item)) < support)
}

/// No single-item extension stays frequent.
fn is_maximal(db: &TransactionDb, itemset: &Itemset, cover: &Cover, min_support: u32) -> bool {
    (0..db.nb_items())
        .filter(|&item| !itemset.contains(item))
        .all(|item| cover.intersection_len(db.item_cover(item)) < min_support)
}

/// Every immediate subset has strictly higher support; by anti-monotonicity
/// so does every proper subset.
fn is_generator(db: &TransactionDb, itemset: &Itemset, support: u32) -> bool {
    itemset
        .iter()
        .all(|item| db.support_without(itemset, item) > support)
}

/// Every immediate subset, and so every proper subset, reaches `max_support`.
fn has_frequent_subsets(db: &TransactionDb, itemset: &Itemset, max_support: u32) -> bool {
    itemset
        .iter()
        .all(|item| db.support_without(itemset, item) >= max_support)
}
