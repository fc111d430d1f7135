//! Enumeration engine: runs one [`Pattern`] against one [`TransactionDb`].

mod search;

use std::collections::BTreeMap;

use log::info;

use self::search::Search;
use super::config::SearchConfig;
use super::database::TransactionDb;
use super::error::Result;
use super::pattern::Pattern;
use super::query::Family;
use super::store::PatternStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, including pruned ones.
    pub nodes: u64,
    /// Subtrees discarded by the pattern's pruning test.
    pub pruned: u64,
    pub emitted: u64,
}

#[derive(Debug, Clone)]
pub struct Mined {
    pub results: PatternStore,
    pub stats: SearchStats,
}

/// Enumerates every itemset of `db` accepted by `pattern`, in canonical
/// order. `cancelled` is polled once per search node; as soon as it returns
/// true the run stops with [`MiningError::Cancelled`].
///
/// [`MiningError::Cancelled`]: super::error::MiningError::Cancelled
pub fn mine<F>(db: &TransactionDb, pattern: &Pattern, config: &SearchConfig, cancelled: F) -> Result<Mined>
where
    F: Fn() -> bool,
{
    pattern.validate(db)?;
    info!(
        "Starting {} itemset mining over {} items and {} transactions",
        pattern,
        db.nb_items(),
        db.nb_transactions()
    );

    let (results, stats) = Search::new(db, pattern, config, &cancelled).run()?;

    info!(
        "{} itemset mining completed. Found {} results ({} nodes, {} pruned, by size {:?}).",
        pattern.name(),
        results.len(),
        stats.nodes,
        stats.pruned,
        results.count_by_size()
    );
    Ok(Mined { results, stats })
}

/// Uncancellable run with the default configuration.
pub fn mine_all(db: &TransactionDb, pattern: &Pattern) -> Result<Mined> {
    mine(db, pattern, &SearchConfig::default(), || false)
}

/// Converts raw query parameters and runs the resulting pattern.
pub fn mine_family<F>(
    db: &TransactionDb,
    family: Family,
    params: &BTreeMap<String, String>,
    config: &SearchConfig,
    cancelled: F,
) -> Result<Mined>
where
    F: Fn() -> bool,
{
    let pattern = family.pattern(params, db)?;
    mine(db, &pattern, config, cancelled)
}
