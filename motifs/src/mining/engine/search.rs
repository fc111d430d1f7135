use log::debug;

use super::SearchStats;
use crate::mining::config::SearchConfig;
use crate::mining::database::{Cover, ItemId, Itemset, TransactionDb};
use crate::mining::error::{MiningError, Result};
use crate::mining::pattern::{Bound, Pattern};
use crate::mining::store::PatternStore;

/// Depth-first enumeration state for one run.
///
/// A node is the current itemset plus the first undecided item index. The
/// binary "exclude i, then include i" decision tree is walked in its
/// unrolled form: the node itself is the leaf reached by excluding every
/// remaining item, followed by the subtrees that include `j` for each
/// undecided `j`, largest first. Each itemset is therefore reached by
/// exactly one path and recursion depth never exceeds its size.
pub(crate) struct Search<'a, F> {
    db: &'a TransactionDb,
    pattern: &'a Pattern,
    config: &'a SearchConfig,
    cancelled: &'a F,
    itemset: Itemset,
    ids: Vec<ItemId>,
    store: PatternStore,
    stats: SearchStats,
}

impl<'a, F> Search<'a, F>
where
    F: Fn() -> bool,
{
    pub(crate) fn new(
        db: &'a TransactionDb,
        pattern: &'a Pattern,
        config: &'a SearchConfig,
        cancelled: &'a F,
    ) -> Self {
        Self {
            db,
            pattern,
            config,
            cancelled,
            itemset: db.empty_itemset(),
            ids: Vec::new(),
            store: PatternStore::new(),
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<(PatternStore, SearchStats)> {
        let root = self.db.full_cover();
        self.visit(0, &root)?;
        Ok((self.store, self.stats))
    }

    fn visit(&mut self, next: usize, cover: &Cover) -> Result<()> {
        if (self.cancelled)() {
            return Err(MiningError::Cancelled);
        }
        self.stats.nodes += 1;
        if self.config.progress_interval > 0 && self.stats.nodes % self.config.progress_interval == 0 {
            debug!(
                "{} nodes visited, {} patterns found, current depth {}",
                self.stats.nodes,
                self.stats.emitted,
                self.itemset.len()
            );
        }

        let support = cover.len();
        let bound = if self.config.prune {
            self.pattern.bound(self.itemset.len(), support)
        } else {
            Bound::Open
        };
        if bound == Bound::Prune {
            self.stats.pruned += 1;
            return Ok(());
        }

        if self.pattern.accept(self.db, &self.itemset, cover, support) {
            self.emit(support);
        }
        if bound == Bound::Saturated {
            return Ok(());
        }

        let mut end = self.db.nb_items();
        if self.config.prune {
            if let Some(required) = self.pattern.first_unskippable(next) {
                end = end.min(required + 1);
            }
        }

        for item in (next..end).rev() {
            if self.config.prune && !self.pattern.admits(item) {
                continue;
            }
            let child = cover.intersect(self.db.item_cover(item));
            self.itemset.insert(item);
            let outcome = self.visit(item + 1, &child);
            self.itemset.remove(item);
            outcome?;
        }
        Ok(())
    }

    fn emit(&mut self, support: u32) {
        let db = self.db;
        self.ids.clear();
        self.ids.extend(self.itemset.iter().map(|item| db.item_id(item)));
        self.store.push(&self.ids, support);
        self.stats.emitted += 1;
    }
}
