//! In-memory transactional database with an item → transactions inverted
//! index. Every support computation in the crate goes through [`Cover`]s
//! produced here.

mod bitset;
pub mod reader;

pub use bitset::{Cover, Itemset};
pub use reader::{parse_dat, read_dat};

use std::collections::HashMap;

use rayon::prelude::*;

use super::error::{MiningError, Result};

/// External identifier of an item as it appears in the dataset.
pub type ItemId = u32;

#[derive(Debug, Clone)]
pub struct TransactionDb {
    /// Item ids sorted ascending; position is the dense item index.
    items: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
    /// Each transaction as sorted, deduplicated item indices.
    transactions: Vec<Vec<usize>>,
    /// `covers[i]` is the set of transactions containing item `i`.
    covers: Vec<Cover>,
}

impl TransactionDb {
    /// Builds the item universe and the inverted index.
    pub fn new(transactions: Vec<Vec<ItemId>>) -> Result<Self> {
        if transactions.is_empty() {
            return Err(MiningError::Database(
                "database contains no transactions".to_string(),
            ));
        }
        if u32::try_from(transactions.len()).is_err() {
            return Err(MiningError::Database(format!(
                "database holds {} transactions, more than a support counter can represent",
                transactions.len()
            )));
        }
        if let Some(tx_idx) = transactions.iter().position(|tx| tx.contains(&0)) {
            return Err(MiningError::Database(format!(
                "transaction {} contains item 0; item ids must be positive",
                tx_idx + 1
            )));
        }

        let mut items: Vec<ItemId> = transactions.iter().flatten().copied().collect();
        items.sort_unstable();
        items.dedup();
        if items.is_empty() {
            return Err(MiningError::Database(
                "database contains no items".to_string(),
            ));
        }

        let index: HashMap<ItemId, usize> = items
            .iter()
            .enumerate()
            .map(|(idx, &item)| (item, idx))
            .collect();

        let transactions: Vec<Vec<usize>> = transactions
            .par_iter()
            .map(|tx| {
                let mut indices: Vec<usize> = tx.iter().map(|item| index[item]).collect();
                indices.sort_unstable();
                indices.dedup();
                indices
            })
            .collect();

        let mut covers = vec![Cover::empty(transactions.len()); items.len()];
        for (tx_idx, tx) in transactions.iter().enumerate() {
            for &item in tx {
                covers[item].insert(tx_idx);
            }
        }

        Ok(Self {
            items,
            index,
            transactions,
            covers,
        })
    }

    pub fn nb_items(&self) -> usize {
        self.items.len()
    }

    pub fn nb_transactions(&self) -> usize {
        self.transactions.len()
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn item_id(&self, index: usize) -> ItemId {
        self.items[index]
    }

    pub fn index_of(&self, item: ItemId) -> Option<usize> {
        self.index.get(&item).copied()
    }

    /// Raw transactions as item indices, independent of the inverted index.
    pub fn transactions(&self) -> &[Vec<usize>] {
        &self.transactions
    }

    pub fn item_cover(&self, index: usize) -> &Cover {
        &self.covers[index]
    }

    pub fn full_cover(&self) -> Cover {
        Cover::full(self.nb_transactions())
    }

    pub fn empty_itemset(&self) -> Itemset {
        Itemset::empty(self.nb_items())
    }

    pub fn cover(&self, itemset: &Itemset) -> Cover {
        debug_assert_eq!(itemset.width(), self.nb_items());
        let mut cover = self.full_cover();
        for item in itemset.iter() {
            cover.intersect_with(&self.covers[item]);
        }
        cover
    }

    pub fn support(&self, itemset: &Itemset) -> u32 {
        self.cover(itemset).len()
    }

    /// Support of `itemset` with `skipped` left out.
    pub fn support_without(&self, itemset: &Itemset, skipped: usize) -> u32 {
        let mut cover = self.full_cover();
        for item in itemset.iter().filter(|&item| item != skipped) {
            cover.intersect_with(&self.covers[item]);
        }
        cover.len()
    }

    /// Translates item ids into an itemset; `None` if an id is unknown.
    pub fn itemset_of(&self, ids: &[ItemId]) -> Option<Itemset> {
        let mut itemset = self.empty_itemset();
        for &id in ids {
            itemset.insert(self.index_of(id)?);
        }
        Some(itemset)
    }

    /// Member item ids in ascending order.
    pub fn ids_of(&self, itemset: &Itemset) -> Vec<ItemId> {
        itemset.iter().map(|index| self.items[index]).collect()
    }
}
