use super::database::ItemId;

/// One accepted itemset and its support.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MiningResult {
    pub pattern: Vec<ItemId>,
    pub freq: u32,
}

/// Flat storage for mined patterns: all item ids in one buffer, one
/// `(start, len)` offset and one support per pattern, in emission order.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    items: Vec<ItemId>,
    offsets: Vec<(usize, usize)>,
    supports: Vec<u32>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(estimated_items: usize, estimated_patterns: usize) -> Self {
        Self {
            items: Vec::with_capacity(estimated_items),
            offsets: Vec::with_capacity(estimated_patterns),
            supports: Vec::with_capacity(estimated_patterns),
        }
    }

    /// Appends a pattern whose ids are already sorted ascending.
    pub fn push(&mut self, pattern: &[ItemId], support: u32) -> usize {
        debug_assert!(pattern.windows(2).all(|w| w[0] < w[1]));
        let start = self.items.len();
        self.items.extend_from_slice(pattern);
        self.offsets.push((start, pattern.len()));
        self.supports.push(support);
        self.offsets.len() - 1
    }

    pub fn get(&self, idx: usize) -> (&[ItemId], u32) {
        let (start, len) = self.offsets[idx];
        (&self.items[start..start + len], self.supports[idx])
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[ItemId], u32)> {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    /// Number of patterns per size; index 0 holds 1-itemsets.
    pub fn count_by_size(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for &(_, len) in self.offsets.iter().filter(|&&(_, len)| len > 0) {
            if counts.len() < len {
                counts.resize(len, 0);
            }
            counts[len - 1] += 1;
        }
        counts
    }

    pub fn to_results(&self) -> Vec<MiningResult> {
        self.iter()
            .map(|(pattern, freq)| MiningResult {
                pattern: pattern.to_vec(),
                freq,
            })
            .collect()
    }
}
