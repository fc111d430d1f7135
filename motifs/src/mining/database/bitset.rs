use bitvec::prelude::*;

type Bits = BitVec<u64, Lsb0>;

/// Set of transaction indices containing a given itemset.
///
/// Bits past `width` are always zero so word-level popcounts are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    bits: Bits,
}

impl Cover {
    pub fn empty(width: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; width],
        }
    }

    pub fn full(width: usize) -> Self {
        let mut cover = Self::empty(width);
        cover.bits.fill(true);
        cover
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn insert(&mut self, transaction: usize) {
        self.bits.set(transaction, true);
    }

    pub fn contains(&self, transaction: usize) -> bool {
        self.bits[transaction]
    }

    /// Number of covered transactions, i.e. the support.
    pub fn len(&self) -> u32 {
        self.bits.count_ones() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn intersect_with(&mut self, other: &Cover) {
        debug_assert_eq!(self.width(), other.width());
        for (word, mask) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word &= *mask;
        }
    }

    pub fn intersect(&self, other: &Cover) -> Cover {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    /// `|self ∩ other|` without materialising the intersection.
    pub fn intersection_len(&self, other: &Cover) -> u32 {
        debug_assert_eq!(self.width(), other.width());
        self.bits
            .as_raw_slice()
            .iter()
            .zip(other.bits.as_raw_slice())
            .map(|(a, b)| (a & b).count_ones())
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

/// A subset of the item universe, addressed by dense item index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itemset {
    bits: Bits,
}

impl Itemset {
    pub fn empty(width: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; width],
        }
    }

    pub fn from_indices(width: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut itemset = Self::empty(width);
        for index in indices {
            itemset.insert(index);
        }
        itemset
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn insert(&mut self, item: usize) {
        self.bits.set(item, true);
    }

    pub fn remove(&mut self, item: usize) {
        self.bits.set(item, false);
    }

    pub fn contains(&self, item: usize) -> bool {
        self.bits[item]
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Member indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}
