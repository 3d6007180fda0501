use alloc::vec::Vec;

use crate::fenwick::Fenwick;
use crate::range::ItemSizes;

/// Best-known size per index (measurement if any, otherwise the estimate) with prefix sums.
///
/// Built lazily by the virtualizer once sizes stop being uniform, then kept in sync with every
/// commit in `O(log n)`.
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeTable {
    sizes: Vec<u32>,
    sums: Fenwick,
}

impl SizeTable {
    pub(crate) fn build(count: usize, mut size_of: impl FnMut(usize) -> u32) -> Self {
        let mut sizes = Vec::with_capacity(count);
        for i in 0..count {
            sizes.push(size_of(i).max(1));
        }
        let sums = Fenwick::from_sizes(&sizes);
        Self { sizes, sums }
    }

    /// Replaces the size at `index`, returning the signed change.
    pub(crate) fn set(&mut self, index: usize, size: u32) -> i64 {
        let Some(slot) = self.sizes.get_mut(index) else {
            return 0;
        };
        let size = size.max(1);
        let delta = size as i64 - *slot as i64;
        *slot = size;
        self.sums.add(index, delta);
        delta
    }
}

impl ItemSizes for SizeTable {
    fn count(&self) -> usize {
        self.sizes.len()
    }

    fn size_of(&self, index: usize) -> u32 {
        self.sizes.get(index).copied().unwrap_or(1)
    }

    fn start_of(&self, index: usize) -> u64 {
        self.sums.prefix_sum(index)
    }

    fn index_at(&self, offset: u64) -> usize {
        self.sums.lower_bound(offset).min(self.sums.len())
    }

    fn total(&self) -> u64 {
        self.sums.total()
    }
}
