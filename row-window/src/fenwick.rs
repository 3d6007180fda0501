use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over best-known item sizes.
///
/// Backs the measured-size path: `start_of(i)` is `prefix_sum(i)` and offset → index lookups are
/// a single `lower_bound` descent, both `O(log n)`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    top_bit: usize,
}

impl Fenwick {
    pub(crate) fn from_sizes(sizes: &[u32]) -> Self {
        let n = sizes.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for (i, &size) in sizes.iter().enumerate() {
            let node = i + 1;
            tree[node] = tree[node].saturating_add(size as u64);
            total = total.saturating_add(size as u64);
            let parent = node + lsb(node);
            if parent <= n {
                tree[parent] = tree[parent].saturating_add(tree[node]);
            }
        }
        Self {
            tree,
            total,
            top_bit: top_bit(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut node = index + 1;
        while node <= n {
            self.tree[node] = apply_delta(self.tree[node], delta);
            node += lsb(node);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut node = cmp::min(count, self.len());
        let mut sum = 0u64;
        while node > 0 {
            sum = sum.saturating_add(self.tree[node]);
            node &= node - 1;
        }
        sum
    }

    /// Number of leading values whose running sum stays `<= target`.
    ///
    /// With strictly positive values this is the index of the item covering `target`, or `len()`
    /// when `target` is at or past the end.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.top_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        debug_assert!(value >= delta.unsigned_abs(), "Fenwick underflow");
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    1usize << (usize::BITS - 1 - n.leading_zeros())
}
