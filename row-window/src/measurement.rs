#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
type SizeMap = HashMap<usize, u32>;
#[cfg(not(feature = "std"))]
type SizeMap = BTreeMap<usize, u32>;

/// Outcome of [`MeasurementStore::commit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    /// Zero size or out-of-range index; nothing was recorded.
    Ignored,
    /// The stored size already had this value.
    Unchanged,
    /// First measurement for the index.
    Inserted,
    Updated {
        previous: u32,
    },
}

impl Commit {
    pub fn is_change(self) -> bool {
        matches!(self, Self::Inserted | Self::Updated { .. })
    }
}

/// Last observed rendered size per item index.
///
/// Entries are keyed by index, not item identity. If the dataset is reordered without a count
/// change, call [`MeasurementStore::clear`] (or `Virtualizer::reset_measurements`) or stale sizes
/// will be attributed to whatever row now sits at that index.
///
/// A running sum and count of the stored sizes are kept so extent estimation never scans the map.
#[derive(Clone, Debug, Default)]
pub struct MeasurementStore {
    sizes: SizeMap,
    measured_sum: u64,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.sizes.get(&index).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.sizes.contains_key(&index)
    }

    /// Records `size` for `index`, overwriting any previous value.
    ///
    /// `size == 0` (a detached/unmounting element) and `index >= count` are dropped.
    pub fn commit(&mut self, index: usize, size: u32, count: usize) -> Commit {
        if size == 0 || index >= count {
            vtrace!(index, size, count, "MeasurementStore::commit ignored");
            return Commit::Ignored;
        }
        match self.sizes.insert(index, size) {
            None => {
                self.measured_sum = self.measured_sum.saturating_add(size as u64);
                Commit::Inserted
            }
            Some(previous) if previous == size => Commit::Unchanged,
            Some(previous) => {
                self.measured_sum = self
                    .measured_sum
                    .saturating_sub(previous as u64)
                    .saturating_add(size as u64);
                Commit::Updated { previous }
            }
        }
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
        self.measured_sum = 0;
    }

    /// Drops every entry at `index >= count`, calling `on_drop(index, size)` for each.
    pub fn truncate(&mut self, count: usize, mut on_drop: impl FnMut(usize, u32)) {
        let mut dropped = 0u64;
        self.sizes.retain(|&index, &mut size| {
            if index < count {
                return true;
            }
            dropped = dropped.saturating_add(size as u64);
            on_drop(index, size);
            false
        });
        self.measured_sum = self.measured_sum.saturating_sub(dropped);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of every stored size.
    pub fn measured_sum(&self) -> u64 {
        self.measured_sum
    }

    /// Iterates over `(index, size)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.sizes.iter().map(|(&index, &size)| (index, size))
    }
}
