use crate::measurement::{Commit, MeasurementStore};

/// Total scrollable extent for uniform estimates: every measured size plus `default_size` for each
/// item that has not been measured yet.
///
/// This is the scrollbar/track-length signal only. It is exact once every item has been measured;
/// before that it must not be used to position items past the measured prefix.
pub fn estimate_extent(count: usize, store: &MeasurementStore, default_size: u32) -> u64 {
    let unmeasured = count.saturating_sub(store.len()) as u64;
    store
        .measured_sum()
        .saturating_add(unmeasured.saturating_mul(default_size as u64))
}

/// Running total-extent estimate.
///
/// Keeps the sum of the estimates of all items and the part of that sum displaced by
/// measurements, so the total is `estimated - displaced + measured` in `O(1)` and every commit
/// updates it in `O(1)`. Unlike [`estimate_extent`] it also handles per-item size hints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtentEstimator {
    estimated: u64,
    displaced: u64,
}

impl ExtentEstimator {
    pub fn uniform(count: usize, default_size: u32) -> Self {
        Self {
            estimated: (count as u64).saturating_mul(default_size as u64),
            displaced: 0,
        }
    }

    /// Builds the estimator for `count` items whose estimates come from `estimate(i)`, with
    /// `store` already holding the surviving measurements.
    pub fn rebuild(
        count: usize,
        store: &MeasurementStore,
        estimate: impl Fn(usize) -> u32,
    ) -> Self {
        let mut estimated = 0u64;
        for i in 0..count {
            estimated = estimated.saturating_add(estimate(i) as u64);
        }
        let mut displaced = 0u64;
        for (index, _) in store.iter() {
            if index < count {
                displaced = displaced.saturating_add(estimate(index) as u64);
            }
        }
        Self {
            estimated,
            displaced,
        }
    }

    /// Accounts for a commit of an item whose estimate is `estimate`.
    ///
    /// Only the first measurement of an index displaces its estimate; later updates are already
    /// reflected in the store's running sum.
    pub fn record(&mut self, commit: Commit, estimate: u32) {
        if commit == Commit::Inserted {
            self.displaced = self.displaced.saturating_add(estimate as u64);
        }
    }

    pub fn total(&self, store: &MeasurementStore) -> u64 {
        self.estimated
            .saturating_sub(self.displaced)
            .saturating_add(store.measured_sum())
    }
}
