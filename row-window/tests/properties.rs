//! Property-based invariants for the row window.
//!
//! 1. The window is contiguous and items tile without gaps.
//! 2. Every index in the window is in `0..count`.
//! 3. Scrolling to (or past) the end always includes the last row.
//! 4. The total extent equals the sum of best-known sizes.
//! 5. Reporting the same measurement twice changes nothing.
//! 6. A burst of scroll events applies only the last offset (clamped to the end).

use proptest::prelude::*;
use row_window::{Virtualizer, VirtualizerOptions, VisibleWindow};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Setup {
    count: usize,
    default_size: u32,
    overscan: usize,
    measurements: Vec<(usize, u32)>,
}

fn setup_strategy() -> impl Strategy<Value = Setup> {
    (0usize..300, 1u32..64, 0usize..12).prop_flat_map(|(count, default_size, overscan)| {
        let index = 0..count.max(1);
        proptest::collection::vec((index, 1u32..200), 0..40).prop_map(move |measurements| Setup {
            count,
            default_size,
            overscan,
            measurements: if count == 0 { Vec::new() } else { measurements },
        })
    })
}

fn build(setup: &Setup) -> (Virtualizer, Vec<u32>) {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(setup.count, setup.default_size).with_overscan(setup.overscan),
    );
    let mut sizes = vec![setup.default_size; setup.count];
    for &(index, size) in &setup.measurements {
        v.report_measured(index, size);
        sizes[index] = size;
    }
    (v, sizes)
}

fn settle(v: &mut Virtualizer, viewport: u32, offset: i64) -> VisibleWindow {
    v.notify_resize(viewport);
    v.notify_scroll(offset);
    v.flush();
    v.visible_window().clone()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Contiguous, tiled, in bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_is_contiguous_and_in_bounds(
        setup in setup_strategy(),
        viewport in 0u32..2_000,
        offset in -500i64..100_000,
    ) {
        let (mut v, _) = build(&setup);
        let w = settle(&mut v, viewport, offset);

        if setup.count == 0 {
            prop_assert!(w.items.is_empty());
            prop_assert_eq!(w.range, None);
            return Ok(());
        }

        let range = w.range.expect("non-empty dataset has a range");
        prop_assert!(range.start_index <= range.end_index);
        prop_assert!(range.end_index < setup.count);
        prop_assert_eq!(w.items.len(), range.item_count());
        prop_assert_eq!(w.items[0].index, range.start_index);
        for pair in w.items.windows(2) {
            prop_assert_eq!(pair[1].index, pair[0].index + 1);
            prop_assert_eq!(pair[1].start, pair[0].end());
        }
        for item in &w.items {
            prop_assert_eq!(v.item_start(item.index), Some(item.start));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. End of list is reachable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrolling_to_end_reaches_last_row(
        setup in setup_strategy(),
        viewport in 1u32..2_000,
        past_end in 0u64..10_000,
    ) {
        prop_assume!(setup.count > 0);
        let (mut v, _) = build(&setup);
        let offset = v.total_extent().saturating_sub(viewport as u64) + past_end;
        let w = settle(&mut v, viewport, offset as i64);
        prop_assert_eq!(w.end_index(), Some(setup.count - 1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Extent is the sum of best-known sizes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn total_extent_sums_best_known_sizes(setup in setup_strategy()) {
        let (v, sizes) = build(&setup);
        let expected: u64 = sizes.iter().map(|&s| s as u64).sum();
        prop_assert_eq!(v.total_extent(), expected);
        prop_assert_eq!(v.visible_window().total_extent, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Measurements are idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_measurement_changes_nothing(
        setup in setup_strategy(),
        viewport in 0u32..1_000,
        offset in 0i64..20_000,
    ) {
        let (mut v, _) = build(&setup);
        let before = settle(&mut v, viewport, offset);
        let recomputes = v.recompute_count();

        for &(index, _) in &setup.measurements {
            let current = v.item_size(index).expect("measured index is in range");
            prop_assert!(!v.report_measured(index, current));
        }
        prop_assert_eq!(v.visible_window(), &before);
        prop_assert_eq!(v.recompute_count(), recomputes);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Bursts coalesce to the last offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_burst_applies_last_offset(
        setup in setup_strategy(),
        offsets in proptest::collection::vec(0i64..50_000, 1..64),
    ) {
        let (mut v, _) = build(&setup);
        settle(&mut v, 300, 0);
        let recomputes = v.recompute_count();

        for &offset in &offsets {
            v.notify_scroll(offset);
        }
        v.tick(1_000);

        let last = *offsets.last().expect("at least one offset");
        prop_assert_eq!(v.scroll_offset(), v.clamp_scroll_offset(last as u64));
        prop_assert!(v.recompute_count() <= recomputes + 1);
    }
}
