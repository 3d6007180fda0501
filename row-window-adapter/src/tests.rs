use crate::*;

use alloc::vec::Vec;
use row_window::{Align, VirtualizerOptions};

#[derive(Clone, Debug, Default)]
struct Rows {
    keys: Vec<u64>,
    loading: Vec<u64>,
    tall: Vec<u64>,
}

impl Rows {
    fn range(n: u64) -> Self {
        Self {
            keys: (0..n).collect(),
            ..Self::default()
        }
    }
}

impl RowModel for Rows {
    type Key = u64;

    fn row_count(&self) -> usize {
        self.keys.len()
    }

    fn row_key(&self, index: usize) -> u64 {
        self.keys[index]
    }

    fn is_renderable(&self, index: usize) -> bool {
        !self.loading.contains(&self.keys[index])
    }

    fn size_hint(&self, index: usize) -> Option<u32> {
        self.tall.contains(&self.keys[index]).then_some(100)
    }
}

fn controller(rows: &Rows, viewport: u32) -> TableController<u64> {
    let mut c = TableController::with_options(rows, VirtualizerOptions::new(0, 10).with_overscan(0));
    c.on_resize(viewport);
    c.flush();
    c
}

#[test]
fn sync_reports_what_changed() {
    let mut rows = Rows::range(20);
    let mut c = controller(&rows, 50);
    assert_eq!(c.virtualizer().count(), 20);
    assert_eq!(c.sync(&rows), SyncOutcome::Unchanged);

    rows.keys.push(20);
    assert_eq!(c.sync(&rows), SyncOutcome::Updated);
    assert_eq!(c.total_extent(), 210);

    rows.keys.swap(0, 1);
    assert_eq!(c.sync(&rows), SyncOutcome::Reordered);
    assert_eq!(c.index_of(&0), Some(1));

    rows.tall.push(5);
    assert_eq!(c.sync(&rows), SyncOutcome::Updated);
    assert_eq!(c.total_extent(), 210 - 10 + 100);
}

#[test]
fn measurements_follow_rows_across_reorder() {
    let mut rows = Rows::range(100);
    let mut c = controller(&rows, 50);
    assert!(c.report_measured(0, 40));
    assert!(c.report_measured(3, 25));
    assert_eq!(c.total_extent(), 1000 + 30 + 15);

    rows.keys.reverse();
    assert_eq!(c.sync(&rows), SyncOutcome::Reordered);

    let v = c.virtualizer();
    assert_eq!(v.item_size(99), Some(40));
    assert_eq!(v.item_size(96), Some(25));
    assert_eq!(v.item_size(0), Some(10));
    assert_eq!(v.item_size(3), Some(10));
    assert_eq!(v.total_extent(), 1000 + 30 + 15);
    assert_eq!(c.measured_size(&0), Some(40));
}

#[test]
fn removed_rows_forget_their_size() {
    let mut rows = Rows::range(10);
    let mut c = controller(&rows, 50);
    c.report_measured(9, 70);

    rows.keys.pop();
    assert_eq!(c.sync(&rows), SyncOutcome::Updated);
    assert_eq!(c.measured_size(&9), None);
    assert_eq!(c.total_extent(), 90);

    rows.keys.push(9);
    c.sync(&rows);
    assert_eq!(c.virtualizer().item_size(9), Some(10));
}

#[test]
fn late_measurement_for_unknown_row_is_dropped() {
    let rows = Rows::range(5);
    let mut c = controller(&rows, 50);
    assert!(!c.report_measured(5, 30));
    assert!(!c.report_measured(2, 0));
    assert_eq!(c.measured_size(&2), None);
    assert_eq!(c.total_extent(), 50);
}

#[test]
fn loading_rows_keep_their_slot() {
    let mut rows = Rows::range(100);
    rows.loading = alloc::vec![1, 2];
    let c = controller(&rows, 50);

    let mut out = Vec::new();
    c.rendered_rows(&rows, &mut out);
    let keys: Vec<u64> = out.iter().map(|r| r.key).collect();
    assert_eq!(keys, [0, 3, 4, 5]);
    assert_eq!(out[1].start, 30);
    assert_eq!(out[1].end(), 40);
}

#[test]
fn model_hints_seed_estimates() {
    let mut rows = Rows::range(10);
    rows.tall = alloc::vec![0];
    let c = controller(&rows, 50);
    assert_eq!(c.total_extent(), 100 + 9 * 10);
    assert_eq!(c.visible_window().end_index(), Some(0));
}

#[test]
fn options_hint_survives_model_without_hints() {
    let rows = Rows::range(10);
    let opts = VirtualizerOptions::new(0, 10).with_size_hint(Some(|_: usize| Some(20)));
    let c = TableController::with_options(&rows, opts);
    assert_eq!(c.total_extent(), 200);
}

#[test]
fn scroll_to_row_uses_current_order() {
    let mut rows = Rows::range(100);
    let mut c = controller(&rows, 50);
    assert_eq!(c.scroll_to_row(&40, Align::Start), Some(400));

    rows.keys.reverse();
    c.sync(&rows);
    assert_eq!(c.scroll_to_row(&40, Align::Start), Some(590));
    assert_eq!(c.visible_window().start_index(), Some(59));
    assert_eq!(c.scroll_to_row(&1000, Align::Start), None);
}

#[test]
fn scroll_events_coalesce_per_frame() {
    let rows = Rows::range(1000);
    let mut c = controller(&rows, 50);
    let before = c.virtualizer().recompute_count();
    for offset in 0..100 {
        c.on_scroll(offset * 10);
    }
    assert!(c.tick(0));
    assert_eq!(c.virtualizer().recompute_count(), before + 1);

    let mut out = Vec::new();
    c.rendered_rows(&rows, &mut out);
    assert_eq!(out.first().map(|r| r.index), Some(99));
}
