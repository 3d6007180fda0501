use alloc::sync::Arc;
use alloc::vec::Vec;

use row_window::{
    Align, ViewportEventSink, ViewportObserver, Virtualizer, VirtualizerOptions, VisibleWindow,
};

use crate::key::KeyMap;
use crate::{RenderedRow, RowKey, RowModel};

/// What [`TableController::sync`] had to do to catch up with the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    /// Rows were appended or removed at the end, or size hints changed.
    Updated,
    /// At least one surviving index now holds a different row. Measurements were reset and
    /// replayed by key.
    Reordered,
}

type Hints = Arc<Vec<Option<u32>>>;

/// A framework-neutral controller that binds a [`RowModel`] to a [`Virtualizer`].
///
/// The core engine keys measurements by index. This controller also remembers each measured size
/// by row key, so sorting or filtering the table moves sizes along with their rows instead of
/// attributing them to whatever row lands on the old index.
///
/// Adapters drive it by calling:
/// - `sync(&model)` whenever the row set or its order may have changed
/// - `on_resize` / `on_scroll` when UI events occur (or `attach` a [`ViewportObserver`])
/// - `tick(now_ms)` each frame, then `rendered_rows` to draw
/// - `report_measured` once a row is laid out
#[derive(Debug)]
pub struct TableController<K> {
    v: Virtualizer,
    keys: Vec<K>,
    index_of: KeyMap<K, usize>,
    sizes_by_key: KeyMap<K, u32>,
    hints: Option<Hints>,
}

impl<K: RowKey> TableController<K> {
    /// Creates a controller for `model` with `default_size` as the estimate for unmeasured rows.
    pub fn new<M: RowModel<Key = K> + ?Sized>(model: &M, default_size: u32) -> Self {
        Self::with_options(
            model,
            VirtualizerOptions::new(model.row_count(), default_size),
        )
    }

    /// Creates a controller from explicit options. `options.count` is replaced by the model's
    /// row count; hints from the model take precedence over `options.size_hint`.
    pub fn with_options<M: RowModel<Key = K> + ?Sized>(
        model: &M,
        options: VirtualizerOptions,
    ) -> Self {
        let mut c = Self {
            v: Virtualizer::new(options),
            keys: Vec::new(),
            index_of: KeyMap::default(),
            sizes_by_key: KeyMap::default(),
            hints: None,
        };
        c.sync(model);
        c
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> Virtualizer {
        self.v
    }

    /// Brings the engine in line with `model`: row count, size hints and row order.
    pub fn sync<M: RowModel<Key = K> + ?Sized>(&mut self, model: &M) -> SyncOutcome {
        let count = model.row_count();
        let keys: Vec<K> = (0..count).map(|i| model.row_key(i)).collect();
        let hints = collect_hints(model, count);

        let shared = self.keys.len().min(count);
        let reordered = self.keys[..shared] != keys[..shared];
        let hints_changed = hints.as_deref() != self.hints.as_deref();
        let count_changed = count != self.v.count() || count != self.keys.len();
        if !reordered && !hints_changed && !count_changed {
            return SyncOutcome::Unchanged;
        }

        adebug!(
            count,
            previous = self.keys.len(),
            reordered,
            hints_changed,
            "TableController::sync"
        );

        let sizes = &self.sizes_by_key;
        self.v.batch_update(|v| {
            if count != v.count() {
                v.set_count(count);
            }
            if hints_changed {
                v.set_size_hint(
                    hints
                        .clone()
                        .map(|h| move |i: usize| h.get(i).copied().flatten()),
                );
            }
            if reordered {
                v.reset_measurements();
                v.report_measured_many(
                    keys.iter()
                        .enumerate()
                        .filter_map(|(i, k)| sizes.get(k).map(|&s| (i, s))),
                );
            }
        });

        let mut index_of = KeyMap::default();
        let mut kept = KeyMap::default();
        for (i, k) in keys.iter().enumerate() {
            index_of.insert(k.clone(), i);
            if let Some(&s) = self.sizes_by_key.get(k) {
                kept.insert(k.clone(), s);
            }
        }
        self.index_of = index_of;
        self.sizes_by_key = kept;
        self.keys = keys;
        self.hints = hints;

        if reordered {
            SyncOutcome::Reordered
        } else {
            SyncOutcome::Updated
        }
    }

    /// Records the laid-out size of the row at `index` (as of the last `sync`).
    ///
    /// Returns `true` when the window reflowed.
    pub fn report_measured(&mut self, index: usize, size: u32) -> bool {
        let Some(key) = self.keys.get(index) else {
            atrace!(index, "report_measured: index past last sync dropped");
            return false;
        };
        if size > 0 {
            self.sizes_by_key.insert(key.clone(), size);
        }
        self.v.report_measured(index, size)
    }

    /// Fills `out` with the renderable rows of the current window.
    ///
    /// Rows the model reports as not renderable keep their slot (later rows do not shift up) but
    /// are not emitted.
    pub fn rendered_rows<M: RowModel<Key = K> + ?Sized>(
        &self,
        model: &M,
        out: &mut Vec<RenderedRow<K>>,
    ) {
        out.clear();
        for item in &self.v.visible_window().items {
            if !model.is_renderable(item.index) {
                continue;
            }
            let Some(key) = self.keys.get(item.index) else {
                continue;
            };
            out.push(RenderedRow {
                index: item.index,
                key: key.clone(),
                start: item.start,
                size: item.size,
            });
        }
    }

    pub fn visible_window(&self) -> &VisibleWindow {
        self.v.visible_window()
    }

    pub fn total_extent(&self) -> u64 {
        self.v.total_extent()
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index_of.get(key).copied()
    }

    /// Last measured size of the row identified by `key`, if any.
    pub fn measured_size(&self, key: &K) -> Option<u32> {
        self.sizes_by_key.get(key).copied()
    }

    pub fn on_scroll(&mut self, offset: i64) {
        self.v.notify_scroll(offset);
    }

    pub fn on_resize(&mut self, size: u32) {
        self.v.notify_resize(size);
    }

    pub fn event_sink(&self) -> ViewportEventSink {
        self.v.event_sink()
    }

    pub fn attach(&mut self, host: &mut impl ViewportObserver) {
        self.v.attach(host);
    }

    pub fn detach(&mut self) {
        self.v.detach();
    }

    /// Frame hook; see [`Virtualizer::tick`].
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.v.tick(now_ms)
    }

    pub fn flush(&mut self) -> bool {
        self.v.flush()
    }

    /// Scrolls to the row at `index` and returns the offset the host should apply.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        self.v.scroll_to_index(index, align)
    }

    /// Scrolls to the row identified by `key`, wherever the current order placed it.
    pub fn scroll_to_row(&mut self, key: &K, align: Align) -> Option<u64> {
        let index = self.index_of(key)?;
        Some(self.v.scroll_to_index(index, align))
    }
}

fn collect_hints<M: RowModel + ?Sized>(model: &M, count: usize) -> Option<Hints> {
    let hints: Vec<Option<u32>> = (0..count)
        .map(|i| model.size_hint(i).filter(|&s| s > 0))
        .collect();
    hints.iter().any(Option::is_some).then(|| Arc::new(hints))
}
