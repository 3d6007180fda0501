use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::cmp;
use core::fmt;

use crate::extent::ExtentEstimator;
use crate::measurement::{Commit, MeasurementStore};
use crate::options::SizeHint;
use crate::range::{
    FnSizes, ItemSizes, RangeRequest, UniformSizes, collect_items, compute_range,
};
use crate::table::SizeTable;
use crate::tracker::{ScrollTracker, ViewportEventSink, ViewportObserver};
use crate::{
    Align, ScrollDirection, ViewportInput, VirtualItem, VirtualizerOptions, VisibleWindow,
    WindowRange,
};

type Subscriber = Box<dyn FnMut(&VisibleWindow)>;
type MeasureQueue = RefCell<Vec<(usize, u32)>>;

/// Identifies a subscriber registered with [`Virtualizer::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Cloneable handle the rendering layer uses to report measured row sizes.
///
/// Reports are queued and committed at the next [`Virtualizer::tick`]/[`Virtualizer::flush`],
/// before that frame's range computation.
#[derive(Clone, Debug)]
pub struct MeasureHandle {
    queue: Weak<MeasureQueue>,
}

impl MeasureHandle {
    /// Queues a measurement. Returns `false` once the virtualizer is gone.
    pub fn report(&self, index: usize, size: u32) -> bool {
        let Some(queue) = self.queue.upgrade() else {
            return false;
        };
        queue.borrow_mut().push((index, size));
        true
    }
}

/// A headless row windowing engine.
///
/// UI-agnostic: it holds no UI objects. The host feeds it scroll offsets, viewport sizes and row
/// measurements; it answers with the [`VisibleWindow`] to render.
///
/// Until rows are measured (and while no size hints are configured) every row is assumed to be
/// `default_size` and positions are computed by division. The first measurement that deviates
/// switches to a prefix-sum table so offsets always reflect the best-known sizes.
pub struct Virtualizer {
    options: VirtualizerOptions,
    scroll_offset: u64,
    viewport_size: u32,
    scroll_direction: Option<ScrollDirection>,

    store: MeasurementStore,
    extent: ExtentEstimator,
    table: Option<SizeTable>,

    tracker: ScrollTracker,
    measure_queue: Rc<MeasureQueue>,

    window: VisibleWindow,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,

    batch_depth: usize,
    recompute_pending: bool,
    recompute_count: u64,
}

impl Virtualizer {
    /// Creates a virtualizer and computes its first window from the initial offset/viewport.
    pub fn new(mut options: VirtualizerOptions) -> Self {
        options.default_size = options.default_size.max(1);
        vdebug!(
            count = options.count,
            default_size = options.default_size,
            overscan = options.overscan,
            "Virtualizer::new"
        );
        let tracker = ScrollTracker::new(options.frame_interval_ms)
            .with_is_scrolling_reset_delay_ms(options.is_scrolling_reset_delay_ms);
        let mut v = Self {
            scroll_offset: options.initial_offset,
            viewport_size: options.initial_viewport,
            scroll_direction: None,
            store: MeasurementStore::new(),
            extent: ExtentEstimator::default(),
            table: None,
            tracker,
            measure_queue: Rc::new(RefCell::new(Vec::new())),
            window: VisibleWindow::default(),
            subscribers: Vec::new(),
            next_subscriber: 0,
            batch_depth: 0,
            recompute_pending: false,
            recompute_count: 0,
            options,
        };
        v.rebuild_estimates();
        v.scroll_offset = v.clamp_scroll_offset(v.scroll_offset);
        v.recompute();
        v
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    /// Replaces the row count, default size and overscan, then recomputes.
    pub fn configure(&mut self, count: usize, default_size: u32, overscan: usize) {
        self.update_options(|o| {
            o.count = count;
            o.default_size = default_size;
            o.overscan = overscan;
        });
    }

    pub fn set_options(&mut self, mut options: VirtualizerOptions) {
        options.default_size = options.default_size.max(1);
        let prev_count = self.options.count;
        let estimates_unchanged = self.options.estimates_match(&options);
        self.options = options;
        vtrace!(
            count = self.options.count,
            default_size = self.options.default_size,
            overscan = self.options.overscan,
            "Virtualizer::set_options"
        );

        self.tracker.set_frame_interval_ms(self.options.frame_interval_ms);
        self.tracker
            .set_is_scrolling_reset_delay_ms(self.options.is_scrolling_reset_delay_ms);

        if self.options.count != prev_count {
            let count = self.options.count;
            self.store.truncate(count, |_index, _size| {
                vtrace!(index = _index, size = _size, "dropping measurement past count");
            });
        }
        if self.options.count != prev_count || !estimates_unchanged {
            self.rebuild_estimates();
        }
        self.recompute();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualizerOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.update_options(|o| o.count = count);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.recompute();
    }

    pub fn set_size_hint(
        &mut self,
        size_hint: Option<impl Fn(usize) -> Option<u32> + Send + Sync + 'static>,
    ) {
        let size_hint: Option<SizeHint> = size_hint.map(|f| alloc::sync::Arc::new(f) as _);
        self.update_options(|o| o.size_hint = size_hint);
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn is_scrolling(&self) -> bool {
        self.tracker.is_scrolling()
    }

    /// Number of range recomputations performed so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Queues a host scroll offset. Applied by the next [`Self::tick`] or [`Self::flush`].
    pub fn notify_scroll(&mut self, offset: i64) {
        self.tracker.record_scroll(offset);
    }

    /// Queues a host container size. Applied by the next [`Self::tick`] or [`Self::flush`].
    pub fn notify_resize(&mut self, size: u32) {
        self.tracker.record_resize(size);
    }

    /// A sink the host can feed from its own callbacks instead of calling `notify_*`.
    pub fn event_sink(&self) -> ViewportEventSink {
        self.tracker.sink()
    }

    /// Starts observing scroll and resize events on `host`.
    pub fn attach(&mut self, host: &mut impl ViewportObserver) {
        self.tracker.attach(host);
    }

    /// Stops observing the host. Dropping the virtualizer does this as well.
    pub fn detach(&mut self) {
        self.tracker.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.tracker.is_attached()
    }

    pub fn measure_handle(&self) -> MeasureHandle {
        MeasureHandle {
            queue: Rc::downgrade(&self.measure_queue),
        }
    }

    /// Frame hook: commits queued measurements, applies throttled viewport input and recomputes
    /// at most once.
    ///
    /// Returns `true` when a recomputation happened.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let input = self.tracker.poll(now_ms);
        self.apply_frame(input)
    }

    /// Same as [`Self::tick`] but releases pending viewport input regardless of the frame interval.
    pub fn flush(&mut self) -> bool {
        let input = self.tracker.flush();
        self.apply_frame(input)
    }

    fn apply_frame(&mut self, input: Option<ViewportInput>) -> bool {
        let before = self.recompute_count;
        self.batch_update(|v| {
            v.drain_measure_queue();
            if let Some(input) = input {
                v.apply_viewport_input(input);
            }
        });
        self.recompute_count != before
    }

    fn drain_measure_queue(&mut self) {
        let queued = core::mem::take(&mut *self.measure_queue.borrow_mut());
        if !queued.is_empty() {
            self.report_measured_many(queued);
        }
    }

    fn apply_viewport_input(&mut self, input: ViewportInput) {
        let mut changed = false;
        if let Some(size) = input.viewport_size {
            if size != self.viewport_size {
                self.viewport_size = size;
                changed = true;
            }
        }
        if let Some(offset) = input.scroll_offset {
            changed |= self.set_scroll_offset_inner(offset);
        }
        if changed {
            self.recompute();
        }
    }

    /// Stores `offset` clamped to `max_scroll_offset()`, so overscroll past the end never reads
    /// as forward movement.
    fn set_scroll_offset_inner(&mut self, offset: u64) -> bool {
        let offset = self.clamp_scroll_offset(offset);
        if self.scroll_offset == offset {
            return false;
        }
        self.scroll_direction = match offset.cmp(&self.scroll_offset) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.scroll_offset = offset;
        true
    }

    /// Records the real size of a rendered row.
    ///
    /// Zero sizes and indexes at or past `count` are dropped. When the size differs from what was
    /// assumed for `index`, the window is recomputed so every offset after `index` moves (a
    /// reflow); reporting the same size again changes nothing.
    ///
    /// Returns `true` when a reflow happened.
    pub fn report_measured(&mut self, index: usize, size: u32) -> bool {
        if self.commit_measurement(index, size) {
            self.recompute();
            return true;
        }
        false
    }

    /// Commits several measurements with a single recomputation.
    ///
    /// Returns `true` when any of them changed a size.
    pub fn report_measured_many(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, u32)>,
    ) -> bool {
        let mut reflow = false;
        for (index, size) in measurements {
            reflow |= self.commit_measurement(index, size);
        }
        if reflow {
            self.recompute();
        }
        reflow
    }

    fn commit_measurement(&mut self, index: usize, size: u32) -> bool {
        let count = self.options.count;
        let assumed = self.assumed_size(index);
        let commit = self.store.commit(index, size, count);
        match commit {
            Commit::Ignored => {
                vwarn!(index, size, count, "report_measured: dropped");
                return false;
            }
            Commit::Unchanged => return false,
            Commit::Inserted | Commit::Updated { .. } => {}
        }
        vtrace!(index, size, assumed, "report_measured");
        let estimate = self.options.estimate_for(index);
        self.extent.record(commit, estimate);
        match self.table.as_mut() {
            Some(table) => {
                table.set(index, size);
            }
            // First stored size: leave the uniform path even if this one matches the estimate.
            None => self.ensure_table(),
        }
        size != assumed
    }

    /// Size currently assumed for `index`: its measurement, else its estimate.
    fn assumed_size(&self, index: usize) -> u32 {
        self.store
            .get(index)
            .unwrap_or_else(|| self.options.estimate_for(index))
    }

    /// Forgets every measurement (e.g. after a full dataset reset or a reorder).
    pub fn reset_measurements(&mut self) {
        vdebug!(cached = self.store.len(), "reset_measurements");
        self.store.clear();
        self.rebuild_estimates();
        self.recompute();
    }

    pub fn measurements(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.store.contains(index)
    }

    pub fn total_extent(&self) -> u64 {
        self.extent.total(&self.store)
    }

    /// The current authoritative output.
    pub fn visible_window(&self) -> &VisibleWindow {
        &self.window
    }

    pub fn visible_range(&self) -> Option<WindowRange> {
        self.window.range
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        (index < self.options.count).then(|| self.with_sizes(|s| s.start_of(index)))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        (index < self.options.count).then(|| self.assumed_size(index))
    }

    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        Some(VirtualItem {
            index,
            start: self.item_start(index)?,
            size: self.item_size(index)?,
        })
    }

    /// Index of the row covering `offset`, clamped to the last row.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let count = self.options.count;
        if count == 0 {
            return None;
        }
        Some(self.with_sizes(|s| s.index_at(offset)).min(count - 1))
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_extent().saturating_sub(self.viewport_size as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Scroll offset that brings `index` into view with the given alignment (clamped).
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.options.count;
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let Some(item) = self.item(index) else {
            return 0;
        };
        let view = self.viewport_size as u64;
        let target = match align {
            Align::Start => item.start,
            Align::End => item.end().saturating_sub(view),
            Align::Center => item
                .start
                .saturating_add(item.size as u64 / 2)
                .saturating_sub(view / 2),
            Align::Auto => {
                let cur = self.clamp_scroll_offset(self.scroll_offset);
                let cur_end = cur.saturating_add(view);
                if item.start >= cur && item.end() <= cur_end {
                    cur
                } else if item.start < cur {
                    item.start
                } else {
                    item.end().saturating_sub(view)
                }
            }
        };
        self.clamp_scroll_offset(target)
    }

    /// Programmatically scrolls to `index` and recomputes immediately.
    ///
    /// Returns the applied offset; the host is expected to move its scroll element there.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        if self.set_scroll_offset_inner(offset) {
            self.recompute();
        }
        offset
    }

    /// Registers `f` to receive the window whenever its range or total extent changes.
    pub fn subscribe(&mut self, f: impl FnMut(&VisibleWindow) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber = self.next_subscriber.saturating_add(1);
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Runs `f` and performs at most one recomputation (and notification) afterwards.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);
        f(self);
        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && core::mem::take(&mut self.recompute_pending) {
            self.recompute();
        }
    }

    fn rebuild_estimates(&mut self) {
        vdebug!(
            count = self.options.count,
            measured = self.store.len(),
            "rebuild_estimates"
        );
        self.table = None;
        self.extent = if self.options.size_hint.is_none() {
            // Uniform estimates: each measurement displaces exactly `default_size`.
            let default_size = self.options.default_size;
            let mut extent = ExtentEstimator::uniform(self.options.count, default_size);
            for _ in 0..self.store.len() {
                extent.record(Commit::Inserted, default_size);
            }
            extent
        } else {
            let options = &self.options;
            ExtentEstimator::rebuild(options.count, &self.store, |i| options.estimate_for(i))
        };
        self.ensure_table();
    }

    fn is_uniform(&self) -> bool {
        self.store.is_empty() && self.options.size_hint.is_none()
    }

    fn ensure_table(&mut self) {
        if self.table.is_some() || self.is_uniform() {
            return;
        }
        vdebug!(count = self.options.count, "building size table");
        let store = &self.store;
        let options = &self.options;
        self.table = Some(SizeTable::build(options.count, |i| {
            store.get(i).unwrap_or_else(|| options.estimate_for(i))
        }));
    }

    fn with_sizes<R>(&self, f: impl FnOnce(&dyn ItemSizes) -> R) -> R {
        if self.is_uniform() {
            return f(&UniformSizes::new(
                self.options.count,
                self.options.default_size,
            ));
        }
        debug_assert!(self.table.is_some(), "size table missing for non-uniform sizes");
        match &self.table {
            Some(table) => f(table),
            None => f(&FnSizes::new(self.options.count, |i| self.assumed_size(i))),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_size_table(&self) -> bool {
        self.table.is_some()
    }

    fn recompute(&mut self) {
        if self.batch_depth > 0 {
            self.recompute_pending = true;
            return;
        }
        self.ensure_table();

        let request = RangeRequest {
            scroll_offset: self.scroll_offset,
            viewport_size: self.viewport_size,
            overscan: self.options.overscan,
        };
        let mut items = core::mem::take(&mut self.window.items);
        items.clear();
        let range = self.with_sizes(|sizes| {
            let range = compute_range(request, sizes);
            if let Some(range) = range {
                collect_items(range, sizes, &mut items);
            }
            range
        });
        let total_extent = self.total_extent();
        debug_assert_eq!(
            total_extent,
            self.with_sizes(|s| s.total()),
            "extent estimate diverged from item sizes"
        );

        let next = VisibleWindow {
            range,
            items,
            total_extent,
        };
        let changed = !self.window.same_shape(&next);
        self.window = next;
        self.recompute_count = self.recompute_count.saturating_add(1);
        vtrace!(
            scroll_offset = self.scroll_offset,
            viewport_size = self.viewport_size,
            range = ?range,
            total_extent,
            "recompute"
        );

        if changed {
            let window = &self.window;
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber(window);
            }
        }
    }
}

impl fmt::Debug for Virtualizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Virtualizer")
            .field("options", &self.options)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_size", &self.viewport_size)
            .field("measured", &self.store.len())
            .field("window", &self.window)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
