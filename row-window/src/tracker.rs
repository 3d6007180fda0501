use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::ViewportInput;

/// Default throttle interval, roughly one frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Default delay after the last scroll event before `is_scrolling` resets.
pub const DEFAULT_IS_SCROLLING_RESET_DELAY_MS: u64 = 150;

/// A host registration (scroll listener, resize observer, ...) that is released when dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release (hosts that cannot observe one of the streams).
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Implemented by the host viewport (DOM element, terminal pane, GUI scroll area).
///
/// Each method registers a callback that forwards host events into `sink` and returns the
/// [`Subscription`] that undoes the registration.
pub trait ViewportObserver {
    fn observe_scroll(&mut self, sink: ViewportEventSink) -> Subscription;
    fn observe_resize(&mut self, sink: ViewportEventSink) -> Subscription;
}

/// Both host subscriptions, acquired together and released together.
#[derive(Debug)]
struct Observation {
    scroll: Subscription,
    resize: Subscription,
}

impl Observation {
    fn release(self) {
        let Self { scroll, resize } = self;
        // Reverse acquisition order.
        resize.release();
        scroll.release();
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Pending {
    input: ViewportInput,
    events: u32,
    closed: bool,
}

/// Cloneable handle the host uses to report viewport events.
///
/// Events only overwrite the pending values (latest wins); nothing is recomputed until the owning
/// tracker releases them. Once the tracker detaches, the sink is closed and drops every event.
#[derive(Clone, Debug)]
pub struct ViewportEventSink {
    shared: Rc<Cell<Pending>>,
}

impl ViewportEventSink {
    /// Reports a scroll position. Negative offsets (elastic overscroll) are treated as 0.
    ///
    /// Returns `false` when the sink is closed.
    pub fn scroll(&self, offset: i64) -> bool {
        self.update(|p| p.input.scroll_offset = Some(normalize_offset(offset)))
    }

    /// Reports a container size in the scroll axis.
    ///
    /// Returns `false` when the sink is closed.
    pub fn resize(&self, size: u32) -> bool {
        self.update(|p| p.input.viewport_size = Some(size))
    }

    pub fn is_closed(&self) -> bool {
        self.shared.get().closed
    }

    fn update(&self, f: impl FnOnce(&mut Pending)) -> bool {
        let mut pending = self.shared.get();
        if pending.closed {
            vtrace!("ViewportEventSink: event after detach dropped");
            return false;
        }
        f(&mut pending);
        pending.events = pending.events.saturating_add(1);
        self.shared.set(pending);
        true
    }
}

fn normalize_offset(offset: i64) -> u64 {
    offset.max(0) as u64
}

/// Coalesces host scroll/resize events into at most one release per frame interval.
///
/// The host (or the [`crate::Virtualizer`]) calls [`ScrollTracker::poll`] from its frame loop.
/// A burst of events within one interval collapses into a single [`ViewportInput`] carrying the
/// most recent values, so the last event of a burst is never lost.
#[derive(Debug)]
pub struct ScrollTracker {
    shared: Rc<Cell<Pending>>,
    observation: Option<Observation>,
    frame_interval_ms: u64,
    last_release_ms: Option<u64>,

    is_scrolling: bool,
    is_scrolling_reset_delay_ms: u64,
    last_scroll_activity_ms: Option<u64>,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL_MS)
    }
}

impl ScrollTracker {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            shared: Rc::new(Cell::new(Pending::default())),
            observation: None,
            frame_interval_ms,
            last_release_ms: None,
            is_scrolling: false,
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
            last_scroll_activity_ms: None,
        }
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    pub fn set_frame_interval_ms(&mut self, frame_interval_ms: u64) {
        self.frame_interval_ms = frame_interval_ms;
    }

    pub fn set_is_scrolling_reset_delay_ms(&mut self, delay_ms: u64) {
        self.is_scrolling_reset_delay_ms = delay_ms;
    }

    pub fn sink(&self) -> ViewportEventSink {
        ViewportEventSink {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn record_scroll(&self, offset: i64) {
        self.sink().scroll(offset);
    }

    pub fn record_resize(&self, size: u32) {
        self.sink().resize(size);
    }

    pub fn has_pending(&self) -> bool {
        !self.shared.get().input.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.observation.is_some()
    }

    /// Registers scroll and resize observation on `host`, replacing any previous observation.
    pub fn attach(&mut self, host: &mut impl ViewportObserver) {
        self.detach();
        let scroll = host.observe_scroll(self.sink());
        let resize = host.observe_resize(self.sink());
        vdebug!("ScrollTracker::attach");
        self.observation = Some(Observation { scroll, resize });
    }

    /// Releases both host subscriptions and closes every sink handed out so far.
    ///
    /// Input already pending is kept; later events from old sinks are dropped.
    pub fn detach(&mut self) {
        let Some(observation) = self.observation.take() else {
            return;
        };
        observation.release();

        let mut old = self.shared.get();
        old.closed = true;
        self.shared.set(old);
        self.shared = Rc::new(Cell::new(Pending {
            closed: false,
            ..old
        }));
        vdebug!("ScrollTracker::detach");
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Releases pending input if at least one frame interval has passed since the last release.
    ///
    /// Also drives `is_scrolling`: pending scroll input counts as activity at `now_ms`, and the
    /// flag resets once `is_scrolling_reset_delay_ms` passes without any.
    pub fn poll(&mut self, now_ms: u64) -> Option<ViewportInput> {
        let pending = self.shared.get();
        self.update_scrolling(now_ms, pending.input.scroll_offset.is_some());
        if pending.input.is_empty() {
            return None;
        }
        if let Some(last) = self.last_release_ms {
            // A clock that went backwards releases immediately.
            if now_ms >= last && now_ms - last < self.frame_interval_ms {
                return None;
            }
        }
        self.last_release_ms = Some(now_ms);
        self.take()
    }

    /// Releases pending input immediately, ignoring the frame interval.
    ///
    /// Pending scroll input sets `is_scrolling`. With no clock at hand, the reset delay starts at
    /// the next `poll`.
    pub fn flush(&mut self) -> Option<ViewportInput> {
        if self.shared.get().input.scroll_offset.is_some() {
            self.is_scrolling = true;
            self.last_scroll_activity_ms = None;
        }
        self.take()
    }

    fn take(&mut self) -> Option<ViewportInput> {
        let pending = self.shared.get();
        if pending.input.is_empty() {
            return None;
        }
        vtrace!(
            events = pending.events,
            scroll_offset = ?pending.input.scroll_offset,
            viewport_size = ?pending.input.viewport_size,
            "ScrollTracker: release"
        );
        self.shared.set(Pending {
            closed: pending.closed,
            ..Pending::default()
        });
        Some(pending.input)
    }

    fn update_scrolling(&mut self, now_ms: u64, scrolled: bool) {
        if scrolled {
            self.is_scrolling = true;
            self.last_scroll_activity_ms = Some(now_ms);
            return;
        }
        if !self.is_scrolling {
            return;
        }
        let last = *self.last_scroll_activity_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(last) >= self.is_scrolling_reset_delay_ms {
            self.is_scrolling = false;
            self.last_scroll_activity_ms = None;
        }
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.detach();
        let mut pending = self.shared.get();
        pending.closed = true;
        self.shared.set(pending);
    }
}
