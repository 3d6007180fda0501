use alloc::sync::Arc;

use crate::tracker::{DEFAULT_FRAME_INTERVAL_MS, DEFAULT_IS_SCROLLING_RESET_DELAY_MS};

/// Per-row size hint supplied by the table collaborator. `None` (or `Some(0)`) means "use
/// `default_size`".
pub type SizeHint = Arc<dyn Fn(usize) -> Option<u32> + Send + Sync>;

/// Default overscan: rows rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 10;

/// Configuration for [`crate::Virtualizer`].
///
/// Cheap to clone: the size hint lives in an `Arc`, so adapters can tweak a field and call
/// `Virtualizer::set_options` without reallocating closures.
pub struct VirtualizerOptions {
    pub count: usize,
    /// Estimated size of any row without a measurement or hint. Normalized to at least 1.
    pub default_size: u32,
    pub overscan: usize,
    pub size_hint: Option<SizeHint>,

    /// Minimum time between two recomputations driven by viewport events.
    pub frame_interval_ms: u64,
    /// How long after the last scroll event `is_scrolling` stays set.
    pub is_scrolling_reset_delay_ms: u64,

    pub initial_offset: u64,
    /// Viewport size before the host reports one.
    pub initial_viewport: u32,
}

impl Clone for VirtualizerOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            default_size: self.default_size,
            overscan: self.overscan,
            size_hint: self.size_hint.clone(),
            frame_interval_ms: self.frame_interval_ms,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            initial_offset: self.initial_offset,
            initial_viewport: self.initial_viewport,
        }
    }
}

impl VirtualizerOptions {
    /// Creates options for `count` rows estimated at `default_size` each.
    pub fn new(count: usize, default_size: u32) -> Self {
        Self {
            count,
            default_size: default_size.max(1),
            overscan: DEFAULT_OVERSCAN,
            size_hint: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
            initial_offset: 0,
            initial_viewport: 0,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_size_hint(
        mut self,
        size_hint: Option<impl Fn(usize) -> Option<u32> + Send + Sync + 'static>,
    ) -> Self {
        self.size_hint = size_hint.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_frame_interval_ms(mut self, frame_interval_ms: u64) -> Self {
        self.frame_interval_ms = frame_interval_ms;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_viewport(mut self, initial_viewport: u32) -> Self {
        self.initial_viewport = initial_viewport;
        self
    }

    /// Estimate for `index`: its hint when positive, otherwise `default_size`.
    pub fn estimate_for(&self, index: usize) -> u32 {
        let default_size = self.default_size.max(1);
        match &self.size_hint {
            Some(hint) => hint(index).filter(|&s| s > 0).unwrap_or(default_size),
            None => default_size,
        }
    }

    pub(crate) fn estimates_match(&self, other: &Self) -> bool {
        self.default_size.max(1) == other.default_size.max(1)
            && match (&self.size_hint, &other.size_hint) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl core::fmt::Debug for VirtualizerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("count", &self.count)
            .field("default_size", &self.default_size)
            .field("overscan", &self.overscan)
            .field("size_hint", &self.size_hint.is_some())
            .field("frame_interval_ms", &self.frame_interval_ms)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .field("initial_offset", &self.initial_offset)
            .field("initial_viewport", &self.initial_viewport)
            .finish()
    }
}
