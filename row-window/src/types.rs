use alloc::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive index range `start_index..=end_index` (overscan already applied).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl WindowRange {
    /// Number of indices in the range (always at least 1).
    pub fn item_count(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Start offset in the scroll axis.
    pub start: u64,
    pub size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

/// The rendered output of a [`crate::Virtualizer`]: which rows to instantiate, where to place
/// them, and how long the scroll track is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleWindow {
    /// `None` when there is nothing to render (`count == 0`).
    pub range: Option<WindowRange>,
    /// One entry per index in `range`, ascending, each starting where the previous one ends.
    pub items: Vec<VirtualItem>,
    pub total_extent: u64,
}

impl VisibleWindow {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn start_index(&self) -> Option<usize> {
        self.range.map(|r| r.start_index)
    }

    pub fn end_index(&self) -> Option<usize> {
        self.range.map(|r| r.end_index)
    }

    /// Shallow comparison used to decide whether subscribers need to hear about a recompute.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.range == other.range && self.total_extent == other.total_extent
    }
}

/// Coalesced viewport input released by the [`crate::ScrollTracker`] for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportInput {
    /// Latest scroll offset seen since the last release, if any.
    pub scroll_offset: Option<u64>,
    /// Latest container size seen since the last release, if any.
    pub viewport_size: Option<u32>,
}

impl ViewportInput {
    pub fn is_empty(&self) -> bool {
        self.scroll_offset.is_none() && self.viewport_size.is_none()
    }
}
