use alloc::vec::Vec;

use crate::{VirtualItem, WindowRange};

/// Size lookup consumed by [`compute_range`].
///
/// Only `count` and `size_of` are required; the provided methods walk forward from index 0,
/// accumulating sizes. Implementations with structure to exploit override them: [`UniformSizes`]
/// answers in `O(1)` by division, the virtualizer's measured table in `O(log n)` via prefix sums.
///
/// Sizes are expected to be non-zero; a zero size is treated as 1.
pub trait ItemSizes {
    fn count(&self) -> usize;

    fn size_of(&self, index: usize) -> u32;

    /// Offset at which `index` starts (`index == count` yields the total).
    fn start_of(&self, index: usize) -> u64 {
        let end = index.min(self.count());
        let mut offset = 0u64;
        for i in 0..end {
            offset = offset.saturating_add(self.size_of(i).max(1) as u64);
        }
        offset
    }

    /// Index of the item covering `offset`, or `count` when `offset` is at or past the end.
    fn index_at(&self, offset: u64) -> usize {
        let count = self.count();
        let mut end = 0u64;
        for i in 0..count {
            end = end.saturating_add(self.size_of(i).max(1) as u64);
            if end > offset {
                return i;
            }
        }
        count
    }

    fn total(&self) -> u64 {
        self.start_of(self.count())
    }
}

impl<S: ItemSizes + ?Sized> ItemSizes for &S {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn size_of(&self, index: usize) -> u32 {
        (**self).size_of(index)
    }

    fn start_of(&self, index: usize) -> u64 {
        (**self).start_of(index)
    }

    fn index_at(&self, offset: u64) -> usize {
        (**self).index_at(offset)
    }

    fn total(&self) -> u64 {
        (**self).total()
    }
}

/// Every item shares one size: the fixed-size fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformSizes {
    count: usize,
    size: u32,
}

impl UniformSizes {
    pub fn new(count: usize, size: u32) -> Self {
        Self {
            count,
            size: size.max(1),
        }
    }
}

impl ItemSizes for UniformSizes {
    fn count(&self) -> usize {
        self.count
    }

    fn size_of(&self, _index: usize) -> u32 {
        self.size.max(1)
    }

    fn start_of(&self, index: usize) -> u64 {
        (index.min(self.count) as u64).saturating_mul(self.size_of(index) as u64)
    }

    fn index_at(&self, offset: u64) -> usize {
        let index = offset / self.size_of(0) as u64;
        if index >= self.count as u64 {
            self.count
        } else {
            index as usize
        }
    }

    fn total(&self) -> u64 {
        (self.count as u64).saturating_mul(self.size_of(0) as u64)
    }
}

/// Adapts an arbitrary `Fn(usize) -> u32` lookup; positions are found by walking.
#[derive(Clone, Copy)]
pub struct FnSizes<F> {
    count: usize,
    size_of: F,
}

impl<F: Fn(usize) -> u32> FnSizes<F> {
    pub fn new(count: usize, size_of: F) -> Self {
        Self { count, size_of }
    }
}

impl<F: Fn(usize) -> u32> ItemSizes for FnSizes<F> {
    fn count(&self) -> usize {
        self.count
    }

    fn size_of(&self, index: usize) -> u32 {
        (self.size_of)(index).max(1)
    }
}

impl<F> core::fmt::Debug for FnSizes<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnSizes")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeRequest {
    pub scroll_offset: u64,
    pub viewport_size: u32,
    pub overscan: usize,
}

/// Computes the index range to render for a scroll position.
///
/// The scroll offset is clamped to `[0, total - viewport]`. The range runs from the item covering
/// the scroll offset to the item covering `scroll_offset + viewport_size`, widened by `overscan`
/// on both sides and kept inside `[0, count - 1]`.
///
/// Returns `None` only when there are no items. A zero-sized viewport still yields one item so the
/// host never renders a blank view while it is being laid out.
pub fn compute_range<S: ItemSizes + ?Sized>(
    request: RangeRequest,
    sizes: &S,
) -> Option<WindowRange> {
    let count = sizes.count();
    if count == 0 {
        return None;
    }
    let last = count - 1;

    let view = request.viewport_size as u64;
    let max_scroll = sizes.total().saturating_sub(view);
    let scroll = request.scroll_offset.min(max_scroll);

    let first_visible = sizes.index_at(scroll).min(last);
    if request.viewport_size == 0 {
        return Some(WindowRange {
            start_index: first_visible,
            end_index: first_visible,
        });
    }

    let last_visible = sizes.index_at(scroll.saturating_add(view)).min(last);
    Some(WindowRange {
        start_index: first_visible.saturating_sub(request.overscan),
        end_index: last_visible.saturating_add(request.overscan).min(last),
    })
}

/// Appends one [`VirtualItem`] per index of `range` to `out`.
///
/// Only the first start offset is looked up; the rest are accumulated, so every item starts exactly
/// where the previous one ends.
pub fn collect_items<S: ItemSizes + ?Sized>(
    range: WindowRange,
    sizes: &S,
    out: &mut Vec<VirtualItem>,
) {
    let end = range.end_index.min(sizes.count().saturating_sub(1));
    if sizes.count() == 0 || range.start_index > end {
        return;
    }
    out.reserve(end - range.start_index + 1);
    let mut start = sizes.start_of(range.start_index);
    for index in range.start_index..=end {
        let size = sizes.size_of(index).max(1);
        out.push(VirtualItem { index, start, size });
        start = start.saturating_add(size as u64);
    }
}
