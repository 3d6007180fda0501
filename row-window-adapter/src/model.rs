use crate::RowKey;

/// What the table collaborator exposes about its rows.
///
/// Indexes are positions in the current row order. Keys identify a row across reorders, so a
/// measured size follows the row rather than the slot it used to occupy.
pub trait RowModel {
    type Key: RowKey;

    fn row_count(&self) -> usize;

    fn row_key(&self, index: usize) -> Self::Key;

    /// Rows that are not renderable (placeholders, rows still loading) keep their slot in the
    /// layout but are left out of [`crate::TableController::rendered_rows`].
    fn is_renderable(&self, _index: usize) -> bool {
        true
    }

    /// Optional per-row estimate used until the row is measured.
    fn size_hint(&self, _index: usize) -> Option<u32> {
        None
    }
}

impl<M: RowModel + ?Sized> RowModel for &M {
    type Key = M::Key;

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn row_key(&self, index: usize) -> Self::Key {
        (**self).row_key(index)
    }

    fn is_renderable(&self, index: usize) -> bool {
        (**self).is_renderable(index)
    }

    fn size_hint(&self, index: usize) -> Option<u32> {
        (**self).size_hint(index)
    }
}

/// A row placed in the layout, ready to be drawn at `start`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedRow<K> {
    pub index: usize,
    pub key: K,
    pub start: u64,
    pub size: u32,
}

impl<K> RenderedRow<K> {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}
