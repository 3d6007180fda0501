/// Bound for row identity keys: hashable with `std`, ordered without it.
#[cfg(feature = "std")]
pub trait RowKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq + Clone> RowKey for T {}

#[cfg(not(feature = "std"))]
pub trait RowKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<T: Ord + Clone> RowKey for T {}

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = alloc::collections::BTreeMap<K, V>;
