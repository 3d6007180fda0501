//! Table/grid adapter for the `row-window` crate.
//!
//! `row-window` is UI-agnostic and keys everything by row index. This crate binds it to a table's
//! row model:
//!
//! - identity-keyed measurements that survive sorting and filtering
//! - per-row renderability (placeholders keep their slot but are not drawn)
//! - per-row size hints taken from the model
//!
//! It does not depend on any UI framework.
//!
//! ```
//! use row_window_adapter::{RenderedRow, RowModel, TableController};
//!
//! struct Rows(Vec<u64>);
//!
//! impl RowModel for Rows {
//!     type Key = u64;
//!
//!     fn row_count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn row_key(&self, index: usize) -> u64 {
//!         self.0[index]
//!     }
//! }
//!
//! let rows = Rows((0..10_000).collect());
//! let mut table = TableController::new(&rows, 35);
//! table.on_resize(350);
//! table.flush();
//!
//! let mut out: Vec<RenderedRow<u64>> = Vec::new();
//! table.rendered_rows(&rows, &mut out);
//! assert_eq!(out.first().map(|r| r.key), Some(0));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod key;
mod model;

#[cfg(test)]
mod tests;

pub use controller::{SyncOutcome, TableController};
pub use key::RowKey;
pub use model::{RenderedRow, RowModel};
