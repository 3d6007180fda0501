//! A headless row windowing engine for large tables.
//!
//! For table/grid integration (row models, renderability, identity-keyed measurements), see the
//! `row-window-adapter` crate.
//!
//! Given a scroll offset, a viewport size and per-row sizes that may not be known yet, the engine
//! produces:
//! - the minimal, overscanned index range to render,
//! - the start offset and size of each rendered row,
//! - a total-extent estimate for the scroll track that stays consistent as real measurements
//!   replace estimates.
//!
//! It is UI-agnostic. The host is expected to provide:
//! - viewport size and scroll offset events (directly or through a [`ViewportObserver`])
//! - a frame hook ([`Virtualizer::tick`])
//! - measured row sizes once rows are laid out
//!
//! ```
//! use row_window::{Virtualizer, VirtualizerOptions};
//!
//! let mut v = Virtualizer::new(VirtualizerOptions::new(1000, 40).with_overscan(2));
//! v.notify_resize(400);
//! v.flush();
//!
//! let window = v.visible_window();
//! assert_eq!(window.start_index(), Some(0));
//! assert_eq!(window.end_index(), Some(12));
//! assert_eq!(window.total_extent, 40_000);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod extent;
mod fenwick;
mod measurement;
mod options;
mod range;
mod table;
mod tracker;
mod types;
mod virtualizer;


pub use extent::{ExtentEstimator, estimate_extent};
pub use measurement::{Commit, MeasurementStore};
pub use options::{DEFAULT_OVERSCAN, SizeHint, VirtualizerOptions};
pub use range::{FnSizes, ItemSizes, RangeRequest, UniformSizes, collect_items, compute_range};
pub use tracker::{
    DEFAULT_FRAME_INTERVAL_MS, DEFAULT_IS_SCROLLING_RESET_DELAY_MS, ScrollTracker, Subscription,
    ViewportEventSink, ViewportObserver,
};
pub use types::{Align, ScrollDirection, ViewportInput, VirtualItem, VisibleWindow, WindowRange};
pub use virtualizer::{MeasureHandle, SubscriberId, Virtualizer};
