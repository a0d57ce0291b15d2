//! The pager viewport.
//!
//! A [`Viewport`] owns the revision chain, the diff/view modes, search state
//! and scroll offsets. Every mutation re-derives the displayed source(s)
//! eagerly (diffing through a cached [`core_diff::DiffResult`]), re-runs the
//! search against them and clamps the offsets, so [`Viewport::view`] is a pure
//! read of the current state.
//!
//! Invariants after every public call:
//! * `y_offset <= max(0, total_line_count - content_height)`
//! * `x_offset <= max(0, text_width - content_width)`, and `x_offset == 0`
//!   while word wrap is on.
//! * `search_index` is `Some(i)` with `i < search_count` exactly when there
//!   are matches.

mod container;
mod render;
mod search;
mod viewport;

pub use container::{ContainerStyle, Padding};
pub use viewport::{
    MIN_PANE_WIDTH, Options, Pane, SEPARATOR_WIDTH, SearchMatch, Viewport, ViewportBuilder,
};
