//! Document model for the pager.
//!
//! Data flows leaves-first:
//!
//! ```text
//! raw YAML --lexer--> [Token] --assemble--> [Line] --> Source --append--> RevisionChain
//! ```
//!
//! Core invariants (must hold after every public call):
//! * Tokens within a `Source` are in source order and their origins,
//!   concatenated, reproduce the input text (newlines are the line breaks).
//! * Every `Line` holds tokens from exactly one source row; multi-line
//!   scalars are split at embedded newlines into separate lines.
//! * `Line::row` equals the line's index inside its `Source` (visual row).
//!   `Line::source_row` keeps the original row for gutters and hunk headers and
//!   is `None` only for diff placeholders.
//! * A `Source` is content-immutable once built; only its overlay side table
//!   changes (`add_overlay` / `clear_overlays`).
//! * The revision chain has exactly one cursor whenever it is non-empty.

pub mod lexer;
mod line;
mod mode;
mod revision;
mod source;
mod style;
mod token;

pub use line::{Line, LineFlag, assemble};
pub use mode::{DiffMode, GutterMode, ParseModeError, ViewMode};
pub use revision::{Revision, RevisionChain, RevisionRef};
pub use source::{Overlay, Source};
pub use style::StyleCategory;
pub use token::{Indicator, Token, TokenKind};

pub use core_text::{Position, Range, Span};
