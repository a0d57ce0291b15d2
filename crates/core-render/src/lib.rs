//! Styled rendering of sources.
//!
//! * [`theme`]: style categories resolved to crossterm styles, plus the
//!   layering rule shared by every composed cell.
//! * [`printer`]: the [`Printer`] capability and [`YamlPrinter`], which turns
//!   a (span of a) source into SGR-styled rows with gutter, overlays, word
//!   wrap and annotations.
//! * [`status`]: status line segments and formatting.
//! * [`writer`]: ordered terminal command queue used to paint a frame.
//!
//! Output of this crate is plain `String`s carrying ANSI escapes; measuring
//! and cutting them is done with `core_text::styled`.

pub mod printer;
pub mod status;
pub mod theme;
pub mod writer;

pub use printer::{Printer, YamlPrinter};
pub use theme::{Theme, layer, token_category};
