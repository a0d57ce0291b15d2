//! Search over rendered sources.
//!
//! A [`Finder`] loads a [`core_model::Source`] once and answers many queries.
//! Both sides are folded through the same [`Normalizer`], so matching is by
//! normalized character; results are reported in grapheme columns.

mod finder;
mod normalize;

pub use finder::{Finder, TextFinder};
pub use normalize::{CaseFold, Identity, Normalizer, NormalizerKind, StripMarks};
