//! Display width of grapheme clusters.
//!
//! All width decisions in the workspace flow through [`egc_width`]. The
//! baseline comes from `unicode_width`; a small classifier widens emoji
//! compositions that the baseline tends to under-measure. Over-estimation
//! only leaves a blank cell, under-estimation shifts every following column.
//!
//! Tabs are rendered as a single space by the printer and therefore measure 1.
//! Other control characters measure 0.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Rough Extended Pictographic range check (emoji blocks + misc symbols/dingbats).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Control,
    Narrow,
    Wide,
    Emoji,
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Control;
    };
    if first == '\t' {
        return EgcKind::Narrow;
    }
    if first.is_control() {
        return EgcKind::Control;
    }
    if first.is_ascii() && egc.len() == 1 {
        return EgcKind::Narrow;
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut zwj = false;
    let mut keycap = false;
    let mut skin = false;
    for c in egc.chars() {
        if is_extended_pictographic(c) {
            pictographic += 1;
        }
        if is_regional_indicator(c) {
            regional += 1;
        }
        zwj |= c == ZWJ;
        keycap |= c == KEYCAP_COMBINING;
        skin |= is_skin_tone_modifier(c);
    }

    if keycap || regional > 0 || (zwj && pictographic >= 2) || skin {
        return EgcKind::Emoji;
    }
    // The base character decides width for combining sequences.
    match UnicodeWidthChar::width(first) {
        Some(2) => EgcKind::Wide,
        _ if pictographic > 0 && egc.chars().count() > 1 => EgcKind::Emoji,
        _ if is_extended_pictographic(first) => EgcKind::Emoji,
        Some(0) => EgcKind::Control,
        _ => EgcKind::Narrow,
    }
}

/// Return the display column width for a single grapheme cluster (EGC).
///
/// Precondition: `egc` is one cluster as produced by segmentation.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    match classify(egc) {
        EgcKind::Control => 0,
        EgcKind::Narrow => 1,
        EgcKind::Wide | EgcKind::Emoji => 2,
    }
}

/// Display width of an arbitrary (unstyled) string.
pub fn str_width(s: &str) -> usize {
    s.graphemes(true).map(|g| egc_width(g) as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width(" "), 1);
    }

    #[test]
    fn tab_is_one_cell() {
        assert_eq!(egc_width("\t"), 1);
    }

    #[test]
    fn control_is_zero() {
        assert_eq!(egc_width("\u{1b}"), 0);
        assert_eq!(egc_width(""), 0);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(egc_width("界"), 2);
    }

    #[test]
    fn emoji_basic() {
        assert_eq!(egc_width("😀"), 2);
    }

    #[test]
    fn combining_acute() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }

    #[test]
    fn emoji_flag_and_keycap() {
        assert_eq!(egc_width("🇺🇸"), 2);
        assert_eq!(egc_width("1️⃣"), 2);
    }

    #[test]
    fn emoji_zwj_family() {
        assert_eq!(egc_width("👨‍👩‍👧‍👦"), 2);
    }

    #[test]
    fn emoji_skin_tone() {
        assert_eq!(egc_width("👍🏻"), 2);
    }

    #[test]
    fn string_width_sums_clusters() {
        assert_eq!(str_width("key: 界"), 7);
        assert_eq!(str_width(""), 0);
    }
}
