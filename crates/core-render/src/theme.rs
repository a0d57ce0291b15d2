//! Category -> terminal style mapping.
//!
//! Layering rule used everywhere a cell receives more than one style: a later
//! style's colors replace earlier ones when set, attributes accumulate.

use ahash::AHashMap;
use core_model::{StyleCategory, TokenKind};
use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    styles: AHashMap<StyleCategory, ContentStyle>,
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}

fn bg(color: Color) -> ContentStyle {
    ContentStyle {
        background_color: Some(color),
        ..ContentStyle::default()
    }
}

fn with_attr(mut style: ContentStyle, attr: Attribute) -> ContentStyle {
    style.attributes.set(attr);
    style
}

/// Compose `top` over `base`.
pub fn layer(base: ContentStyle, top: ContentStyle) -> ContentStyle {
    let mut attributes: Attributes = base.attributes;
    attributes.extend(top.attributes);
    ContentStyle {
        foreground_color: top.foreground_color.or(base.foreground_color),
        background_color: top.background_color.or(base.background_color),
        underline_color: top.underline_color.or(base.underline_color),
        attributes,
    }
}

/// Style slot for a token kind.
pub fn token_category(kind: TokenKind) -> StyleCategory {
    match kind {
        TokenKind::Key => StyleCategory::Key,
        TokenKind::String => StyleCategory::String,
        TokenKind::Number => StyleCategory::Number,
        TokenKind::Bool => StyleCategory::Bool,
        TokenKind::Null => StyleCategory::Null,
        TokenKind::BlockScalar => StyleCategory::BlockScalar,
        TokenKind::Tag => StyleCategory::Tag,
        TokenKind::Anchor => StyleCategory::Anchor,
        TokenKind::Alias => StyleCategory::Alias,
        TokenKind::Comment => StyleCategory::Comment,
        TokenKind::Directive => StyleCategory::Directive,
        TokenKind::DocumentHeader | TokenKind::DocumentEnd => StyleCategory::Document,
        TokenKind::KeyIndicator
        | TokenKind::ExplicitKey
        | TokenKind::SequenceIndicator
        | TokenKind::FlowStart
        | TokenKind::FlowEnd
        | TokenKind::FlowSeparator
        | TokenKind::BlockIndicator => StyleCategory::Indicator,
        TokenKind::Space => StyleCategory::Text,
    }
}

impl Default for Theme {
    fn default() -> Self {
        use StyleCategory as C;
        let mut t = Self::plain();
        t.set(C::Key, fg(Color::Blue));
        t.set(C::String, fg(Color::Green));
        t.set(C::Number, fg(Color::Magenta));
        t.set(C::Bool, fg(Color::Yellow));
        t.set(C::Null, fg(Color::Yellow));
        t.set(C::BlockScalar, fg(Color::Green));
        t.set(C::Tag, fg(Color::Cyan));
        t.set(C::Anchor, fg(Color::Cyan));
        t.set(C::Alias, with_attr(fg(Color::Cyan), Attribute::Italic));
        t.set(C::Indicator, fg(Color::DarkGrey));
        t.set(C::Comment, with_attr(fg(Color::DarkGrey), Attribute::Italic));
        t.set(C::Directive, fg(Color::DarkMagenta));
        t.set(C::Document, with_attr(fg(Color::DarkMagenta), Attribute::Bold));
        t.set(C::Deleted, bg(Color::Rgb { r: 72, g: 20, b: 24 }));
        t.set(C::Inserted, bg(Color::Rgb { r: 18, g: 58, b: 28 }));
        t.set(
            C::Search,
            ContentStyle {
                foreground_color: Some(Color::Black),
                background_color: Some(Color::Yellow),
                ..ContentStyle::default()
            },
        );
        t.set(
            C::SearchSelected,
            with_attr(
                ContentStyle {
                    foreground_color: Some(Color::Black),
                    background_color: Some(Color::Rgb { r: 255, g: 140, b: 0 }),
                    ..ContentStyle::default()
                },
                Attribute::Bold,
            ),
        );
        t.set(C::Annotation, with_attr(fg(Color::Cyan), Attribute::Dim));
        t.set(C::Gutter, fg(Color::DarkGrey));
        t.set(C::Separator, fg(Color::DarkGrey));
        t.set(C::Border, fg(Color::DarkGrey));
        t.set(C::Status, with_attr(ContentStyle::default(), Attribute::Reverse));
        t
    }
}

impl Theme {
    /// Every category unstyled except the annotation, which is always dim.
    pub fn plain() -> Self {
        let mut styles = AHashMap::new();
        styles.insert(
            StyleCategory::Annotation,
            with_attr(ContentStyle::default(), Attribute::Dim),
        );
        Self { styles }
    }

    pub fn set(&mut self, category: StyleCategory, style: ContentStyle) {
        self.styles.insert(category, style);
    }

    pub fn get(&self, category: StyleCategory) -> Option<ContentStyle> {
        self.styles.get(&category).copied()
    }

    /// Style for `category`, or the unstyled default.
    pub fn resolve(&self, category: StyleCategory) -> ContentStyle {
        self.get(category).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_overrides_colors_and_unions_attributes() {
        let base = with_attr(fg(Color::Blue), Attribute::Italic);
        let top = with_attr(bg(Color::Red), Attribute::Bold);
        let out = layer(base, top);
        assert_eq!(out.foreground_color, Some(Color::Blue));
        assert_eq!(out.background_color, Some(Color::Red));
        assert!(out.attributes.has(Attribute::Italic));
        assert!(out.attributes.has(Attribute::Bold));
        let recolor = layer(out, fg(Color::Green));
        assert_eq!(recolor.foreground_color, Some(Color::Green));
    }

    #[test]
    fn plain_theme_leaves_tokens_unstyled() {
        let t = Theme::plain();
        assert_eq!(t.resolve(StyleCategory::Key), ContentStyle::default());
        assert!(t.get(StyleCategory::Annotation).is_some());
    }

    #[test]
    fn indicators_share_a_slot() {
        assert_eq!(token_category(TokenKind::FlowStart), StyleCategory::Indicator);
        assert_eq!(token_category(TokenKind::KeyIndicator), StyleCategory::Indicator);
        assert_eq!(token_category(TokenKind::DocumentEnd), StyleCategory::Document);
    }
}
