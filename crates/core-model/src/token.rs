use core_text::Position;

/// YAML lexical categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Scalar in key position (followed by `:`).
    Key,
    /// Plain or quoted string scalar.
    String,
    Number,
    Bool,
    Null,
    /// Content lines of a `|` / `>` block scalar.
    BlockScalar,
    Tag,
    Anchor,
    Alias,
    /// `:` mapping value indicator.
    KeyIndicator,
    /// `?` explicit key indicator.
    ExplicitKey,
    /// `-` block sequence entry.
    SequenceIndicator,
    /// `[` or `{`.
    FlowStart,
    /// `]` or `}`.
    FlowEnd,
    /// `,` inside a flow collection.
    FlowSeparator,
    /// `|` or `>` plus chomping/indentation modifiers.
    BlockIndicator,
    Comment,
    Directive,
    DocumentHeader,
    DocumentEnd,
    /// Trailing whitespace with no token after it.
    Space,
}

impl TokenKind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::Key
                | TokenKind::String
                | TokenKind::Number
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::BlockScalar
        )
    }

    /// Default indicator class for tokens of this kind.
    pub fn indicator(self) -> Indicator {
        match self {
            TokenKind::KeyIndicator | TokenKind::ExplicitKey | TokenKind::SequenceIndicator => {
                Indicator::BlockStructure
            }
            TokenKind::FlowStart | TokenKind::FlowEnd | TokenKind::FlowSeparator => {
                Indicator::FlowCollection
            }
            TokenKind::Comment => Indicator::Comment,
            TokenKind::Tag | TokenKind::Anchor | TokenKind::Alias => Indicator::NodeProperty,
            TokenKind::BlockIndicator | TokenKind::BlockScalar => Indicator::BlockScalar,
            TokenKind::Directive | TokenKind::DocumentHeader | TokenKind::DocumentEnd => {
                Indicator::Directive
            }
            _ => Indicator::None,
        }
    }
}

/// Syntactic role of the characters that introduced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    #[default]
    None,
    BlockStructure,
    FlowCollection,
    Comment,
    NodeProperty,
    QuotedScalar,
    BlockScalar,
    Directive,
}

/// Immutable token produced by a tokenizer.
///
/// `origin` is the exact source text the token consumed, including leading
/// whitespace and line breaks; `value` is the meaningful text only.
/// `position` is where `value` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub origin: String,
    pub position: Position,
    pub indicator: Indicator,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        value: impl Into<String>,
        origin: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            origin: origin.into(),
            position,
            indicator: kind.indicator(),
        }
    }

    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = indicator;
        self
    }

    /// Copy of this token restricted to one physical line of its origin.
    pub(crate) fn fragment(&self, piece: &str, position: Position) -> Self {
        Self {
            kind: self.kind,
            value: piece.trim().to_string(),
            origin: piece.to_string(),
            position,
            indicator: self.indicator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_defaults_follow_kind() {
        assert_eq!(TokenKind::Comment.indicator(), Indicator::Comment);
        assert_eq!(TokenKind::FlowStart.indicator(), Indicator::FlowCollection);
        assert_eq!(TokenKind::Anchor.indicator(), Indicator::NodeProperty);
        assert_eq!(TokenKind::String.indicator(), Indicator::None);
    }

    #[test]
    fn scalar_kinds() {
        assert!(TokenKind::Key.is_scalar());
        assert!(TokenKind::BlockScalar.is_scalar());
        assert!(!TokenKind::KeyIndicator.is_scalar());
    }
}
