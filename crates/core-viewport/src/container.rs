use core_model::StyleCategory;
use core_text::styled;
use crossterm::style::ContentStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Padding {
    pub const fn uniform(n: usize) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }
}

/// Outer frame drawn around the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStyle {
    pub border: bool,
    pub padding: Padding,
    pub border_style: StyleCategory,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            border: false,
            padding: Padding::default(),
            border_style: StyleCategory::Border,
        }
    }
}

impl ContainerStyle {
    pub fn bordered() -> Self {
        Self {
            border: true,
            ..Self::default()
        }
    }

    pub fn frame_width(&self) -> usize {
        self.padding.left + self.padding.right + if self.border { 2 } else { 0 }
    }

    pub fn frame_height(&self) -> usize {
        self.padding.top + self.padding.bottom + if self.border { 2 } else { 0 }
    }

    /// Surround `rows` (each exactly `inner` cells wide) with padding and,
    /// when enabled, a rounded border.
    pub(crate) fn wrap(
        &self,
        rows: Vec<String>,
        inner: usize,
        fill: ContentStyle,
        border: ContentStyle,
    ) -> Vec<String> {
        let blank = |n: usize| fill.apply(" ".repeat(n)).to_string();
        let padded = inner + self.padding.left + self.padding.right;
        let mut out = Vec::with_capacity(rows.len() + self.frame_height());
        out.extend((0..self.padding.top).map(|_| blank(padded)));
        for row in rows {
            let pad = styled::pad_needed(&row, inner);
            out.push(format!(
                "{}{}{}{}",
                blank(self.padding.left),
                row,
                blank(pad),
                blank(self.padding.right)
            ));
        }
        out.extend((0..self.padding.bottom).map(|_| blank(padded)));
        if !self.border {
            return out;
        }
        let edge = "─".repeat(padded);
        let side = border.apply("│").to_string();
        let mut framed = Vec::with_capacity(out.len() + 2);
        framed.push(border.apply(format!("╭{edge}╮")).to_string());
        framed.extend(out.into_iter().map(|row| format!("{side}{row}{side}")));
        framed.push(border.apply(format!("╰{edge}╯")).to_string());
        framed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sizes() {
        let c = ContainerStyle {
            border: true,
            padding: Padding {
                top: 1,
                right: 2,
                bottom: 0,
                left: 1,
            },
            ..ContainerStyle::default()
        };
        assert_eq!(c.frame_width(), 5);
        assert_eq!(c.frame_height(), 3);
        assert_eq!(ContainerStyle::default().frame_width(), 0);
    }

    #[test]
    fn border_wraps_rows() {
        let c = ContainerStyle::bordered();
        let d = ContentStyle::default();
        let rows = c.wrap(vec!["ab".into(), "c".into()], 2, d, d);
        assert_eq!(rows, vec!["╭──╮", "│ab│", "│c │", "╰──╯"]);
    }

    #[test]
    fn padding_without_border() {
        let c = ContainerStyle {
            padding: Padding::uniform(1),
            ..ContainerStyle::default()
        };
        let d = ContentStyle::default();
        let rows = c.wrap(vec!["x".into()], 1, d, d);
        assert_eq!(rows, vec!["   ", " x ", "   "]);
    }
}
