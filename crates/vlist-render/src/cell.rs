#![forbid(unsafe_code)]

//! A single terminal cell.

use crate::style::{Color, Style, StyleFlags};

/// What a cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// Nothing drawn; presented as a space.
    #[default]
    Empty,
    /// A character occupying one or two columns.
    Char(char),
    /// Right half of a double-width character.
    Continuation,
}

impl CellContent {
    /// The character in this cell, if any.
    #[inline]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(ch) => Some(*ch),
            _ => None,
        }
    }
}

/// Content plus resolved colors and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub content: CellContent,
    pub fg: Color,
    pub bg: Color,
    pub flags: StyleFlags,
}

impl Cell {
    /// A cell showing `ch` with default colors.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            content: CellContent::Char(ch),
            fg: Color::Reset,
            bg: Color::Reset,
            flags: StyleFlags::empty(),
        }
    }

    /// The continuation marker placed after a wide character.
    #[inline]
    pub(crate) const fn continuation() -> Self {
        Self {
            content: CellContent::Continuation,
            fg: Color::Reset,
            bg: Color::Reset,
            flags: StyleFlags::empty(),
        }
    }

    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Apply the set fields of `style`. Attribute flags are added, not replaced.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        if let Some(attrs) = style.attrs {
            self.flags |= attrs;
        }
        self
    }

    /// Whether the cell has no content.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_char_has_default_colors() {
        let cell = Cell::from_char('x');
        assert_eq!(cell.content.as_char(), Some('x'));
        assert_eq!(cell.fg, Color::Reset);
        assert!(!cell.is_empty());
        assert!(Cell::default().is_empty());
    }

    #[test]
    fn with_style_adds_flags() {
        let cell = Cell::from_char('a')
            .with_flags(StyleFlags::BOLD)
            .with_style(Style::new().fg(Color::Red).reverse());
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.bg, Color::Reset);
        assert_eq!(cell.flags, StyleFlags::BOLD | StyleFlags::REVERSE);
    }

    #[test]
    fn continuation_has_no_char() {
        assert_eq!(Cell::continuation().content.as_char(), None);
        assert!(!Cell::continuation().is_empty());
    }
}
