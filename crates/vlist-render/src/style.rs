#![forbid(unsafe_code)]

//! Colors, text attributes and composable styles.

use bitflags::bitflags;

/// Terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    White,
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 0b0000_0001;
        const DIM = 0b0000_0010;
        const ITALIC = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE = 0b0001_0000;
    }
}

/// A partial style: unset fields leave the target cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags to the style.
    #[must_use]
    pub fn add_attrs(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.add_attrs(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.add_attrs(StyleFlags::DIM)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.add_attrs(StyleFlags::REVERSE)
    }

    /// Layer `other` on top of `self`. Set fields in `other` win; attribute
    /// flags are unioned.
    #[must_use]
    pub fn patch(self, other: Style) -> Style {
        let attrs = match (self.attrs, other.attrs) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => b.or(a),
        };
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs,
        }
    }

    /// Whether applying this style would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let style = Style::new().fg(Color::Cyan).bg(Color::Black).bold();
        assert_eq!(style.fg, Some(Color::Cyan));
        assert_eq!(style.bg, Some(Color::Black));
        assert_eq!(style.attrs, Some(StyleFlags::BOLD));
    }

    #[test]
    fn patch_prefers_overlay_and_unions_flags() {
        let base = Style::new().fg(Color::White).bold();
        let overlay = Style::new().fg(Color::Yellow).reverse();
        let merged = base.patch(overlay);
        assert_eq!(merged.fg, Some(Color::Yellow));
        assert_eq!(merged.bg, None);
        assert_eq!(merged.attrs, Some(StyleFlags::BOLD | StyleFlags::REVERSE));
    }

    #[test]
    fn patch_with_empty_is_identity() {
        let base = Style::new().bg(Color::Rgb(10, 20, 30)).dim();
        assert_eq!(base.patch(Style::default()), base);
        assert_eq!(Style::default().patch(base), base);
        assert!(Style::default().is_empty());
    }
}
