#![forbid(unsafe_code)]

use unicode_width::UnicodeWidthStr;
use vlist_core::Rect;
use vlist_render::{Frame, Style};

use crate::{Widget, draw_text};

/// Horizontal placement of each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Styled text, one row per `\n`-separated line, truncated to the area.
#[derive(Debug, Clone, Default)]
pub struct Label<'a> {
    text: &'a str,
    style: Style,
    alignment: Alignment,
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Widget for Label<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Label",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        frame.buffer.set_style_area(area, self.style);

        for (row, line) in self.text.lines().enumerate() {
            let Some(line_area) = u16::try_from(row).ok().and_then(|r| area.row(r)) else {
                break;
            };
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            let pad = match self.alignment {
                Alignment::Left => 0,
                Alignment::Center => area.width.saturating_sub(width) / 2,
                Alignment::Right => area.width.saturating_sub(width),
            };
            let target = Rect::new(line_area.x + pad, line_area.y, line_area.width - pad, 1);
            draw_text(frame, target, line, self.style);
        }
    }
}
