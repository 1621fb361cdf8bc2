#![forbid(unsafe_code)]

//! Message card rows.
//!
//! A card is [`CARD_HEIGHT`] rows: sender and time, subject, preview. With a
//! shorter configured row height the lower lines are simply not drawn.

use vlist::{Color, Frame, Rect, RenderItem, Style, draw_text};

use crate::data::Message;

/// Rows a full card needs.
pub const CARD_HEIGHT: u16 = 3;

const UNREAD_MARK: &str = "●";
const FLAG_MARK: &str = "⚑";
const SELECT_MARK: &str = "▌";
/// Sender columns kept before the time is dropped from the first line.
const MIN_SENDER_WIDTH: u16 = 8;

/// Card styles.
#[derive(Debug, Clone, Copy)]
pub struct CardTheme {
    pub sender: Style,
    pub unread: Style,
    pub time: Style,
    pub subject: Style,
    pub preview: Style,
    pub flag: Style,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            sender: Style::new(),
            unread: Style::new().fg(Color::Cyan),
            time: Style::new().fg(Color::Gray),
            subject: Style::new(),
            preview: Style::new().dim(),
            flag: Style::new().fg(Color::Yellow),
        }
    }
}

/// A [`Message`] drawn with a [`CardTheme`].
#[derive(Debug, Clone, Copy)]
pub struct MessageCard<'a> {
    message: &'a Message,
    theme: CardTheme,
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            message,
            theme: CardTheme::default(),
        }
    }

    #[must_use]
    pub fn theme(mut self, theme: CardTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn draw(&self, area: Rect, frame: &mut Frame, selected: bool) {
        if area.width < 4 {
            return;
        }
        let m = self.message;
        let theme = &self.theme;

        // Gutter: selection bar, unread dot, one blank column.
        if selected {
            for row in 0..area.height {
                frame
                    .buffer
                    .set_string(area.x, area.y + row, SELECT_MARK, 1, Style::new());
            }
        }
        if m.unread {
            frame
                .buffer
                .set_string(area.x + 1, area.y, UNREAD_MARK, 1, theme.unread);
        }
        let body = Rect::new(area.x + 3, area.y, area.width - 3, area.height);

        if let Some(line) = body.row(0) {
            let time = m.time_label();
            let flag = if m.flagged { 2 } else { 0 };
            let right = time.len() as u16 + flag;
            let sender_style = if m.unread {
                theme.sender.bold()
            } else {
                theme.sender
            };
            if line.width > right + MIN_SENDER_WIDTH {
                let (left, meta) = line.split_right(right);
                draw_text(frame, left, &m.sender, sender_style);
                if m.flagged {
                    frame.buffer.set_string(meta.x, meta.y, FLAG_MARK, 1, theme.flag);
                }
                frame
                    .buffer
                    .set_string(meta.x + flag, meta.y, &time, meta.width, theme.time);
            } else {
                draw_text(frame, line, &m.sender, sender_style);
            }
        }
        if let Some(line) = body.row(1) {
            let style = if m.unread {
                theme.subject.bold()
            } else {
                theme.subject
            };
            draw_text(frame, line, &m.subject, style);
        }
        if let Some(line) = body.row(2) {
            draw_text(frame, line, &m.preview, theme.preview);
        }
    }
}

impl RenderItem for Message {
    fn render(&self, area: Rect, frame: &mut Frame, selected: bool) {
        MessageCard::new(self).draw(area, frame, selected);
    }
}
