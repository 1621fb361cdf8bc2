#![forbid(unsafe_code)]

//! Presenter: diffed ANSI emission through crossterm commands.
//!
//! The presenter remembers the last buffer it wrote and, on the next
//! [`Presenter::present`], queues output only for cells that differ. Style
//! and cursor state are tracked so escape sequences are emitted only when
//! they change. Everything is buffered and flushed once per frame.
//!
//! ```ignore
//! let mut presenter = Presenter::new(std::io::stdout());
//! let mut frame = Frame::new(80, 24);
//! // ... render widgets into `frame` ...
//! presenter.present(&frame.buffer, frame.cursor)?;
//! ```

use std::io::{self, BufWriter, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color as TermColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent};
use crate::style::{Color, StyleFlags};

const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: Color,
    bg: Color,
    flags: StyleFlags,
}

impl CellStyle {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        }
    }
}

/// Diffing terminal writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    previous: Option<Buffer>,
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            previous: None,
            current_style: None,
            cursor: None,
        }
    }

    /// Write `buffer`, emitting only cells changed since the last call, then
    /// place or hide the cursor. Returns the number of cells written.
    ///
    /// A size change (or the first call) clears the screen and redraws
    /// everything.
    pub fn present(&mut self, buffer: &Buffer, cursor: Option<(u16, u16)>) -> io::Result<usize> {
        let full = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.area() != buffer.area());
        if full {
            queue!(self.writer, SetAttribute(Attribute::Reset), Clear(ClearType::All))?;
            self.current_style = None;
            self.cursor = None;
        }
        queue!(self.writer, Hide)?;

        let mut written = 0;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if matches!(cell.content, CellContent::Continuation) {
                    continue;
                }
                let unchanged = !full
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(x, y))
                        .is_some_and(|old| old == cell);
                if unchanged {
                    continue;
                }
                self.emit_cell(x, y, cell, buffer)?;
                written += 1;
            }
        }

        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.current_style = None;
        if let Some((x, y)) = cursor {
            queue!(self.writer, MoveTo(x, y), Show)?;
            self.cursor = Some((x, y));
        }
        self.writer.flush()?;

        match self.previous.as_mut() {
            Some(prev) if !full => prev.clone_from(buffer),
            _ => self.previous = Some(buffer.clone()),
        }
        Ok(written)
    }

    fn emit_cell(&mut self, x: u16, y: u16, cell: &Cell, buffer: &Buffer) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(self.writer, MoveTo(x, y))?;
        }
        let style = CellStyle::of(cell);
        if self.current_style != Some(style) {
            queue!(
                self.writer,
                SetAttribute(Attribute::Reset),
                SetForegroundColor(term_color(style.fg)),
                SetBackgroundColor(term_color(style.bg)),
            )?;
            for (flag, attr) in [
                (StyleFlags::BOLD, Attribute::Bold),
                (StyleFlags::DIM, Attribute::Dim),
                (StyleFlags::ITALIC, Attribute::Italic),
                (StyleFlags::UNDERLINE, Attribute::Underlined),
                (StyleFlags::REVERSE, Attribute::Reverse),
            ] {
                if style.flags.contains(flag) {
                    queue!(self.writer, SetAttribute(attr))?;
                }
            }
            self.current_style = Some(style);
        }
        let ch = cell.content.as_char().unwrap_or(' ');
        queue!(self.writer, Print(ch))?;

        let wide = buffer
            .get(x.saturating_add(1), y)
            .is_some_and(|next| matches!(next.content, CellContent::Continuation))
            && cell.content.as_char().is_some();
        let advance = if wide { 2 } else { 1 };
        self.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }

    /// Forget the previous frame so the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.current_style = None;
        self.cursor = None;
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// The underlying writer. Buffered output not yet flushed is not visible
    /// through it.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Blue => TermColor::Blue,
        Color::Magenta => TermColor::Magenta,
        Color::Cyan => TermColor::Cyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
    }
}
