#![forbid(unsafe_code)]

//! Row-major cell grid.
//!
//! All writes are clipped: coordinates outside the buffer are ignored rather
//! than reported, so widgets can draw without bounds bookkeeping.

use unicode_width::UnicodeWidthChar;
use vlist_core::Rect;

use crate::cell::{Cell, CellContent};
use crate::style::Style;

/// A `width x height` grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area, anchored at the origin.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index_of(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Write `text` starting at `(x, y)`, using at most `max_width` columns.
    ///
    /// Control characters are skipped. A double-width character that would
    /// not fit entirely is not drawn. Returns the number of columns written.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, max_width: u16, style: Style) -> u16 {
        if y >= self.height || x >= self.width {
            return 0;
        }
        let limit = max_width.min(self.width - x);
        let mut used: u16 = 0;
        for ch in text.chars() {
            let w = match ch.width() {
                Some(w) if w > 0 => w as u16,
                _ => continue,
            };
            if used + w > limit {
                break;
            }
            let col = x + used;
            let base = self.get(col, y).copied().unwrap_or_default();
            self.set(
                col,
                y,
                Cell {
                    content: CellContent::Char(ch),
                    ..base
                }
                .with_style(style),
            );
            if w == 2 {
                let base = self.get(col + 1, y).copied().unwrap_or_default();
                self.set(
                    col + 1,
                    y,
                    Cell {
                        content: CellContent::Continuation,
                        ..base
                    }
                    .with_style(style),
                );
            }
            used += w;
        }
        used
    }

    /// Apply `style` to every cell in `area` without touching content.
    pub fn set_style_area(&mut self, area: Rect, style: Style) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    *cell = cell.with_style(style);
                }
            }
        }
    }

    /// Overwrite every cell in `area` with `cell`.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Copy rows of `src`, starting at row `src_y`, into `dst`.
    ///
    /// Copies `dst.height` rows and `dst.width` columns at most, stopping
    /// early when either buffer runs out.
    pub fn copy_rows_from(&mut self, src: &Buffer, src_y: u16, dst: Rect) {
        let dst = dst.intersection(&self.area());
        let cols = dst.width.min(src.width);
        for row in 0..dst.height {
            let Some(sy) = src_y.checked_add(row) else {
                break;
            };
            if sy >= src.height {
                break;
            }
            for col in 0..cols {
                if let Some(cell) = src.get(col, sy) {
                    self.set(dst.x + col, dst.y + row, *cell);
                }
            }
        }
    }

    /// Text content of row `y`; empty cells read as spaces.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        (0..self.width)
            .filter_map(|x| match self.get(x, y).map(|c| c.content) {
                Some(CellContent::Char(ch)) => Some(ch),
                Some(CellContent::Continuation) => None,
                _ => Some(' '),
            })
            .collect()
    }

    /// Every row as text with trailing whitespace removed.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect()
    }
}
