#![forbid(unsafe_code)]

//! A render pass target: a [`Buffer`] plus optional mouse hit metadata.
//!
//! Widgets that want clicks routed back to them register rectangles in the
//! frame's hit grid while drawing. After the pass, the application asks the
//! frame which widget, region and payload sit under a mouse position.
//!
//! ```
//! use vlist_core::Rect;
//! use vlist_render::{Frame, HitId, HitRegion};
//!
//! let mut frame = Frame::with_hit_grid(10, 4);
//! frame.register_hit(Rect::new(0, 1, 10, 1), HitId::new(7), HitRegion::Content, 42);
//! let hit = frame.hit_test(3, 1).unwrap();
//! assert_eq!(hit.data, 42);
//! assert!(frame.hit_test(3, 0).is_none());
//! ```

use vlist_core::Rect;

use crate::buffer::Buffer;

/// Identifies the widget that owns a hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Widget-defined payload carried by a hit region (a list registers the
/// item index here).
pub type HitData = u64;

/// Which part of a widget was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    #[default]
    None,
    /// Item or body area.
    Content,
    /// Scrollbar track or thumb.
    Scrollbar,
    /// Application-defined tag.
    Custom(u8),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: HitId,
    pub region: HitRegion,
    pub data: HitData,
}

/// Per-cell hit map. Later registrations overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<Hit>>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; usize::from(width) * usize::from(height)],
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

    #[inline]
    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Map every cell of `rect` (clipped to the grid) to the given hit.
    pub fn register(&mut self, rect: Rect, id: HitId, region: HitRegion, data: HitData) {
        let rect = rect.intersection(&Rect::from_size(self.width, self.height));
        let hit = Some(Hit { id, region, data });
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(i) = self.index_of(x, y) {
                    self.cells[i] = hit;
                }
            }
        }
    }

    /// The hit registered at `(x, y)`, if any.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<Hit> {
        self.index_of(x, y).and_then(|i| self.cells[i])
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

/// Buffer plus per-pass metadata.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    /// Present only when the frame was created for mouse-aware rendering.
    pub hit_grid: Option<HitGrid>,
    /// Where the terminal cursor should be placed after presenting; `None`
    /// hides it.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    /// A frame without hit testing.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
            cursor: None,
        }
    }

    /// A frame whose widgets can register hit regions.
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            hit_grid: Some(HitGrid::new(width, height)),
            ..Self::new(width, height)
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn area(&self) -> Rect {
        self.buffer.area()
    }

    /// Reset the buffer, hit grid and cursor for the next pass.
    pub fn clear(&mut self) {
        self.buffer.clear();
        if let Some(grid) = self.hit_grid.as_mut() {
            grid.clear();
        }
        self.cursor = None;
    }

    #[inline]
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor = position;
    }

    /// Register a hit region. Returns `false` when the frame has no hit grid.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, region: HitRegion, data: HitData) -> bool {
        match self.hit_grid.as_mut() {
            Some(grid) => {
                grid.register(rect, id, region, data);
                true
            }
            None => false,
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<Hit> {
        self.hit_grid.as_ref().and_then(|grid| grid.hit_test(x, y))
    }
}
