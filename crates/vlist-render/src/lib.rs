#![forbid(unsafe_code)]

//! Render target: styles, cells, buffers, frames and ANSI presentation.
//!
//! # Role in vlist
//! `vlist-render` is what widgets draw into. A [`frame::Frame`] bundles a
//! [`buffer::Buffer`] (a grid of [`cell::Cell`]s) with an optional hit grid
//! used to map mouse positions back to list rows.
//!
//! # How it fits in the system
//! `vlist-widgets` renders `VirtualizedList` rows into off-screen buffers and
//! blits the visible slice into the frame. With the `crossterm` feature the
//! [`presenter::Presenter`] writes a buffer to a terminal, emitting only the
//! cells that changed since the previous present.

pub mod buffer;
pub mod cell;
pub mod frame;
#[cfg(feature = "crossterm")]
pub mod presenter;
pub mod style;

pub use buffer::Buffer;
pub use cell::{Cell, CellContent};
pub use frame::{Frame, Hit, HitData, HitGrid, HitId, HitRegion};
pub use style::{Color, Style, StyleFlags};
