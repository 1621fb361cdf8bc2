#![forbid(unsafe_code)]

//! Core: geometry and the fixed-row window computation.
//!
//! # Role in vlist
//! `vlist-core` is the pure layer. It knows nothing about cells, styles or
//! terminals; it answers one question: given a uniform row height, a viewport
//! and a scroll offset, which rows have to exist right now?
//!
//! # Primary responsibilities
//! - **WindowSpec / Window**: the render range (visible rows plus overscan)
//!   and the total virtual content height.
//! - **ScrollWindow**: remembers the last range and reports only changes, so
//!   hosts can skip work on scroll deltas that stay inside the same rows.
//! - **Rect**: terminal-cell rectangles shared by the render and widget crates.
//!
//! # How it fits in the system
//! `vlist-runtime` wraps the computation in reactive signals and
//! `vlist-widgets` drives it from `VirtualizedList::render`.

pub mod error;
pub mod geometry;
pub mod tracker;
pub mod window;

pub use error::WindowError;
pub use geometry::Rect;
pub use tracker::ScrollWindow;
pub use window::{DEFAULT_OVERSCAN, RenderRange, Window, WindowSpec};
