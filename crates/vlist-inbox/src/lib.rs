#![forbid(unsafe_code)]

//! Messaging inbox built on `vlist`.
//!
//! # Role
//! A complete consumer of the virtualized list: a message repository
//! behind the [`vlist::ItemSource`] boundary, message cards as
//! [`vlist::RenderItem`]s, an update/view model and a crossterm event loop.
//!
//! # How it fits
//! - [`data`]: messages, the repository trait and the list source.
//! - [`row`]: the three-row message card.
//! - [`app`]: [`app::InboxApp`], actions in, frames out.
//! - [`terminal`]: raw-mode session and event mapping.
//! - [`cli`]: `snapshot` and `run` commands.

pub mod app;
pub mod cli;
pub mod data;
pub mod row;
pub mod terminal;

pub use app::{Action, InboxApp};
pub use data::{InMemoryRepository, Message, MessageList, MessageRepository};
pub use row::{CardTheme, MessageCard};
