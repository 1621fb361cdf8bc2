#![forbid(unsafe_code)]

//! Unified error for vlist applications.
//!
//! Each subsystem keeps its own typed error; [`Error`] wraps them so an
//! application can use one `Result` and still match on what matters. Window
//! construction failures are caller bugs (bad item or viewport heights),
//! configuration failures are user input, and I/O is the terminal.

use std::fmt;

use vlist_core::WindowError;
#[cfg(feature = "config")]
use vlist_runtime::config::ListConfigError;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Invalid window inputs.
    Window(WindowError),
    /// Configuration could not be loaded or failed validation.
    #[cfg(feature = "config")]
    Config(ListConfigError),
    /// Terminal or file I/O.
    Io(std::io::Error),
}

/// Standard result type for vlist APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Short label for logs and metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Window(_) => "window",
            #[cfg(feature = "config")]
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// The window input that failed its precondition, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Window(err) => Some(err.field()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(err) => write!(f, "invalid window: {err}"),
            #[cfg(feature = "config")]
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Window(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<WindowError> for Error {
    fn from(err: WindowError) -> Self {
        Self::Window(err)
    }
}

#[cfg(feature = "config")]
impl From<ListConfigError> for Error {
    fn from(err: ListConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
