#![forbid(unsafe_code)]

//! Precondition errors for window construction.
//!
//! The window computation itself cannot fail. Every error here is raised
//! while building a [`crate::WindowSpec`] from caller-supplied numbers, so a
//! bad row height is reported at construction time instead of surfacing as
//! a `NaN` layout three frames later.

use std::fmt;

/// A window input violated its precondition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowError {
    /// Row height was zero, negative, or not a finite number.
    NonPositiveItemHeight(f64),
    /// Viewport height was zero, negative, or not a finite number.
    NonPositiveViewportHeight(f64),
    /// Overscan count was negative.
    NegativeOverscan(i64),
}

impl WindowError {
    /// Name of the offending input, for log fields.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveItemHeight(_) => "item_height",
            Self::NonPositiveViewportHeight(_) => "viewport_height",
            Self::NegativeOverscan(_) => "overscan",
        }
    }
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveItemHeight(h) => {
                write!(f, "item height must be a positive finite number, got {h}")
            }
            Self::NonPositiveViewportHeight(h) => {
                write!(f, "viewport height must be a positive finite number, got {h}")
            }
            Self::NegativeOverscan(n) => write!(f, "overscan count must be >= 0, got {n}"),
        }
    }
}

impl std::error::Error for WindowError {}

/// Validate a row height.
pub(crate) fn check_item_height(height: f64) -> Result<f64, WindowError> {
    if height.is_finite() && height > 0.0 {
        Ok(height)
    } else {
        Err(WindowError::NonPositiveItemHeight(height))
    }
}

/// Validate a viewport height.
pub(crate) fn check_viewport_height(height: f64) -> Result<f64, WindowError> {
    if height.is_finite() && height > 0.0 {
        Ok(height)
    } else {
        Err(WindowError::NonPositiveViewportHeight(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bad_value() {
        let err = WindowError::NonPositiveItemHeight(0.0);
        assert_eq!(
            err.to_string(),
            "item height must be a positive finite number, got 0"
        );
        let err = WindowError::NegativeOverscan(-3);
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn nan_and_infinity_are_rejected() {
        assert!(check_item_height(f64::NAN).is_err());
        assert!(check_item_height(f64::INFINITY).is_err());
        assert!(check_viewport_height(-1.0).is_err());
        assert_eq!(check_viewport_height(24.0), Ok(24.0));
    }

    #[test]
    fn field_labels() {
        assert_eq!(WindowError::NonPositiveItemHeight(0.0).field(), "item_height");
        assert_eq!(
            WindowError::NonPositiveViewportHeight(0.0).field(),
            "viewport_height"
        );
        assert_eq!(WindowError::NegativeOverscan(-1).field(), "overscan");
    }
}
