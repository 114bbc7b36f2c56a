#![forbid(unsafe_code)]

//! Plot error taxonomy.
//!
//! Arena capacity exhaustion is deliberately absent: it is recovered
//! inside the render kernel by a forced flush and never reaches callers.

use std::error::Error;
use std::fmt;

use crate::geometry::Rect;

/// Failure of a plot operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotError {
    /// A clip rectangle with inverted edges was rejected.
    BadClip(Rect),
    /// A bitmap handle could not be drawn (stale or unloadable image).
    BitmapUnavailable,
    /// Backend-specific failure, carried through replay.
    Backend(String),
}

impl PlotError {
    /// Convenience constructor for backend failures.
    pub fn backend(msg: impl Into<String>) -> Self {
        PlotError::Backend(msg.into())
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotError::BadClip(r) => write!(
                f,
                "bad clip rectangle ({}, {}, {}, {})",
                r.x0, r.y0, r.x1, r.y1
            ),
            PlotError::BitmapUnavailable => write!(f, "bitmap unavailable"),
            PlotError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl Error for PlotError {}

/// Result of a plot operation.
pub type PlotResult = Result<(), PlotError>;
