#![forbid(unsafe_code)]

//! Shared types for the knockout render kernel: geometry, plot styles,
//! the bitmap capability, and the plot error taxonomy.

pub mod bitmap;
pub mod error;
pub mod geometry;
pub mod style;

pub use bitmap::{Bitmap, SolidBitmap, TileFlags};
pub use error::{PlotError, PlotResult};
pub use geometry::{Line, Point, Rect};
pub use style::{Colour, LinePattern, PlotStyle, Stroke, TextStyle};
