#![forbid(unsafe_code)]

//! The plot capability set.
//!
//! A `Plotter` is the full set of primitives a redraw pass may issue.
//! Backends implement it once; the knockout session implements it a
//! second time as a recording layer, so callers cannot tell whether they
//! are plotting directly or through the engine.

use knockout_core::bitmap::{Bitmap, TileFlags};
use knockout_core::error::PlotResult;
use knockout_core::geometry::{Line, Point, Rect};
use knockout_core::style::{Colour, PlotStyle, TextStyle};

/// Drawing primitives issued by a redraw pass.
///
/// Coordinates are device pixels. Every operation is clipped by the most
/// recent `clip` call. Operations report success or a `PlotError`; a
/// failed operation must leave the backend usable for the next one.
pub trait Plotter {
    /// Image handle type accepted by the bitmap operations.
    type Bitmap: Bitmap + Clone;

    /// Clear the clipped surface to a single colour.
    fn clear(&mut self, colour: Colour) -> PlotResult;

    /// Plot a rectangle, filled and/or outlined per the style.
    fn rectangle(&mut self, style: &PlotStyle, rect: &Rect) -> PlotResult;

    /// Plot a line segment.
    fn line(&mut self, style: &PlotStyle, line: &Line) -> PlotResult;

    /// Plot a filled polygon (non-zero winding, edges not stroked).
    fn polygon(&mut self, style: &PlotStyle, points: &[Point]) -> PlotResult;

    /// Plot a fully opaque filled rectangle.
    ///
    /// The guarantee that every pixel of `rect` is non-transparently
    /// overwritten is what lets this call take part in knockout.
    fn fill(&mut self, colour: Colour, rect: &Rect) -> PlotResult;

    /// Set the clip rectangle for subsequent operations.
    fn clip(&mut self, rect: &Rect) -> PlotResult;

    /// Plot a text run with its top-left baseline origin at `(x, y)`.
    fn text(&mut self, style: &TextStyle, x: i32, y: i32, text: &str) -> PlotResult;

    /// Plot a circle centred on `(x, y)`, filled and/or outlined.
    fn disc(&mut self, style: &PlotStyle, x: i32, y: i32, radius: i32) -> PlotResult;

    /// Plot an arc around `(x, y)`, anticlockwise from `angle1` to
    /// `angle2`, in degrees from horizontal.
    fn arc(
        &mut self,
        style: &PlotStyle,
        x: i32,
        y: i32,
        radius: i32,
        angle1: i32,
        angle2: i32,
    ) -> PlotResult;

    /// Plot a bitmap scaled into the `width` × `height` box at `(x, y)`,
    /// alpha-blended against `bg`.
    fn bitmap(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
    ) -> PlotResult;

    /// Plot a bitmap tile at `(x, y)` repeating across the clip
    /// rectangle on the axes set in `flags`.
    fn bitmap_tiled(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        flags: TileFlags,
    ) -> PlotResult;

    /// Open a named group of objects.
    ///
    /// Only meaningful for backends exporting structured vector output;
    /// others can keep the default no-op.
    fn group_start(&mut self, _name: &str) -> PlotResult {
        Ok(())
    }

    /// Close the innermost open group.
    fn group_end(&mut self) -> PlotResult {
        Ok(())
    }
}
