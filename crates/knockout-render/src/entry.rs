#![forbid(unsafe_code)]

//! Recorded plot calls.
//!
//! One `DrawEntry` per intercepted operation, held in strict temporal
//! order until replay. Entries own their payloads: polygon vertices sit
//! in the session's coordinate pool, text is copied, bitmap handles are
//! cloned. Only opaque fills and opaque bitmaps carry a box reference
//! into the occlusion forest; everything else replays verbatim.
//!
//! There is no `Clear` variant: a surface clear is recorded as an opaque
//! fill of the current clip rectangle, which is exactly what it is for
//! occlusion purposes.

use knockout_core::bitmap::TileFlags;
use knockout_core::geometry::{Line, Rect};
use knockout_core::style::{Colour, PlotStyle, TextStyle};

use crate::arena::CoordSpan;
use crate::occlusion::BoxId;

/// One recorded plot call.
#[derive(Debug, Clone)]
pub enum DrawEntry<B> {
    /// Outlined rectangle (the stroke half of a `rectangle` call).
    Rectangle { style: PlotStyle, rect: Rect },
    Line {
        style: PlotStyle,
        line: Line,
    },
    /// Filled polygon; vertices live in the session's coordinate pool.
    Polygon {
        style: PlotStyle,
        span: CoordSpan,
    },
    /// Opaque fill. Knocks out and gets knocked out.
    Fill {
        colour: Colour,
        rect: Rect,
        box_id: BoxId,
    },
    Clip {
        rect: Rect,
    },
    Text {
        style: TextStyle,
        x: i32,
        y: i32,
        text: String,
    },
    Disc {
        style: PlotStyle,
        x: i32,
        y: i32,
        radius: i32,
    },
    Arc {
        style: PlotStyle,
        x: i32,
        y: i32,
        radius: i32,
        angle1: i32,
        angle2: i32,
    },
    /// Scaled bitmap. `box_id` is present iff the bitmap is opaque.
    Bitmap {
        bitmap: B,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        box_id: Option<BoxId>,
    },
    /// Tiled bitmap. `box_id` is present iff the bitmap is opaque.
    TiledBitmap {
        bitmap: B,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        flags: TileFlags,
        box_id: Option<BoxId>,
    },
    GroupStart {
        name: String,
    },
    GroupEnd,
}
