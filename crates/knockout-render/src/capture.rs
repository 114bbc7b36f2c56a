#![forbid(unsafe_code)]

//! Call-stream capture backend.
//!
//! `CapturePlotter` records every operation it receives as an owned
//! `PlotCall`. It is the kernel's golden-stream inspection tool: tests
//! replay a session into it and assert on exactly which calls came out
//! the other side, and applications can use it to dump a redraw pass.

use knockout_core::bitmap::{Bitmap, SolidBitmap, TileFlags};
use knockout_core::error::{PlotError, PlotResult};
use knockout_core::geometry::{Line, Point, Rect};
use knockout_core::style::{Colour, PlotStyle, TextStyle};

use crate::plotter::Plotter;

/// One captured plot operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCall<B> {
    Clear {
        colour: Colour,
    },
    Rectangle {
        style: PlotStyle,
        rect: Rect,
    },
    Line {
        style: PlotStyle,
        line: Line,
    },
    Polygon {
        style: PlotStyle,
        points: Vec<Point>,
    },
    Fill {
        colour: Colour,
        rect: Rect,
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
    Bitmap {
        bitmap: B,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
    },
    TiledBitmap {
        bitmap: B,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        flags: TileFlags,
    },
    GroupStart {
        name: String,
    },
    GroupEnd,
}

/// A backend that records its call stream instead of drawing.
#[derive(Debug, Clone)]
pub struct CapturePlotter<B = SolidBitmap> {
    calls: Vec<PlotCall<B>>,
    /// When set, bitmap operations fail as if the handle went stale.
    pub fail_bitmaps: bool,
}

impl<B> CapturePlotter<B> {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_bitmaps: false,
        }
    }

    /// The captured call stream, in arrival order.
    pub fn calls(&self) -> &[PlotCall<B>] {
        &self.calls
    }

    /// Consume the capture, yielding the call stream.
    pub fn into_calls(self) -> Vec<PlotCall<B>> {
        self.calls
    }

    /// Number of captured calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Check if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Rectangles of all captured opaque fills, in arrival order.
    pub fn fills(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PlotCall::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl<B> Default for CapturePlotter<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bitmap + Clone> Plotter for CapturePlotter<B> {
    type Bitmap = B;

    fn clear(&mut self, colour: Colour) -> PlotResult {
        self.calls.push(PlotCall::Clear { colour });
        Ok(())
    }

    fn rectangle(&mut self, style: &PlotStyle, rect: &Rect) -> PlotResult {
        self.calls.push(PlotCall::Rectangle {
            style: *style,
            rect: *rect,
        });
        Ok(())
    }

    fn line(&mut self, style: &PlotStyle, line: &Line) -> PlotResult {
        self.calls.push(PlotCall::Line {
            style: *style,
            line: *line,
        });
        Ok(())
    }

    fn polygon(&mut self, style: &PlotStyle, points: &[Point]) -> PlotResult {
        self.calls.push(PlotCall::Polygon {
            style: *style,
            points: points.to_vec(),
        });
        Ok(())
    }

    fn fill(&mut self, colour: Colour, rect: &Rect) -> PlotResult {
        self.calls.push(PlotCall::Fill {
            colour,
            rect: *rect,
        });
        Ok(())
    }

    fn clip(&mut self, rect: &Rect) -> PlotResult {
        self.calls.push(PlotCall::Clip { rect: *rect });
        Ok(())
    }

    fn text(&mut self, style: &TextStyle, x: i32, y: i32, text: &str) -> PlotResult {
        self.calls.push(PlotCall::Text {
            style: *style,
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    fn disc(&mut self, style: &PlotStyle, x: i32, y: i32, radius: i32) -> PlotResult {
        self.calls.push(PlotCall::Disc {
            style: *style,
            x,
            y,
            radius,
        });
        Ok(())
    }

    fn arc(
        &mut self,
        style: &PlotStyle,
        x: i32,
        y: i32,
        radius: i32,
        angle1: i32,
        angle2: i32,
    ) -> PlotResult {
        self.calls.push(PlotCall::Arc {
            style: *style,
            x,
            y,
            radius,
            angle1,
            angle2,
        });
        Ok(())
    }

    fn bitmap(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
    ) -> PlotResult {
        if self.fail_bitmaps {
            return Err(PlotError::BitmapUnavailable);
        }
        self.calls.push(PlotCall::Bitmap {
            bitmap: bitmap.clone(),
            x,
            y,
            width,
            height,
            bg,
        });
        Ok(())
    }

    fn bitmap_tiled(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        flags: TileFlags,
    ) -> PlotResult {
        if self.fail_bitmaps {
            return Err(PlotError::BitmapUnavailable);
        }
        self.calls.push(PlotCall::TiledBitmap {
            bitmap: bitmap.clone(),
            x,
            y,
            width,
            height,
            bg,
            flags,
        });
        Ok(())
    }

    fn group_start(&mut self, name: &str) -> PlotResult {
        self.calls.push(PlotCall::GroupStart {
            name: name.to_string(),
        });
        Ok(())
    }

    fn group_end(&mut self) -> PlotResult {
        self.calls.push(PlotCall::GroupEnd);
        Ok(())
    }
}
