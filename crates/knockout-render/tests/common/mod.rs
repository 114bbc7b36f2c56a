#![allow(dead_code)]

//! Shared test backend: a tiny software raster canvas.
//!
//! Deliberately simple plotting — text, lines, discs and arcs get crude
//! deterministic footprints. That is enough for equivalence testing:
//! both the direct and the knockout path drive the same canvas, so any
//! divergence in the final pixels is the engine's doing.

use knockout_core::bitmap::{Bitmap, SolidBitmap, TileFlags};
use knockout_core::error::PlotResult;
use knockout_core::geometry::{Line, Point, Rect};
use knockout_core::style::{Colour, PlotStyle, TextStyle};
use knockout_render::plotter::Plotter;

pub struct PixelCanvas {
    pub width: i32,
    pub height: i32,
    pub pixels: Vec<u32>,
    clip: Rect,
}

impl PixelCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            clip: Rect::from_size(width, height),
        }
    }

    fn paint(&mut self, rect: &Rect, colour: Colour) {
        let bounds = Rect::from_size(self.width, self.height);
        let Some(r) = rect
            .intersection(&self.clip)
            .and_then(|r| r.intersection(&bounds))
        else {
            return;
        };
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                self.pixels[(y * self.width + x) as usize] = colour.0;
            }
        }
    }
}

impl Plotter for PixelCanvas {
    type Bitmap = SolidBitmap;

    fn clear(&mut self, colour: Colour) -> PlotResult {
        let clip = self.clip;
        self.paint(&clip, colour);
        Ok(())
    }

    fn rectangle(&mut self, style: &PlotStyle, rect: &Rect) -> PlotResult {
        if let Some(colour) = style.fill {
            self.paint(rect, colour);
        }
        if let Some(stroke) = style.stroke {
            // 1px outline regardless of the stroke width.
            self.paint(&Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + 1), stroke.colour);
            self.paint(&Rect::new(rect.x0, rect.y1 - 1, rect.x1, rect.y1), stroke.colour);
            self.paint(&Rect::new(rect.x0, rect.y0, rect.x0 + 1, rect.y1), stroke.colour);
            self.paint(&Rect::new(rect.x1 - 1, rect.y0, rect.x1, rect.y1), stroke.colour);
        }
        Ok(())
    }

    fn line(&mut self, style: &PlotStyle, line: &Line) -> PlotResult {
        // Bounding-box footprint; deterministic is all that matters.
        if let Some(stroke) = style.stroke {
            let r = Rect::new(
                line.x0.min(line.x1),
                line.y0.min(line.y1),
                line.x0.max(line.x1) + 1,
                line.y0.max(line.y1) + 1,
            );
            self.paint(&r, stroke.colour);
        }
        Ok(())
    }

    fn polygon(&mut self, style: &PlotStyle, points: &[Point]) -> PlotResult {
        if let Some(colour) = style.fill {
            let mut r = Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
            for p in points {
                r.x0 = r.x0.min(p.x);
                r.y0 = r.y0.min(p.y);
                r.x1 = r.x1.max(p.x);
                r.y1 = r.y1.max(p.y);
            }
            if !points.is_empty() {
                self.paint(&r, colour);
            }
        }
        Ok(())
    }

    fn fill(&mut self, colour: Colour, rect: &Rect) -> PlotResult {
        self.paint(rect, colour);
        Ok(())
    }

    fn clip(&mut self, rect: &Rect) -> PlotResult {
        self.clip = *rect;
        Ok(())
    }

    fn text(&mut self, style: &TextStyle, x: i32, y: i32, text: &str) -> PlotResult {
        let w = 8 * text.chars().count() as i32;
        self.paint(&Rect::new(x, y, x + w, y + style.size), style.foreground);
        Ok(())
    }

    fn disc(&mut self, style: &PlotStyle, x: i32, y: i32, radius: i32) -> PlotResult {
        if let Some(colour) = style.fill {
            self.paint(
                &Rect::new(x - radius, y - radius, x + radius, y + radius),
                colour,
            );
        }
        Ok(())
    }

    fn arc(
        &mut self,
        style: &PlotStyle,
        x: i32,
        y: i32,
        _radius: i32,
        _angle1: i32,
        _angle2: i32,
    ) -> PlotResult {
        if let Some(stroke) = style.stroke {
            self.paint(&Rect::new(x, y, x + 1, y + 1), stroke.colour);
        }
        Ok(())
    }

    fn bitmap(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _bg: Colour,
    ) -> PlotResult {
        self.paint(&Rect::new(x, y, x + width, y + height), bitmap.colour);
        Ok(())
    }

    fn bitmap_tiled(
        &mut self,
        bitmap: &Self::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _bg: Colour,
        flags: TileFlags,
    ) -> PlotResult {
        let mut r = self.clip;
        if !flags.contains(TileFlags::REPEAT_X) {
            r.x0 = r.x0.max(x);
            r.x1 = r.x1.min(x + width);
        }
        if !flags.contains(TileFlags::REPEAT_Y) {
            r.y0 = r.y0.max(y);
            r.y1 = r.y1.min(y + height);
        }
        self.paint(&r, bitmap.colour);
        Ok(())
    }
}

/// A brute-force union area over a coarse grid, for property checks.
pub fn union_area(rects: &[Rect], width: i32, height: i32) -> u64 {
    let mut covered = vec![false; (width * height) as usize];
    for r in rects {
        let clipped = Rect::new(
            r.x0.clamp(0, width),
            r.y0.clamp(0, height),
            r.x1.clamp(0, width),
            r.y1.clamp(0, height),
        );
        for y in clipped.y0..clipped.y1 {
            for x in clipped.x0..clipped.x1 {
                covered[(y * width + x) as usize] = true;
            }
        }
    }
    covered.iter().filter(|c| **c).count() as u64
}
