#![forbid(unsafe_code)]

//! The recording session: intercept, record, replay.
//!
//! A `KnockoutPlotter` owns the real backend for the duration of one
//! redraw pass and implements `Plotter` itself, so the pass plots into
//! it without knowing the difference. Every call becomes a `DrawEntry`;
//! opaque fills and opaque bitmaps additionally register with the
//! occlusion tracker. `finish()` (or an arena overflow) replays the
//! stream against the real backend with occluded paint dropped or
//! trimmed, then resets the arenas.
//!
//! Ownership doubles as session discipline: constructing the session
//! consumes the backend and `finish()` gives it back, so two sessions
//! over one backend cannot coexist and a session cannot outlive its
//! backend.

#[cfg(feature = "tracing")]
use tracing::{trace, warn};

use knockout_core::bitmap::{Bitmap, TileFlags};
use knockout_core::error::{PlotError, PlotResult};
use knockout_core::geometry::{Line, Point, Rect};
use knockout_core::style::{Colour, PlotStyle, TextStyle};

use crate::arena::{CapacityExceeded, CoordPool, Pool};
use crate::entry::DrawEntry;
use crate::occlusion::{BoxId, OcclusionTracker};
use crate::plotter::Plotter;

/// Arena bounds for one session.
///
/// The defaults fit a busy page redraw; smaller bounds simply flush more
/// often. Recording never allocates past these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnockoutConfig {
    /// Maximum recorded calls between flushes.
    pub max_entries: usize,
    /// Maximum occlusion boxes, roots and fragments together.
    pub max_boxes: usize,
    /// Maximum buffered polygon vertices.
    pub max_polygon_points: usize,
}

impl Default for KnockoutConfig {
    fn default() -> Self {
        Self {
            max_entries: 3072,
            max_boxes: 768,
            max_polygon_points: 1536,
        }
    }
}

/// A recording plotter wrapped around a real backend.
pub struct KnockoutPlotter<P: Plotter> {
    real: P,
    entries: Pool<DrawEntry<P::Bitmap>>,
    coords: CoordPool,
    occlusion: OcclusionTracker,
    /// Most recent clip rectangle; fills and bitmaps are bounded by it
    /// at record time. Starts empty, so paint before the first `clip`
    /// call records nothing.
    clip: Rect,
}

impl<P: Plotter> KnockoutPlotter<P> {
    /// Start a session over `real` with default arena bounds.
    pub fn new(real: P) -> Self {
        Self::with_config(real, KnockoutConfig::default())
    }

    /// Start a session over `real` with explicit arena bounds.
    ///
    /// # Panics
    ///
    /// Panics if any bound is too small to record a single call: two
    /// entries (a bitmap entry plus its clip reassertion), five boxes
    /// (one insertion after a four-way split), and three polygon
    /// vertices.
    pub fn with_config(real: P, config: KnockoutConfig) -> Self {
        assert!(config.max_entries >= 2, "entry bound too small");
        assert!(config.max_boxes >= 5, "box bound too small");
        assert!(config.max_polygon_points >= 3, "polygon bound too small");
        Self {
            real,
            entries: Pool::new(config.max_entries),
            coords: CoordPool::new(config.max_polygon_points),
            occlusion: OcclusionTracker::new(config.max_boxes),
            clip: Rect::default(),
        }
    }

    /// Calls recorded since the last flush.
    pub fn pending_entries(&self) -> usize {
        self.entries.len()
    }

    /// The clip rectangle recording is currently bounded by.
    pub fn clip_rect(&self) -> Rect {
        self.clip
    }

    /// The occlusion forest, for inspection.
    pub fn tracker(&self) -> &OcclusionTracker {
        &self.occlusion
    }

    /// End the session: replay everything recorded and hand the real
    /// backend back together with the replay outcome.
    ///
    /// Replay always runs to completion and the arenas always reset;
    /// the result carries the first backend error if any occurred.
    pub fn finish(mut self) -> (P, PlotResult) {
        let res = self.flush();
        (self.real, res)
    }

    /// Replay the recorded stream against the real backend and reset
    /// all arenas.
    ///
    /// Entries are replayed in recorded order. Occlusion entries
    /// consult their box: deleted boxes are dropped, split boxes emit
    /// one call per visible leaf, untouched boxes forward as recorded.
    /// Backend errors do not stop the replay; the first one is
    /// returned once the pass is complete.
    pub fn flush(&mut self) -> PlotResult {
        #[cfg(feature = "tracing")]
        trace!(
            entries = self.entries.len(),
            boxes = self.occlusion.len(),
            vertices = self.coords.len(),
            "knockout flush"
        );

        let mut first: Option<PlotError> = None;
        let Self {
            real,
            entries,
            coords,
            occlusion,
            ..
        } = self;

        for entry in entries.iter() {
            let res = match entry {
                DrawEntry::Rectangle { style, rect } => real.rectangle(style, rect),
                DrawEntry::Line { style, line } => real.line(style, line),
                DrawEntry::Polygon { style, span } => real.polygon(style, coords.get(*span)),
                DrawEntry::Fill {
                    colour,
                    rect,
                    box_id,
                } => replay_fill(real, occlusion, *box_id, *colour, rect),
                DrawEntry::Clip { rect } => real.clip(rect),
                DrawEntry::Text { style, x, y, text } => real.text(style, *x, *y, text),
                DrawEntry::Disc {
                    style,
                    x,
                    y,
                    radius,
                } => real.disc(style, *x, *y, *radius),
                DrawEntry::Arc {
                    style,
                    x,
                    y,
                    radius,
                    angle1,
                    angle2,
                } => real.arc(style, *x, *y, *radius, *angle1, *angle2),
                DrawEntry::Bitmap {
                    bitmap,
                    x,
                    y,
                    width,
                    height,
                    bg,
                    box_id,
                } => replay_bitmap(real, occlusion, *box_id, |real| {
                    real.bitmap(bitmap, *x, *y, *width, *height, *bg)
                }),
                DrawEntry::TiledBitmap {
                    bitmap,
                    x,
                    y,
                    width,
                    height,
                    bg,
                    flags,
                    box_id,
                } => replay_bitmap(real, occlusion, *box_id, |real| {
                    real.bitmap_tiled(bitmap, *x, *y, *width, *height, *bg, *flags)
                }),
                DrawEntry::GroupStart { name } => real.group_start(name),
                DrawEntry::GroupEnd => real.group_end(),
            };
            remember(&mut first, res);
        }

        self.entries.reset();
        self.coords.reset();
        self.occlusion.reset();

        first.map_or(Ok(()), Err)
    }

    /// Append an entry, flushing first if the log is full.
    fn append(&mut self, entry: DrawEntry<P::Bitmap>) -> PlotResult {
        match self.entries.push(entry) {
            Ok(_) => Ok(()),
            Err(entry) => {
                let res = self.flush();
                // The freshly reset log always has room (the bound is
                // checked at construction).
                let pushed = self.entries.push(entry);
                debug_assert!(pushed.is_ok());
                res
            }
        }
    }

    /// Record an opaque fill of `rect`, clipped to the current clip.
    ///
    /// The clipped rectangle both knocks out earlier paint and joins
    /// the forest as a fresh root. A fill entirely outside the clip
    /// records nothing.
    fn record_fill(&mut self, colour: Colour, rect: &Rect) -> PlotResult {
        let Some(k) = rect.intersection(&self.clip) else {
            return Ok(());
        };

        let mut res = Ok(());
        if self.entries.is_full() {
            res = self.flush();
        }
        let box_id = match self.occlusion.register_opaque(&k) {
            Ok(id) => id,
            Err(CapacityExceeded) => {
                let flush_res = self.flush();
                if res.is_ok() {
                    res = flush_res;
                }
                match self.occlusion.register_opaque(&k) {
                    Ok(id) => id,
                    // Unreachable with the construction-time bounds; a
                    // register on an empty tracker needs one box.
                    Err(CapacityExceeded) => {
                        return Err(PlotError::backend("occlusion pool exhausted after flush"));
                    }
                }
            }
        };
        let pushed = self.entries.push(DrawEntry::Fill {
            colour,
            rect: k,
            box_id,
        });
        debug_assert!(pushed.is_ok());
        res
    }

    /// The clip-bounded extent a bitmap plot will cover.
    ///
    /// A repeating axis spans the whole clip; a non-repeating axis is
    /// bounded by the image placement. `None` when nothing is covered.
    fn bitmap_bounds(&self, x: i32, y: i32, width: i32, height: i32, flags: TileFlags) -> Option<Rect> {
        let mut k = self.clip;
        if !flags.contains(TileFlags::REPEAT_X) {
            k.x0 = k.x0.max(x);
            k.x1 = k.x1.min(x + width);
        }
        if !flags.contains(TileFlags::REPEAT_Y) {
            k.y0 = k.y0.max(y);
            k.y1 = k.y1.min(y + height);
        }
        if k.is_empty() { None } else { Some(k) }
    }

    /// Record a bitmap plot; `tiled` distinguishes the two entry forms.
    fn record_bitmap(
        &mut self,
        bitmap: &P::Bitmap,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bg: Colour,
        tiled: Option<TileFlags>,
    ) -> PlotResult {
        let flags = tiled.unwrap_or_else(TileFlags::empty);
        let Some(k) = self.bitmap_bounds(x, y, width, height, flags) else {
            return Ok(());
        };

        // Solid-colour-as-image idiom: a 1x1 opaque bitmap stretched or
        // tiled over its extent is a flat fill, so record it as one.
        if bitmap.width() == 1 && bitmap.height() == 1 && bitmap.is_opaque() {
            if let Some(colour) = bitmap.solid_colour() {
                return self.record_fill(colour, &k);
            }
        }

        let opaque = bitmap.is_opaque();
        let mut res = Ok(());
        // Room for the bitmap entry plus the clip reassertion below.
        if self.entries.remaining() < 2 {
            res = self.flush();
        }

        // Opaque bitmaps both knock out and get knocked out; anything
        // with transparency must replay in full and takes no box.
        let box_id = if opaque {
            match self.occlusion.register_opaque(&k) {
                Ok(id) => Some(id),
                Err(CapacityExceeded) => {
                    let flush_res = self.flush();
                    if res.is_ok() {
                        res = flush_res;
                    }
                    match self.occlusion.register_opaque(&k) {
                        Ok(id) => Some(id),
                        Err(CapacityExceeded) => {
                            return Err(PlotError::backend(
                                "occlusion pool exhausted after flush",
                            ));
                        }
                    }
                }
            }
        } else {
            None
        };

        let entry = match tiled {
            Some(flags) => DrawEntry::TiledBitmap {
                bitmap: bitmap.clone(),
                x,
                y,
                width,
                height,
                bg,
                flags,
                box_id,
            },
            None => DrawEntry::Bitmap {
                bitmap: bitmap.clone(),
                x,
                y,
                width,
                height,
                bg,
                box_id,
            },
        };
        let pushed = self.entries.push(entry);
        debug_assert!(pushed.is_ok());

        if box_id.is_some() {
            // Replaying fragments of a split bitmap moves the real clip
            // around; reassert the recorded clip for what follows.
            let pushed = self.entries.push(DrawEntry::Clip { rect: self.clip });
            debug_assert!(pushed.is_ok());
        }
        res
    }
}

impl<P: Plotter> Plotter for KnockoutPlotter<P> {
    type Bitmap = P::Bitmap;

    /// A clear is, for occlusion purposes, one big opaque fill of the
    /// clip rectangle, and is recorded as exactly that.
    fn clear(&mut self, colour: Colour) -> PlotResult {
        let clip = self.clip;
        self.record_fill(colour, &clip)
    }

    fn rectangle(&mut self, style: &PlotStyle, rect: &Rect) -> PlotResult {
        let mut first = None;
        if let Some(colour) = style.fill {
            if colour.is_opaque() {
                // The fill half knocks out and gets knocked out.
                remember(&mut first, self.record_fill(colour, rect));
            } else {
                remember(
                    &mut first,
                    self.append(DrawEntry::Rectangle {
                        style: style.fill_only(),
                        rect: *rect,
                    }),
                );
            }
        }
        if style.stroke.is_some() {
            remember(
                &mut first,
                self.append(DrawEntry::Rectangle {
                    style: style.stroke_only(),
                    rect: *rect,
                }),
            );
        }
        first.map_or(Ok(()), Err)
    }

    fn line(&mut self, style: &PlotStyle, line: &Line) -> PlotResult {
        self.append(DrawEntry::Line {
            style: *style,
            line: *line,
        })
    }

    fn polygon(&mut self, style: &PlotStyle, points: &[Point]) -> PlotResult {
        // A polygon that cannot fit even an empty pool is flushed past
        // and drawn directly.
        if !self.coords.fits(points.len()) {
            let mut first = None;
            remember(&mut first, self.flush());
            remember(&mut first, self.real.polygon(style, points));
            return first.map_or(Ok(()), Err);
        }

        let mut res = Ok(());
        if self.entries.is_full() {
            res = self.flush();
        }
        let span = match self.coords.alloc(points) {
            Some(span) => span,
            None => {
                let flush_res = self.flush();
                if res.is_ok() {
                    res = flush_res;
                }
                match self.coords.alloc(points) {
                    Some(span) => span,
                    None => {
                        return Err(PlotError::backend("coordinate pool exhausted after flush"));
                    }
                }
            }
        };
        let pushed = self.entries.push(DrawEntry::Polygon { style: *style, span });
        debug_assert!(pushed.is_ok());
        res
    }

    fn fill(&mut self, colour: Colour, rect: &Rect) -> PlotResult {
        self.record_fill(colour, rect)
    }

    fn clip(&mut self, rect: &Rect) -> PlotResult {
        if !rect.is_valid() {
            #[cfg(feature = "tracing")]
            warn!(
                x0 = rect.x0,
                y0 = rect.y0,
                x1 = rect.x1,
                y1 = rect.y1,
                "rejected clip rectangle"
            );
            return Err(PlotError::BadClip(*rect));
        }
        self.clip = *rect;
        self.append(DrawEntry::Clip { rect: *rect })
    }

    fn text(&mut self, style: &TextStyle, x: i32, y: i32, text: &str) -> PlotResult {
        self.append(DrawEntry::Text {
            style: *style,
            x,
            y,
            text: text.to_string(),
        })
    }

    fn disc(&mut self, style: &PlotStyle, x: i32, y: i32, radius: i32) -> PlotResult {
        self.append(DrawEntry::Disc {
            style: *style,
            x,
            y,
            radius,
        })
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
        self.append(DrawEntry::Arc {
            style: *style,
            x,
            y,
            radius,
            angle1,
            angle2,
        })
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
        self.record_bitmap(bitmap, x, y, width, height, bg, None)
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
        self.record_bitmap(bitmap, x, y, width, height, bg, Some(flags))
    }

    fn group_start(&mut self, name: &str) -> PlotResult {
        self.append(DrawEntry::GroupStart {
            name: name.to_string(),
        })
    }

    fn group_end(&mut self) -> PlotResult {
        self.append(DrawEntry::GroupEnd)
    }
}

/// Keep the first error, let later ones pass.
fn remember(first: &mut Option<PlotError>, res: PlotResult) {
    if first.is_none() {
        if let Err(e) = res {
            *first = Some(e);
        }
    }
}

/// Replay one fill entry through its occlusion box.
fn replay_fill<P: Plotter>(
    real: &mut P,
    occlusion: &OcclusionTracker,
    box_id: BoxId,
    colour: Colour,
    rect: &Rect,
) -> PlotResult {
    let node = occlusion.node(box_id);
    if node.deleted {
        return Ok(());
    }
    match node.child {
        Some(child) => {
            let mut first = None;
            occlusion.for_each_visible_leaf(child, &mut |leaf| {
                remember(&mut first, real.fill(colour, leaf));
            });
            first.map_or(Ok(()), Err)
        }
        None => real.fill(colour, rect),
    }
}

/// Replay one bitmap entry through its occlusion box, if it has one.
///
/// Fragments are emitted by narrowing the real clip to each surviving
/// leaf and reissuing the original call; the recorded stream carries a
/// clip reassertion straight after, restoring the session clip.
fn replay_bitmap<P: Plotter>(
    real: &mut P,
    occlusion: &OcclusionTracker,
    box_id: Option<BoxId>,
    mut draw: impl FnMut(&mut P) -> PlotResult,
) -> PlotResult {
    let Some(box_id) = box_id else {
        return draw(real);
    };
    let node = occlusion.node(box_id);
    if node.deleted {
        return Ok(());
    }
    match node.child {
        Some(child) => {
            let mut first = None;
            occlusion.for_each_visible_leaf(child, &mut |leaf| {
                remember(&mut first, real.clip(leaf));
                remember(&mut first, draw(real));
            });
            first.map_or(Ok(()), Err)
        }
        None => draw(real),
    }
}
