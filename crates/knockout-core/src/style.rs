#![forbid(unsafe_code)]

//! Plot styles: colours, stroke patterns, and text appearance.

/// A packed 32-bit colour, `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Colour = Colour::rgb(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Colour = Colour(0);

    /// Create a fully opaque colour from channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }

    /// Create a colour from channels including alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Colour(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(&self) -> u8 {
        self.0 as u8
    }

    /// Check if the colour has a fully opaque alpha channel.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a() == 0xFF
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::BLACK
    }
}

/// Dash pattern for stroked lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePattern {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

/// Stroke parameters for outlined shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub colour: Colour,
    /// Width in device pixels. Zero means hairline.
    pub width: i32,
    pub pattern: LinePattern,
}

impl Stroke {
    /// A solid single-pixel stroke.
    #[inline]
    pub const fn solid(colour: Colour) -> Self {
        Self {
            colour,
            width: 1,
            pattern: LinePattern::Solid,
        }
    }
}

/// Style for shape plotting: an optional fill and an optional stroke.
///
/// A shape plotted with both performs the fill first, then the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotStyle {
    pub fill: Option<Colour>,
    pub stroke: Option<Stroke>,
}

impl PlotStyle {
    /// A style that only fills.
    #[inline]
    pub const fn filled(colour: Colour) -> Self {
        Self {
            fill: Some(colour),
            stroke: None,
        }
    }

    /// A style that only strokes.
    #[inline]
    pub const fn stroked(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    /// This style with the stroke removed.
    #[inline]
    pub const fn fill_only(&self) -> Self {
        Self {
            fill: self.fill,
            stroke: None,
        }
    }

    /// This style with the fill removed.
    #[inline]
    pub const fn stroke_only(&self) -> Self {
        Self {
            fill: None,
            stroke: self.stroke,
        }
    }
}

/// Style for text plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub foreground: Colour,
    pub background: Colour,
    /// Nominal glyph size in device pixels.
    pub size: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            foreground: Colour::BLACK,
            background: Colour::WHITE,
            size: 16,
        }
    }
}
