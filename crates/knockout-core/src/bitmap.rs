#![forbid(unsafe_code)]

//! The bitmap capability consumed by the render kernel.
//!
//! The kernel never touches pixel data. All it needs from an image handle
//! is its size, whether every pixel is fully opaque (opaque bitmaps take
//! part in knockout), and, for 1×1 bitmaps, the single pixel colour so
//! the solid-colour-as-image idiom can be rewritten as a flat fill.

use bitflags::bitflags;

use crate::style::Colour;

bitflags! {
    /// Tiling behaviour for `bitmap_tiled`.
    ///
    /// A set axis repeats the image across the current clip rectangle in
    /// that direction; an unset axis plots a single image extent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        const REPEAT_X = 1 << 0;
        const REPEAT_Y = 1 << 1;
    }
}

/// Read-only image handle capability.
pub trait Bitmap {
    /// Width of the source image in pixels.
    fn width(&self) -> u32;

    /// Height of the source image in pixels.
    fn height(&self) -> u32;

    /// True when every pixel of the image is fully opaque.
    fn is_opaque(&self) -> bool;

    /// The image's colour, when the whole image is a single colour.
    ///
    /// Implementations should report this at least for 1×1 images; the
    /// default conservatively reports nothing.
    fn solid_colour(&self) -> Option<Colour> {
        None
    }
}

/// A bitmap that is one colour everywhere.
///
/// Useful in tests and for callers that push flat colours through the
/// bitmap path (commonly as a stretched 1×1 image).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBitmap {
    pub colour: Colour,
    pub width: u32,
    pub height: u32,
}

impl SolidBitmap {
    /// Create a solid bitmap of the given size.
    pub const fn new(colour: Colour, width: u32, height: u32) -> Self {
        Self {
            colour,
            width,
            height,
        }
    }

    /// Create a 1×1 solid bitmap.
    pub const fn pixel(colour: Colour) -> Self {
        Self::new(colour, 1, 1)
    }
}

impl Bitmap for SolidBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_opaque(&self) -> bool {
        self.colour.is_opaque()
    }

    fn solid_colour(&self) -> Option<Colour> {
        Some(self.colour)
    }
}
