//! The primitive draw surface the renderer targets.
//!
//! Method set and argument order follow the TFT driver API the firmware
//! runs on: all coordinates are device pixels, all colors packed RGB565.

use pixel_core::{Bounds, PackedColor};

/// A device pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Raster primitives.
///
/// Implementations own clipping. Out-of-range or degenerate arguments must
/// be ignored or clipped, never panic.
pub trait Surface {
    /// Fill the entire surface.
    fn fill_screen(&mut self, color: PackedColor);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Bounds, color: PackedColor);

    /// Outline a rectangle, one pixel wide, inside the box.
    fn draw_rect(&mut self, rect: Bounds, color: PackedColor);

    /// Fill a rectangle with rounded corners.
    fn fill_round_rect(&mut self, rect: Bounds, radius: i32, color: PackedColor);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: i32, color: PackedColor);

    /// Outline a circle.
    fn draw_circle(&mut self, center: Point, radius: i32, color: PackedColor);

    /// Fill a triangle.
    fn fill_triangle(&mut self, vertices: [Point; 3], color: PackedColor);

    /// Color for subsequent text.
    fn set_text_color(&mut self, color: PackedColor);

    /// Integer glyph scale for subsequent text.
    fn set_text_size(&mut self, size: u8);

    /// Draw text with its top-left corner at `origin`.
    fn draw_string(&mut self, text: &str, origin: Point);

    /// Draw text horizontally centred on `anchor`, top edge at `anchor.y`.
    fn draw_centre_string(&mut self, text: &str, anchor: Point, datum: u8);

    /// Copy a `width` x `height` block of row-major pixels to `origin`.
    fn push_image(&mut self, origin: Point, width: u32, height: u32, pixels: &[PackedColor]);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_screen(&mut self, color: PackedColor) {
        (**self).fill_screen(color);
    }

    fn fill_rect(&mut self, rect: Bounds, color: PackedColor) {
        (**self).fill_rect(rect, color);
    }

    fn draw_rect(&mut self, rect: Bounds, color: PackedColor) {
        (**self).draw_rect(rect, color);
    }

    fn fill_round_rect(&mut self, rect: Bounds, radius: i32, color: PackedColor) {
        (**self).fill_round_rect(rect, radius, color);
    }

    fn fill_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        (**self).fill_circle(center, radius, color);
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        (**self).draw_circle(center, radius, color);
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], color: PackedColor) {
        (**self).fill_triangle(vertices, color);
    }

    fn set_text_color(&mut self, color: PackedColor) {
        (**self).set_text_color(color);
    }

    fn set_text_size(&mut self, size: u8) {
        (**self).set_text_size(size);
    }

    fn draw_string(&mut self, text: &str, origin: Point) {
        (**self).draw_string(text, origin);
    }

    fn draw_centre_string(&mut self, text: &str, anchor: Point, datum: u8) {
        (**self).draw_centre_string(text, anchor, datum);
    }

    fn push_image(&mut self, origin: Point, width: u32, height: u32, pixels: &[PackedColor]) {
        (**self).push_image(origin, width, height, pixels);
    }
}
