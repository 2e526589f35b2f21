//! Element dispatch: one decoded element to one surface primitive.
//!
//! This is the only place element geometry is interpreted. Document and
//! binary scenes both arrive here as [`Element`]s, which is what keeps the
//! two encodings pixel-identical.

use pixel_core::{Element, ElementKind};

use crate::surface::{Point, Surface};

/// Corner radius of `fillRoundRect`.
pub const ROUND_RECT_RADIUS: i32 = 8;

/// Datum argument passed with every centred label.
pub const CENTRE_STRING_DATUM: u8 = 2;

/// Element height per unit of text size.
pub const TEXT_SIZE_STEP: i32 = 8;

/// Text size for a box height: `max(1, h/8)`, saturating at 255.
#[must_use]
pub fn text_size(height: i32) -> u8 {
    u8::try_from((height / TEXT_SIZE_STEP).max(1)).unwrap_or(u8::MAX)
}

/// Draw a shape or text element.
///
/// Returns `false` without drawing for [`ElementKind::AssetImage`], which
/// needs storage and an image decoder; the renderer handles those.
pub fn draw_shape<S>(surface: &mut S, element: &Element) -> bool
where
    S: Surface + ?Sized,
{
    let b = element.bounds;
    let color = element.color;

    match element.kind {
        ElementKind::FillRect => surface.fill_rect(b, color),
        ElementKind::DrawRect => surface.draw_rect(b, color),
        ElementKind::FillRoundRect => surface.fill_round_rect(b, ROUND_RECT_RADIUS, color),
        ElementKind::FillCircle => surface.fill_circle(
            Point::new(b.center_x(), b.center_y()),
            b.inscribed_radius(),
            color,
        ),
        ElementKind::DrawCircle => surface.draw_circle(
            Point::new(b.center_x(), b.center_y()),
            b.inscribed_radius(),
            color,
        ),
        ElementKind::FillTriangle => surface.fill_triangle(
            [
                Point::new(b.center_x(), b.y),
                Point::new(b.x, b.bottom()),
                Point::new(b.right(), b.bottom()),
            ],
            color,
        ),
        ElementKind::DrawString => {
            surface.set_text_color(color);
            surface.set_text_size(text_size(b.h));
            surface.draw_string(&element.text, Point::new(b.x, b.y));
        }
        ElementKind::DrawCentreString => {
            surface.set_text_color(color);
            surface.set_text_size(text_size(b.h));
            surface.draw_centre_string(
                &element.text,
                Point::new(b.center_x(), b.y),
                CENTRE_STRING_DATUM,
            );
        }
        ElementKind::AssetImage => return false,
    }

    tracing::trace!(
        kind = %element.kind,
        x = b.x,
        y = b.y,
        w = b.w,
        h = b.h,
        color = %color,
        "Dispatched element"
    );
    true
}
