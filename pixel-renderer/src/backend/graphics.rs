//! `embedded-graphics` backend.
//!
//! [`GraphicsSurface`] maps the TFT primitive set onto any RGB565
//! [`DrawTarget`]. [`Framebuffer`] is an in-memory target sized like the
//! device panel, used for host previews.

use std::convert::Infallible;
use std::fmt::Debug;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, OriginDimensions, Point as GfxPoint, Size};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::primitives::{
    Circle, Primitive, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
    StrokeAlignment, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::{Drawable, Pixel};
use pixel_core::{Bounds, PackedColor};

use crate::surface::{Point, Surface};

/// Panel width in pixels.
pub const DISPLAY_WIDTH: u32 = 240;

/// Panel height in pixels.
pub const DISPLAY_HEIGHT: u32 = 240;

/// Convert a packed color to an `embedded-graphics` color.
#[must_use]
pub fn to_rgb565(color: PackedColor) -> Rgb565 {
    Rgb565::new(color.red5(), color.green6(), color.blue5())
}

/// Convert an `embedded-graphics` color to a packed color.
#[must_use]
pub fn from_rgb565(color: Rgb565) -> PackedColor {
    PackedColor::from_raw(
        (u16::from(color.r()) << 11) | (u16::from(color.g()) << 5) | u16::from(color.b()),
    )
}

/// Shapes reaching no further than this beyond the target are drawn with
/// `embedded-graphics` primitives. Larger ones are rasterized row by row,
/// visiting only the visible rows.
const PRIMITIVE_MARGIN: i64 = 4096;

fn gfx_point(p: Point) -> GfxPoint {
    GfxPoint::new(p.x, p.y)
}

/// Circle for a center and radius, `None` when the radius is negative.
fn circle(center: Point, radius: i32) -> Option<Circle> {
    let r = u32::try_from(radius).ok()?;
    Some(Circle::with_center(
        gfx_point(center),
        r.saturating_mul(2).saturating_add(1),
    ))
}

fn report<E: Debug>(result: Result<(), E>, primitive: &'static str) {
    if let Err(e) = result {
        tracing::warn!(primitive, "Draw target error: {:?}", e);
    }
}

/// Integer square root, rounded down.
fn isqrt(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Axis-aligned area in wide coordinates. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Region {
    fn of(rect: &Rectangle) -> Self {
        let left = i64::from(rect.top_left.x);
        let top = i64::from(rect.top_left.y);
        Self {
            left,
            top,
            right: left + i64::from(rect.size.width),
            bottom: top + i64::from(rect.size.height),
        }
    }

    fn from_bounds(b: Bounds) -> Self {
        let left = i64::from(b.x);
        let top = i64::from(b.y);
        Self {
            left,
            top,
            right: left + i64::from(b.w),
            bottom: top + i64::from(b.h),
        }
    }

    /// Inclusive corner points.
    fn spanning(points: &[(i64, i64)]) -> Option<Self> {
        let left = points.iter().map(|p| p.0).min()?;
        let top = points.iter().map(|p| p.1).min()?;
        let right = points.iter().map(|p| p.0).max()? + 1;
        let bottom = points.iter().map(|p| p.1).max()? + 1;
        Some(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    fn intersect(&self, other: &Self) -> Option<Self> {
        let clipped = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (!clipped.is_empty()).then_some(clipped)
    }

    fn grow(&self, margin: i64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// `None` when empty or when the far corner does not fit in `i32`.
    fn to_rectangle(self) -> Option<Rectangle> {
        if self.is_empty() {
            return None;
        }
        i32::try_from(self.right - 1).ok()?;
        i32::try_from(self.bottom - 1).ok()?;
        Some(Rectangle::new(
            GfxPoint::new(i32::try_from(self.left).ok()?, i32::try_from(self.top).ok()?),
            Size::new(
                u32::try_from(self.right - self.left).ok()?,
                u32::try_from(self.bottom - self.top).ok()?,
            ),
        ))
    }
}

/// Up to two inclusive column spans covered on one row.
type RowSpans = [Option<(i64, i64)>; 2];

/// Columns of a filled circle on row `y`.
fn disc_span(cx: i64, cy: i64, r: i64, y: i64) -> Option<(i64, i64)> {
    let dy = y - cy;
    if dy.abs() > r {
        return None;
    }
    let half = isqrt(r * r - dy * dy);
    Some((cx - half, cx + half))
}

/// Columns of a one-pixel ring on row `y`: points with `(r-1)^2 < d^2 <= r^2`.
fn ring_spans(cx: i64, cy: i64, r: i64, y: i64) -> RowSpans {
    let Some((left, right)) = disc_span(cx, cy, r, y) else {
        return [None, None];
    };
    match disc_span(cx, cy, r - 1, y) {
        Some((inner_left, inner_right)) => [
            (inner_left > left).then_some((left, inner_left - 1)),
            (right > inner_right).then_some((inner_right + 1, right)),
        ],
        None => [Some((left, right)), None],
    }
}

/// Columns of a rounded rectangle on row `y`.
fn rounded_span(area: Region, r: i64, y: i64) -> Option<(i64, i64)> {
    if y < area.top || y >= area.bottom {
        return None;
    }
    let depth = if y < area.top + r {
        area.top + r - y
    } else if y >= area.bottom - r {
        y - (area.bottom - 1 - r)
    } else {
        0
    };
    let inset = if depth > 0 {
        r - isqrt(r * r - depth * depth)
    } else {
        0
    };
    Some((area.left + inset, area.right - 1 - inset))
}

/// Columns of a filled triangle on row `y`, edges inclusive.
fn triangle_span(vertices: &[(i64, i64); 3], y: i64) -> Option<(i64, i64)> {
    let mut span: Option<(i64, i64)> = None;
    let mut include = |x: i64| {
        span = Some(span.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
    };
    let [first, second, third] = *vertices;
    for (mut start, mut end) in [(first, second), (second, third), (third, first)] {
        if start.1 > end.1 {
            std::mem::swap(&mut start, &mut end);
        }
        if y < start.1 || y > end.1 {
            continue;
        }
        if start.1 == end.1 {
            include(start.0);
            include(end.0);
            continue;
        }
        let offset = (i128::from(y - start.1) * i128::from(end.0 - start.0))
            .div_euclid(i128::from(end.1 - start.1));
        if let Ok(column) = i64::try_from(i128::from(start.0) + offset) {
            include(column);
        }
    }
    span
}

/// TFT-style surface over an RGB565 draw target.
///
/// Geometry is clipped in wide coordinates before it reaches the target, so
/// any `i32` input is safe and costs at most the visible area.
pub struct GraphicsSurface<D> {
    target: D,
    text_color: Rgb565,
    text_size: u8,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    /// Wrap a draw target. Text starts white at size 1.
    #[must_use]
    pub fn new(target: D) -> Self {
        Self {
            target,
            text_color: Rgb565::WHITE,
            text_size: 1,
        }
    }

    /// The draw target.
    #[must_use]
    pub fn target(&self) -> &D {
        &self.target
    }

    /// The draw target, mutably.
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Consume the surface, returning the draw target.
    #[must_use]
    pub fn into_inner(self) -> D {
        self.target
    }

    fn visible(&self) -> Region {
        Region::of(&self.target.bounding_box())
    }

    /// Whether `shape` is small enough for `embedded-graphics` primitives.
    fn within_reach(&self, shape: &Region) -> bool {
        self.visible().grow(PRIMITIVE_MARGIN).contains(shape)
    }

    fn fill_region(&mut self, area: Region, color: Rgb565) -> Result<(), D::Error> {
        match area.intersect(&self.visible()).and_then(Region::to_rectangle) {
            Some(rect) => self.target.fill_solid(&rect, color),
            None => Ok(()),
        }
    }

    /// Fill the spans `row` yields for every visible row of `shape`.
    fn fill_rows<F>(&mut self, shape: Region, color: Rgb565, mut row: F) -> Result<(), D::Error>
    where
        F: FnMut(i64) -> RowSpans,
    {
        let Some(rows) = shape.intersect(&self.visible()) else {
            return Ok(());
        };
        for y in rows.top..rows.bottom {
            for (left, right) in row(y).into_iter().flatten() {
                self.fill_region(
                    Region {
                        left,
                        top: y,
                        right: right + 1,
                        bottom: y + 1,
                    },
                    color,
                )?;
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, origin: Point, alignment: Alignment) {
        let scale = self.text_size.max(1);
        let chars = i64::try_from(text.chars().count()).unwrap_or(i64::MAX);
        let width = chars
            .saturating_mul(i64::from(FONT_6X10.character_size.width))
            .saturating_mul(i64::from(scale));
        let height = i64::from(FONT_6X10.character_size.height) * i64::from(scale);
        let left = match alignment {
            Alignment::Center => i64::from(origin.x) - width / 2,
            Alignment::Right => i64::from(origin.x) - width,
            Alignment::Left => i64::from(origin.x),
        };
        let extent = Region {
            left,
            top: i64::from(origin.y),
            right: left.saturating_add(width),
            bottom: i64::from(origin.y) + height,
        };
        if extent.intersect(&self.visible()).is_none() || extent.to_rectangle().is_none() {
            tracing::trace!(x = origin.x, y = origin.y, "Text outside target, skipped");
            return;
        }

        let character_style = MonoTextStyle::new(&FONT_6X10, self.text_color);
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();
        let anchor = gfx_point(origin);
        let mut scaled = Scaled {
            target: &mut self.target,
            anchor,
            scale: i64::from(scale),
        };
        let result = Text::with_text_style(text, anchor, character_style, text_style)
            .draw(&mut scaled)
            .map(|_| ());
        report(result, "text");
    }
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    fn fill_screen(&mut self, color: PackedColor) {
        report(self.target.clear(to_rgb565(color)), "fillScreen");
    }

    fn fill_rect(&mut self, rect: Bounds, color: PackedColor) {
        report(
            self.fill_region(Region::from_bounds(rect), to_rgb565(color)),
            "fillRect",
        );
    }

    fn draw_rect(&mut self, rect: Bounds, color: PackedColor) {
        let area = Region::from_bounds(rect);
        if area.is_empty() {
            return;
        }
        let color = to_rgb565(color);
        let edges = [
            Region {
                bottom: area.top + 1,
                ..area
            },
            Region {
                top: area.bottom - 1,
                ..area
            },
            Region {
                top: area.top + 1,
                bottom: area.bottom - 1,
                right: area.left + 1,
                ..area
            },
            Region {
                top: area.top + 1,
                bottom: area.bottom - 1,
                left: area.right - 1,
                ..area
            },
        ];
        let result = edges
            .into_iter()
            .try_for_each(|edge| self.fill_region(edge, color));
        report(result, "drawRect");
    }

    fn fill_round_rect(&mut self, rect: Bounds, radius: i32, color: PackedColor) {
        let area = Region::from_bounds(rect);
        if area.intersect(&self.visible()).is_none() {
            return;
        }
        let max = (area.right - area.left).min(area.bottom - area.top) / 2;
        let r = i64::from(radius.max(0)).min(max);
        let color = to_rgb565(color);

        let result = match area.to_rectangle() {
            Some(shape) if self.within_reach(&area) => {
                let corner = u32::try_from(r).unwrap_or(0);
                RoundedRectangle::with_equal_corners(shape, Size::new(corner, corner))
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(&mut self.target)
            }
            _ => self.fill_rows(area, color, |y| [rounded_span(area, r, y), None]),
        };
        report(result, "fillRoundRect");
    }

    fn fill_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        if radius < 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
        let area = Region::spanning(&[(cx - r, cy - r), (cx + r, cy + r)]);
        let Some(area) = area.filter(|a| a.intersect(&self.visible()).is_some()) else {
            return;
        };
        let color = to_rgb565(color);

        let shape = if self.within_reach(&area) {
            circle(center, radius)
        } else {
            None
        };
        let result = match shape {
            Some(shape) => shape
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut self.target),
            None => self.fill_rows(area, color, |y| [disc_span(cx, cy, r, y), None]),
        };
        report(result, "fillCircle");
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        if radius < 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
        let area = Region::spanning(&[(cx - r, cy - r), (cx + r, cy + r)]);
        let Some(area) = area.filter(|a| a.intersect(&self.visible()).is_some()) else {
            return;
        };
        let color = to_rgb565(color);

        let shape = if self.within_reach(&area) {
            circle(center, radius)
        } else {
            None
        };
        let result = match shape {
            Some(shape) => {
                let style = PrimitiveStyleBuilder::new()
                    .stroke_color(color)
                    .stroke_width(1)
                    .stroke_alignment(StrokeAlignment::Inside)
                    .build();
                shape.into_styled(style).draw(&mut self.target)
            }
            None => self.fill_rows(area, color, |y| ring_spans(cx, cy, r, y)),
        };
        report(result, "drawCircle");
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], color: PackedColor) {
        let wide = vertices.map(|p| (i64::from(p.x), i64::from(p.y)));
        let Some(area) = Region::spanning(&wide) else {
            return;
        };
        if area.intersect(&self.visible()).is_none() {
            return;
        }
        let color = to_rgb565(color);

        let result = if self.within_reach(&area) {
            let [a, b, c] = vertices;
            Triangle::new(gfx_point(a), gfx_point(b), gfx_point(c))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut self.target)
        } else {
            self.fill_rows(area, color, |y| [triangle_span(&wide, y), None])
        };
        report(result, "fillTriangle");
    }

    fn set_text_color(&mut self, color: PackedColor) {
        self.text_color = to_rgb565(color);
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size;
    }

    fn draw_string(&mut self, text: &str, origin: Point) {
        self.draw_text(text, origin, Alignment::Left);
    }

    fn draw_centre_string(&mut self, text: &str, anchor: Point, _datum: u8) {
        self.draw_text(text, anchor, Alignment::Center);
    }

    fn push_image(&mut self, origin: Point, width: u32, height: u32, pixels: &[PackedColor]) {
        let (ox, oy) = (i64::from(origin.x), i64::from(origin.y));
        let area = Region {
            left: ox,
            top: oy,
            right: ox + i64::from(width),
            bottom: oy + i64::from(height),
        };
        let Some(clip) = area.intersect(&self.visible()) else {
            return;
        };
        let stride = i64::from(width);

        // Each visible row goes out separately so the source order survives clipping
        let result = (clip.top..clip.bottom).try_for_each(|y| {
            let row = Region {
                top: y,
                bottom: y + 1,
                ..clip
            };
            let (Some(rect), Ok(skip)) = (
                row.to_rectangle(),
                usize::try_from((y - oy) * stride + (clip.left - ox)),
            ) else {
                return Ok(());
            };
            let colors = pixels.iter().skip(skip).map(|p| to_rgb565(*p));
            self.target.fill_contiguous(&rect, colors)
        });
        report(result, "pushImage");
    }
}

/// Draw target adapter that magnifies every pixel into a square block,
/// anchored so `anchor` stays fixed.
struct Scaled<'a, D> {
    target: &'a mut D,
    anchor: GfxPoint,
    scale: i64,
}

impl<D: DrawTarget<Color = Rgb565>> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D: DrawTarget<Color = Rgb565>> DrawTarget for Scaled<'_, D> {
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        if self.scale == 1 {
            return self.target.draw_iter(pixels);
        }
        let visible = Region::of(&self.target.bounding_box());
        let (ax, ay) = (i64::from(self.anchor.x), i64::from(self.anchor.y));
        for Pixel(point, color) in pixels {
            let left = ax + (i64::from(point.x) - ax) * self.scale;
            let top = ay + (i64::from(point.y) - ay) * self.scale;
            let block = Region {
                left,
                top,
                right: left + self.scale,
                bottom: top + self.scale,
            };
            if let Some(rect) = block.intersect(&visible).and_then(Region::to_rectangle) {
                self.target.fill_solid(&rect, color)?;
            }
        }
        Ok(())
    }
}

/// In-memory RGB565 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    /// Create a black frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; len],
        }
    }

    /// Frame width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = u32::try_from(y).ok().filter(|y| *y < self.height)?;
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }

    /// Pixel at `(x, y)`, `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<PackedColor> {
        self.index(i64::from(x), i64::from(y))
            .and_then(|i| self.pixels.get(i))
            .map(|c| from_rgb565(*c))
    }

    /// Row-major packed pixels.
    #[must_use]
    pub fn packed(&self) -> impl Iterator<Item = PackedColor> + '_ {
        self.pixels.iter().map(|c| from_rgb565(*c))
    }

    /// Row-major RGB888 bytes, for image export.
    #[must_use]
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.packed()
            .flat_map(|c| {
                let rgb = c.to_rgb();
                [rgb.r, rgb.g, rgb.b]
            })
            .collect()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(i64::from(point.x), i64::from(point.y)) {
                if let Some(slot) = self.pixels.get_mut(i) {
                    *slot = color;
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(clip) = Region::of(area).intersect(&Region::of(&self.bounding_box())) else {
            return Ok(());
        };
        let Ok(run) = usize::try_from(clip.right - clip.left) else {
            return Ok(());
        };
        for y in clip.top..clip.bottom {
            if let Some(start) = self.index(clip.left, y) {
                if let Some(row) = self.pixels.get_mut(start..start + run) {
                    row.fill(color);
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
