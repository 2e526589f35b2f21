//! Recording surface for tests and draw-call traces.
//!
//! Nothing is rasterized; every primitive is appended to a call log in the
//! order it was issued.

use std::fmt;

use pixel_core::{Bounds, PackedColor};

use crate::surface::{Point, Surface};

/// One primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// `fill_screen`
    FillScreen(PackedColor),
    /// `fill_rect`
    FillRect {
        /// Box.
        rect: Bounds,
        /// Fill color.
        color: PackedColor,
    },
    /// `draw_rect`
    DrawRect {
        /// Box.
        rect: Bounds,
        /// Stroke color.
        color: PackedColor,
    },
    /// `fill_round_rect`
    FillRoundRect {
        /// Box.
        rect: Bounds,
        /// Corner radius.
        radius: i32,
        /// Fill color.
        color: PackedColor,
    },
    /// `fill_circle`
    FillCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: i32,
        /// Fill color.
        color: PackedColor,
    },
    /// `draw_circle`
    DrawCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: i32,
        /// Stroke color.
        color: PackedColor,
    },
    /// `fill_triangle`
    FillTriangle {
        /// Apex, bottom-left, bottom-right.
        vertices: [Point; 3],
        /// Fill color.
        color: PackedColor,
    },
    /// `set_text_color`
    SetTextColor(PackedColor),
    /// `set_text_size`
    SetTextSize(u8),
    /// `draw_string`
    DrawString {
        /// Label.
        text: String,
        /// Top-left.
        origin: Point,
    },
    /// `draw_centre_string`
    DrawCentreString {
        /// Label.
        text: String,
        /// Horizontal center, top edge.
        anchor: Point,
        /// Datum argument.
        datum: u8,
    },
    /// `push_image`
    PushImage {
        /// Top-left.
        origin: Point,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FillScreen(c) => write!(f, "fillScreen({c})"),
            Self::FillRect { rect: r, color } => {
                write!(f, "fillRect({}, {}, {}, {}, {color})", r.x, r.y, r.w, r.h)
            }
            Self::DrawRect { rect: r, color } => {
                write!(f, "drawRect({}, {}, {}, {}, {color})", r.x, r.y, r.w, r.h)
            }
            Self::FillRoundRect {
                rect: r,
                radius,
                color,
            } => write!(
                f,
                "fillRoundRect({}, {}, {}, {}, {radius}, {color})",
                r.x, r.y, r.w, r.h
            ),
            Self::FillCircle {
                center,
                radius,
                color,
            } => write!(f, "fillCircle({}, {}, {radius}, {color})", center.x, center.y),
            Self::DrawCircle {
                center,
                radius,
                color,
            } => write!(f, "drawCircle({}, {}, {radius}, {color})", center.x, center.y),
            Self::FillTriangle {
                vertices: [a, b, c],
                color,
            } => write!(
                f,
                "fillTriangle({}, {}, {}, {}, {}, {}, {color})",
                a.x, a.y, b.x, b.y, c.x, c.y
            ),
            Self::SetTextColor(c) => write!(f, "setTextColor({c})"),
            Self::SetTextSize(s) => write!(f, "setTextSize({s})"),
            Self::DrawString { text, origin } => {
                write!(f, "drawString({text:?}, {}, {})", origin.x, origin.y)
            }
            Self::DrawCentreString {
                text,
                anchor,
                datum,
            } => write!(
                f,
                "drawCentreString({text:?}, {}, {}, {datum})",
                anchor.x, anchor.y
            ),
            Self::PushImage {
                origin,
                width,
                height,
            } => write!(
                f,
                "pushImage({}, {}, {width}, {height})",
                origin.x, origin.y
            ),
        }
    }
}

/// Surface that logs calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the log, leaving the recorder empty.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of calls recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether no call has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn record(&mut self, call: DrawCall) {
        tracing::trace!("{call}");
        self.calls.push(call);
    }
}

impl Surface for RecordingSurface {
    fn fill_screen(&mut self, color: PackedColor) {
        self.record(DrawCall::FillScreen(color));
    }

    fn fill_rect(&mut self, rect: Bounds, color: PackedColor) {
        self.record(DrawCall::FillRect { rect, color });
    }

    fn draw_rect(&mut self, rect: Bounds, color: PackedColor) {
        self.record(DrawCall::DrawRect { rect, color });
    }

    fn fill_round_rect(&mut self, rect: Bounds, radius: i32, color: PackedColor) {
        self.record(DrawCall::FillRoundRect {
            rect,
            radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        self.record(DrawCall::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: PackedColor) {
        self.record(DrawCall::DrawCircle {
            center,
            radius,
            color,
        });
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], color: PackedColor) {
        self.record(DrawCall::FillTriangle { vertices, color });
    }

    fn set_text_color(&mut self, color: PackedColor) {
        self.record(DrawCall::SetTextColor(color));
    }

    fn set_text_size(&mut self, size: u8) {
        self.record(DrawCall::SetTextSize(size));
    }

    fn draw_string(&mut self, text: &str, origin: Point) {
        self.record(DrawCall::DrawString {
            text: text.to_string(),
            origin,
        });
    }

    fn draw_centre_string(&mut self, text: &str, anchor: Point, datum: u8) {
        self.record(DrawCall::DrawCentreString {
            text: text.to_string(),
            anchor,
            datum,
        });
    }

    fn push_image(&mut self, origin: Point, width: u32, height: u32, _pixels: &[PackedColor]) {
        self.record(DrawCall::PushImage {
            origin,
            width,
            height,
        });
    }
}
