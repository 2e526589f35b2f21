//! Drawable elements - the building blocks of a screen.

use serde::{Deserialize, Serialize};

use crate::PackedColor;

/// The closed set of drawable element kinds.
///
/// The document form names a kind by string (`"fillRect"`), the binary form
/// by a one-byte tag (`1`). Both decode to this enum so drawing logic exists
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Filled rectangle.
    FillRect,
    /// Outlined rectangle.
    DrawRect,
    /// Filled rectangle with rounded corners.
    FillRoundRect,
    /// Filled circle inscribed in the box.
    FillCircle,
    /// Outlined circle inscribed in the box.
    DrawCircle,
    /// Filled triangle, apex at top-center of the box.
    FillTriangle,
    /// Left-anchored text.
    DrawString,
    /// Center-anchored text.
    DrawCentreString,
    /// JPEG asset blitted at the box origin.
    AssetImage,
}

impl ElementKind {
    /// Every kind with a binary tag, in tag order.
    pub const TAGGED: [Self; 8] = [
        Self::FillRect,
        Self::DrawRect,
        Self::FillRoundRect,
        Self::FillCircle,
        Self::DrawCircle,
        Self::FillTriangle,
        Self::DrawString,
        Self::DrawCentreString,
    ];

    /// Look up a kind by its document-form name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fillRect" => Some(Self::FillRect),
            "drawRect" => Some(Self::DrawRect),
            "fillRoundRect" => Some(Self::FillRoundRect),
            "fillCircle" => Some(Self::FillCircle),
            "drawCircle" => Some(Self::DrawCircle),
            "fillTriangle" => Some(Self::FillTriangle),
            "drawString" => Some(Self::DrawString),
            "drawCentreString" => Some(Self::DrawCentreString),
            "assetImage" => Some(Self::AssetImage),
            _ => None,
        }
    }

    /// Document-form name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FillRect => "fillRect",
            Self::DrawRect => "drawRect",
            Self::FillRoundRect => "fillRoundRect",
            Self::FillCircle => "fillCircle",
            Self::DrawCircle => "drawCircle",
            Self::FillTriangle => "fillTriangle",
            Self::DrawString => "drawString",
            Self::DrawCentreString => "drawCentreString",
            Self::AssetImage => "assetImage",
        }
    }

    /// Look up a kind by its binary tag (1..=8).
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::FillRect),
            2 => Some(Self::DrawRect),
            3 => Some(Self::FillRoundRect),
            4 => Some(Self::FillCircle),
            5 => Some(Self::DrawCircle),
            6 => Some(Self::FillTriangle),
            7 => Some(Self::DrawString),
            8 => Some(Self::DrawCentreString),
            _ => None,
        }
    }

    /// Binary tag, or `None` for kinds the binary form cannot carry.
    #[must_use]
    pub const fn tag(self) -> Option<u8> {
        match self {
            Self::FillRect => Some(1),
            Self::DrawRect => Some(2),
            Self::FillRoundRect => Some(3),
            Self::FillCircle => Some(4),
            Self::DrawCircle => Some(5),
            Self::FillTriangle => Some(6),
            Self::DrawString => Some(7),
            Self::DrawCentreString => Some(8),
            Self::AssetImage => None,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Element bounding box in device pixels.
///
/// Coordinates are signed so elements may sit partly off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Bounds {
    /// Create a bounding box.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Horizontal center, `x + w/2`.
    #[must_use]
    pub const fn center_x(&self) -> i32 {
        self.x.saturating_add(self.w / 2)
    }

    /// Vertical center, `y + h/2`.
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y.saturating_add(self.h / 2)
    }

    /// Right edge, `x + w`.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge, `y + h`.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Radius of the circle inscribed in the box, `min(w, h)/2`.
    #[must_use]
    pub fn inscribed_radius(&self) -> i32 {
        self.w.min(self.h) / 2
    }
}

/// One decoded drawable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// What to draw.
    pub kind: ElementKind,
    /// Where to draw it.
    pub bounds: Bounds,
    /// Fill, stroke or text color.
    pub color: PackedColor,
    /// Label for text kinds, asset name for [`ElementKind::AssetImage`].
    pub text: String,
}

impl Element {
    /// Create an element without text.
    #[must_use]
    pub fn new(kind: ElementKind, bounds: Bounds, color: PackedColor) -> Self {
        Self {
            kind,
            bounds,
            color,
            text: String::new(),
        }
    }

    /// Set the label or asset name.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_kind() {
        for (i, kind) in ElementKind::TAGGED.iter().enumerate() {
            let tag = u8::try_from(i + 1).expect("tag fits");
            assert_eq!(ElementKind::from_tag(tag), Some(*kind));
            assert_eq!(kind.tag(), Some(tag));
            assert_eq!(ElementKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_tags_and_names() {
        assert_eq!(ElementKind::from_tag(0), None);
        assert_eq!(ElementKind::from_tag(9), None);
        assert_eq!(ElementKind::from_tag(255), None);
        assert_eq!(ElementKind::from_name("fillEllipse"), None);
        assert_eq!(ElementKind::from_name("FillRect"), None);
        assert_eq!(ElementKind::AssetImage.tag(), None);
    }

    #[test]
    fn test_serde_names_match_document_names() {
        let json = serde_json::to_string(&ElementKind::DrawCentreString).expect("serialize");
        assert_eq!(json, "\"drawCentreString\"");
    }

    #[test]
    fn test_bounds_derivations_truncate() {
        let b = Bounds::new(10, 20, 31, 15);
        assert_eq!(b.center_x(), 25);
        assert_eq!(b.center_y(), 27);
        assert_eq!(b.inscribed_radius(), 7);
        assert_eq!(b.right(), 41);
        assert_eq!(b.bottom(), 35);
    }

    #[test]
    fn test_bounds_negative_size_truncates_toward_zero() {
        let b = Bounds::new(0, 0, -5, 10);
        assert_eq!(b.center_x(), -2);
        assert_eq!(b.inscribed_radius(), -2);
    }

    #[test]
    fn test_bounds_saturate() {
        let b = Bounds::new(i32::MAX, 0, 10, 0);
        assert_eq!(b.right(), i32::MAX);
    }
}
