//! Decoded screen, shared by the document and binary paths.

use crate::{Element, PackedColor};

/// Everything needed to draw one screen, in draw order.
///
/// The renderer fills `background`, draws `elements` front to back, then
/// overlays `background_asset` at the origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenPlan {
    /// Whole-surface fill color.
    pub background: Option<PackedColor>,
    /// Elements in draw order.
    pub elements: Vec<Element>,
    /// Asset drawn at `(0, 0)` after all elements.
    pub background_asset: Option<String>,
}

impl ScreenPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the plan draws nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.elements.is_empty() && self.background_asset.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, ElementKind};

    #[test]
    fn test_empty_means_nothing_to_draw() {
        assert!(ScreenPlan::new().is_empty());

        let filled = ScreenPlan {
            background: Some(PackedColor::BLACK),
            ..ScreenPlan::new()
        };
        assert!(!filled.is_empty());
        assert_eq!(filled.len(), 0);

        let overlay = ScreenPlan {
            background_asset: Some("logo".into()),
            ..ScreenPlan::new()
        };
        assert!(!overlay.is_empty());

        let mut shapes = ScreenPlan::new();
        shapes.elements.push(Element::new(
            ElementKind::FillRect,
            Bounds::new(0, 0, 1, 1),
            PackedColor::WHITE,
        ));
        assert!(!shapes.is_empty());
        assert_eq!(shapes.len(), 1);
    }
}
