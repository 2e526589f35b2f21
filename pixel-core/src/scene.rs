//! Document form: the JSON project written by the design tool.
//!
//! ```json
//! {
//!   "activeScreenId": "home",
//!   "screens": [{
//!     "id": "home",
//!     "backgroundColor": "#000",
//!     "backgroundAsset": "logo",
//!     "elements": [
//!       { "type": "fillRect", "x": 10, "y": 10, "w": 20, "h": 20, "color": "#F00" },
//!       { "type": "drawString", "name": "Hello", "x": 0, "y": 40, "w": 80, "h": 16, "color": "#FFF" }
//!     ]
//!   }]
//! }
//! ```
//!
//! Fields the renderer does not use (`assets`, `selectedElementId`,
//! `screenSeq`, bindings, ...) are ignored.

use serde::{Deserialize, Serialize};

use crate::{
    color_to_packed, lenient, Bounds, Element, ElementKind, SceneError, SceneResult, ScreenPlan,
};

/// A whole design project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Identifier of the screen to render.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_screen_id: Option<String>,
    /// All screens, in project order.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub screens: Vec<ScreenDocument>,
}

impl SceneDocument {
    /// Parse a project from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or its root is not an object.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        serde_json::from_str(json).map_err(SceneError::Serialization)
    }

    /// Parse a project from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not JSON or the root is not an object.
    pub fn from_slice(bytes: &[u8]) -> SceneResult<Self> {
        serde_json::from_slice(bytes).map_err(SceneError::Serialization)
    }

    /// Serialize the project to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SceneResult<String> {
        serde_json::to_string(self).map_err(SceneError::Serialization)
    }

    /// First screen with the given identifier.
    #[must_use]
    pub fn screen(&self, id: &str) -> Option<&ScreenDocument> {
        self.screens.iter().find(|s| s.id.as_deref() == Some(id))
    }

    /// The screen named by `activeScreenId`, if both exist.
    #[must_use]
    pub fn active_screen(&self) -> Option<&ScreenDocument> {
        self.active_screen_id
            .as_deref()
            .and_then(|id| self.screen(id))
    }

    /// Decode the active screen.
    #[must_use]
    pub fn active_plan(&self) -> Option<ScreenPlan> {
        self.active_screen().map(ScreenDocument::to_plan)
    }
}

/// One full-display layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDocument {
    /// Screen identifier, unique within the project.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    /// Display name shown in the designer.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Hex color filled before any element. A present value that is not a
    /// string reads as `""` and still fills black.
    #[serde(
        default,
        deserialize_with = "lenient::present_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<String>,
    /// Asset drawn over everything at `(0, 0)`.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_asset: Option<String>,
    /// Elements in draw order.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub elements: Vec<ElementDocument>,
}

impl ScreenDocument {
    /// Create an empty screen.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Decode colors and element kinds into a drawable plan.
    #[must_use]
    pub fn to_plan(&self) -> ScreenPlan {
        let elements = self
            .elements
            .iter()
            .filter_map(|doc| {
                let element = doc.to_element();
                if element.is_none() {
                    tracing::trace!(kind = ?doc.kind, "Skipping element with unknown type");
                }
                element
            })
            .collect();

        ScreenPlan {
            background: self
                .background_color
                .as_deref()
                .map(|hex| color_to_packed(Some(hex))),
            elements,
            background_asset: self.background_asset.clone(),
        }
    }
}

/// One element as authored in the designer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Kind name, e.g. `fillRect`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Label for text kinds.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Left edge.
    #[serde(default, deserialize_with = "lenient::int")]
    pub x: i32,
    /// Top edge.
    #[serde(default, deserialize_with = "lenient::int")]
    pub y: i32,
    /// Width.
    #[serde(default, deserialize_with = "lenient::int")]
    pub w: i32,
    /// Height.
    #[serde(default, deserialize_with = "lenient::int")]
    pub h: i32,
    /// Hex color.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// Asset name, used when `type` is not a known shape.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset: Option<String>,
}

impl ElementDocument {
    /// Create a shape element.
    #[must_use]
    pub fn new(kind: ElementKind, bounds: Bounds, color: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.name().to_string()),
            x: bounds.x,
            y: bounds.y,
            w: bounds.w,
            h: bounds.h,
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the asset reference.
    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Bounding box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.w, self.h)
    }

    /// Decode into a drawable element.
    ///
    /// A known shape kind wins over an `asset` reference. Anything else with
    /// an `asset` becomes an image; anything else without one is `None`.
    #[must_use]
    pub fn to_element(&self) -> Option<Element> {
        let bounds = self.bounds();
        let color = color_to_packed(self.color.as_deref());

        match self.kind.as_deref().and_then(ElementKind::from_name) {
            Some(kind) if kind != ElementKind::AssetImage => Some(
                Element::new(kind, bounds, color).with_text(self.name.clone().unwrap_or_default()),
            ),
            _ => self.asset.as_ref().map(|asset| {
                Element::new(ElementKind::AssetImage, bounds, color).with_text(asset.clone())
            }),
        }
    }
}
