//! # PixelDisplay Renderer
//!
//! Draws decoded scenes onto a TFT-style primitive surface.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────┐   ┌───────────┐
//! │ JSON / P240  │──▶│  ScreenPlan  │──▶│ draw_shape /   │──▶│  Surface  │
//! │   decoders   │   │ (pixel-core) │   │ asset blit     │   │  backend  │
//! └──────────────┘   └──────────────┘   └────────────────┘   └───────────┘
//! ```
//!
//! Backends: [`RecordingSurface`] logs primitive calls, and with the
//! `framebuffer` feature [`GraphicsSurface`] rasterizes through
//! `embedded-graphics` into any RGB565 draw target.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod storage;
pub mod surface;

#[cfg(feature = "framebuffer")]
pub use backend::{Framebuffer, GraphicsSurface};
pub use backend::{DrawCall, RecordingSurface};
#[cfg(feature = "jpeg")]
pub use decoder::JpegDecoder;
pub use decoder::{ImageDecoder, SkipImages};
pub use dispatch::{draw_shape, text_size};
pub use error::{RenderError, RenderResult};
pub use storage::{DirAssetStore, MemoryAssetStore};
pub use surface::{Point, Surface};

use std::io::Read;

use pixel_core::{resolve_asset, AssetStore, ElementKind, SceneDocument, ScreenPlan};

/// Counts from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Shape and text elements dispatched.
    pub elements: usize,
    /// Images blitted, overlay included.
    pub images: usize,
}

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A screen was drawn.
    Rendered(FrameStats),
    /// The document names no active screen. Nothing drawn.
    NoActiveScreen,
    /// No screen carries the active id. Nothing drawn.
    ScreenNotFound,
    /// The binary stream holds zero screens. Nothing drawn.
    Empty,
}

impl RenderOutcome {
    /// Whether anything was drawn.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// Scene renderer over a surface, asset storage and image decoder.
pub struct Renderer<S, A, D> {
    surface: S,
    assets: A,
    decoder: D,
    frame_count: u64,
}

impl<S, A, D> Renderer<S, A, D>
where
    S: Surface,
    A: AssetStore,
    D: ImageDecoder,
{
    /// Create a renderer.
    #[must_use]
    pub fn new(surface: S, assets: A, decoder: D) -> Self {
        Self {
            surface,
            assets,
            decoder,
            frame_count: 0,
        }
    }

    /// Draw the active screen of a document.
    ///
    /// Never fails: malformed content degrades to skipped elements, and a
    /// missing active screen draws nothing.
    pub fn render_scene(&mut self, scene: &SceneDocument) -> RenderOutcome {
        let Some(id) = scene.active_screen_id.as_deref() else {
            tracing::debug!("No active screen id, nothing to draw");
            return RenderOutcome::NoActiveScreen;
        };
        let Some(screen) = scene.screen(id) else {
            tracing::debug!(id, "Active screen not found, nothing to draw");
            return RenderOutcome::ScreenNotFound;
        };

        RenderOutcome::Rendered(self.render_plan(&screen.to_plan()))
    }

    /// Parse a JSON document and draw its active screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON. Nothing is drawn.
    pub fn render_json(&mut self, json: &str) -> RenderResult<RenderOutcome> {
        let scene = SceneDocument::from_json(json)?;
        Ok(self.render_scene(&scene))
    }

    /// Decode a P240 stream and draw its first screen.
    ///
    /// The whole block is decoded before the first draw call.
    ///
    /// # Errors
    ///
    /// Returns an error on a magic mismatch or a truncated stream. Nothing
    /// is drawn in either case.
    pub fn render_binary<R: Read>(&mut self, reader: R) -> RenderResult<RenderOutcome> {
        match pixel_core::decode_binary(reader) {
            Ok(Some(plan)) => Ok(RenderOutcome::Rendered(self.render_plan(&plan))),
            Ok(None) => {
                tracing::debug!("Stream holds no screens, nothing to draw");
                Ok(RenderOutcome::Empty)
            }
            Err(e) => {
                tracing::warn!("Rejected binary scene: {}", e);
                Err(e.into())
            }
        }
    }

    /// Draw a decoded screen: background, elements, then the overlay asset.
    pub fn render_plan(&mut self, plan: &ScreenPlan) -> FrameStats {
        let mut stats = FrameStats::default();
        if plan.is_empty() {
            tracing::debug!("Screen has no background, elements or overlay");
        }

        if let Some(color) = plan.background {
            self.surface.fill_screen(color);
        }

        for element in &plan.elements {
            if element.kind == ElementKind::AssetImage {
                let origin = Point::new(element.bounds.x, element.bounds.y);
                if self.blit_asset(Some(&element.text), origin) {
                    stats.images += 1;
                }
            } else if dispatch::draw_shape(&mut self.surface, element) {
                stats.elements += 1;
            }
        }

        if self.blit_asset(plan.background_asset.as_deref(), Point::new(0, 0)) {
            stats.images += 1;
        }

        self.frame_count += 1;
        tracing::debug!(
            frame = self.frame_count,
            elements = stats.elements,
            images = stats.images,
            "Rendered frame"
        );
        stats
    }

    /// Resolve, open and draw one asset. Failures skip the draw.
    fn blit_asset(&mut self, name: Option<&str>, origin: Point) -> bool {
        let Some(path) = resolve_asset(&self.assets, name) else {
            return false;
        };

        let mut source = match self.assets.open(&path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(%path, "Failed to open asset: {}", e);
                return false;
            }
        };

        match self
            .decoder
            .draw_image(&mut *source, origin, &mut self.surface)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%path, "Failed to draw asset: {}", e);
                false
            }
        }
    }

    /// The surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the renderer, returning the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
