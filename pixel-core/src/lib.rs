//! # PixelDisplay Core
//!
//! Scene model for 240x240 RGB565 TFT displays.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  JSON document form  │     │   P240 binary form   │
//! │  (design preview)    │     │  (production replay) │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            │ SceneDocument::active_plan │ decode_binary
//!            └─────────────┬──────────────┘
//!                          ▼
//!                ┌───────────────────┐
//!                │    ScreenPlan     │
//!                │  - background     │
//!                │  - Element stream │
//!                │  - overlay asset  │
//!                └───────────────────┘
//! ```
//!
//! Both encodings decode into the same [`ScreenPlan`], which is what the
//! renderer consumes. Drawing itself lives in `pixel-renderer`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod asset;
pub mod binary;
pub mod color;
pub mod element;
pub mod error;
pub mod plan;
pub mod scene;

mod lenient;

pub use asset::{asset_path, resolve_asset, AssetStore, ASSET_EXTENSION};
pub use binary::{
    decode_binary, encode_project, encode_screen, read_header, BinaryHeader, FORMAT_VERSION, MAGIC,
    MAX_LABEL_LEN,
};
pub use color::{color_to_packed, PackedColor, Rgb, COLOR_MARKER};
pub use element::{Bounds, Element, ElementKind};
pub use error::{SceneError, SceneResult};
pub use plan::ScreenPlan;
pub use scene::{ElementDocument, SceneDocument, ScreenDocument};

/// Core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
