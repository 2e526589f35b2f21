//! Renderer error types.

use pixel_core::SceneError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Scene input was rejected before anything was drawn.
    #[error("Scene decode failed: {0}")]
    Decode(#[from] SceneError),

    /// Image resource could not be read or decoded.
    #[error("Failed to load resource: {0}")]
    Resource(String),
}
