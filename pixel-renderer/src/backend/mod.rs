//! Surface implementations.

#[cfg(feature = "framebuffer")]
pub mod graphics;
pub mod recording;

#[cfg(feature = "framebuffer")]
pub use graphics::{Framebuffer, GraphicsSurface};
pub use recording::{DrawCall, RecordingSurface};
