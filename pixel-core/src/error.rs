//! Error types for scene decoding and encoding.

use thiserror::Error;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while decoding or encoding a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Document form is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary stream does not start with the `P240` magic.
    #[error("Unrecognized binary magic: {0:02X?}")]
    BadMagic([u8; 4]),

    /// Binary stream ended before the named field was complete.
    #[error("Binary stream truncated while reading {0}")]
    Truncated(&'static str),

    /// Underlying reader failed for a reason other than end of stream.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Project has more screens than the one-byte screen count can hold.
    #[error("Too many screens for binary form: {0} (max 255)")]
    TooManyScreens(usize),

    /// Screen has more elements than the two-byte element count can hold.
    #[error("Too many elements on screen: {0} (max 65535)")]
    TooManyElements(usize),

    /// Geometry value does not fit the signed 16-bit binary field.
    #[error("Coordinate out of range for binary form: {field}={value}")]
    CoordinateOutOfRange {
        /// Field name (`x`, `y`, `w` or `h`).
        field: &'static str,
        /// Offending value.
        value: i32,
    },
}
