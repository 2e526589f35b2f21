//! Image decoding for asset blits.
//!
//! Assets are stored as baseline JPEG. A decoder reads one file and pushes
//! its pixels to the surface with the top-left corner at the given origin.

use std::io::Read;

use crate::error::RenderResult;
use crate::surface::{Point, Surface};

/// JPEG start-of-image marker.
pub const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Decodes an image stream onto a surface.
pub trait ImageDecoder {
    /// Decode `source` and draw it at `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be read or decoded.
    fn draw_image(
        &mut self,
        source: &mut dyn Read,
        origin: Point,
        surface: &mut dyn Surface,
    ) -> RenderResult<()>;
}

/// Decoder that draws nothing. Used where assets are not wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipImages;

impl ImageDecoder for SkipImages {
    fn draw_image(
        &mut self,
        _source: &mut dyn Read,
        origin: Point,
        _surface: &mut dyn Surface,
    ) -> RenderResult<()> {
        tracing::trace!(x = origin.x, y = origin.y, "Skipping image");
        Ok(())
    }
}

#[cfg(feature = "jpeg")]
pub use jpeg::JpegDecoder;

#[cfg(feature = "jpeg")]
mod jpeg {
    use std::io::Read;

    use ::image::ImageFormat;
    use pixel_core::{PackedColor, Rgb};

    use super::{ImageDecoder, JPEG_MAGIC};
    use crate::error::{RenderError, RenderResult};
    use crate::surface::{Point, Surface};

    /// JPEG decoder backed by the `image` crate.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct JpegDecoder;

    impl JpegDecoder {
        /// Create a decoder.
        #[must_use]
        pub fn new() -> Self {
            Self
        }

        /// Decode JPEG bytes into row-major RGB565 pixels.
        ///
        /// # Errors
        ///
        /// Returns an error if the bytes are not a decodable JPEG.
        pub fn decode(data: &[u8]) -> RenderResult<(u32, u32, Vec<PackedColor>)> {
            if !data.starts_with(&JPEG_MAGIC) {
                return Err(RenderError::Resource("Not a JPEG stream".to_string()));
            }

            let img = ::image::load_from_memory_with_format(data, ImageFormat::Jpeg)
                .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            let pixels = rgb
                .pixels()
                .map(|p| PackedColor::from(Rgb::new(p[0], p[1], p[2])))
                .collect();

            Ok((width, height, pixels))
        }
    }

    impl ImageDecoder for JpegDecoder {
        fn draw_image(
            &mut self,
            source: &mut dyn Read,
            origin: Point,
            surface: &mut dyn Surface,
        ) -> RenderResult<()> {
            let mut data = Vec::new();
            source
                .read_to_end(&mut data)
                .map_err(|e| RenderError::Resource(format!("Failed to read image: {e}")))?;

            let (width, height, pixels) = Self::decode(&data)?;
            tracing::trace!(x = origin.x, y = origin.y, width, height, "Pushing image");
            surface.push_image(origin, width, height, &pixels);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::backend::recording::{DrawCall, RecordingSurface};

    #[test]
    fn test_skip_images_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let mut source = Cursor::new(vec![0xFF, 0xD8, 0xFF]);
        SkipImages
            .draw_image(&mut source, Point::new(1, 2), &mut surface)
            .unwrap();
        assert!(surface.is_empty());
    }

    #[cfg(feature = "jpeg")]
    fn jpeg_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = ::image::RgbImage::from_pixel(width, height, ::image::Rgb(rgb));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ::image::ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[cfg(feature = "jpeg")]
    #[test]
    fn test_jpeg_pushed_at_origin() {
        let mut surface = RecordingSurface::new();
        let mut source = Cursor::new(jpeg_bytes(16, 8, [0, 0, 0]));
        JpegDecoder::new()
            .draw_image(&mut source, Point::new(30, 40), &mut surface)
            .unwrap();
        assert_eq!(
            surface.take_calls(),
            vec![DrawCall::PushImage {
                origin: Point::new(30, 40),
                width: 16,
                height: 8
            }]
        );
    }

    #[cfg(feature = "jpeg")]
    #[test]
    fn test_jpeg_pixels_packed() {
        let (w, h, pixels) = JpegDecoder::decode(&jpeg_bytes(8, 8, [0, 0, 0])).unwrap();
        assert_eq!((w, h), (8, 8));
        assert_eq!(pixels.len(), 64);
        assert!(pixels.iter().all(|p| *p == pixel_core::PackedColor::BLACK));
    }

    #[cfg(feature = "jpeg")]
    #[test]
    fn test_non_jpeg_rejected() {
        let mut surface = RecordingSurface::new();
        let mut source = Cursor::new(b"\x89PNG\r\n\x1a\n".to_vec());
        let result = JpegDecoder::new().draw_image(&mut source, Point::new(0, 0), &mut surface);
        assert!(result.is_err());
        assert!(surface.is_empty());
    }
}
