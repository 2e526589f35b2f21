//! `P240` binary form: the compact runtime encoding of a screen.
//!
//! All multi-byte fields are little-endian.
//!
//! ```text
//! magic         4   "P240"
//! version       1   read, not checked
//! screen_count  1
//! -- first screen block (only when screen_count > 0) --
//! background    2   packed RGB565
//! element_count 2   unsigned
//! element_count records:
//!   type        1   1..=8, anything else is skipped
//!   x, y, w, h  2   each, signed
//!   color       2   packed RGB565
//!   name_len    1
//!   name        name_len bytes, no terminator
//! ```
//!
//! Only the first screen block is played back. Switching screens on the
//! device means sending a different buffer.

use std::io::{self, Read};

use crate::{
    Bounds, Element, ElementKind, PackedColor, SceneDocument, SceneError, SceneResult,
    ScreenDocument, ScreenPlan,
};

/// Self-identification bytes at the start of every stream.
pub const MAGIC: [u8; 4] = *b"P240";

/// Version written by [`encode_project`] and [`encode_screen`].
pub const FORMAT_VERSION: u8 = 5;

/// Longest label kept from a record; fits the device's 32-byte label buffer.
pub const MAX_LABEL_LEN: usize = 31;

/// Records reserved up front; a header can declare far more than it carries.
const RESERVED_ELEMENTS: u16 = 256;

/// Stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    /// Format version byte.
    pub version: u8,
    /// Number of screen blocks declared.
    pub screen_count: u8,
}

/// Sequential little-endian reader mapping short reads to [`SceneError::Truncated`].
struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    fn new(inner: R) -> Self {
        Self { inner }
    }

    fn fill(&mut self, buf: &mut [u8], field: &'static str) -> SceneResult<()> {
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                SceneError::Truncated(field)
            } else {
                SceneError::Io(e)
            }
        })
    }

    fn skip(&mut self, count: u64, field: &'static str) -> SceneResult<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())
            .map_err(SceneError::Io)?;
        if skipped < count {
            return Err(SceneError::Truncated(field));
        }
        Ok(())
    }

    fn u8(&mut self, field: &'static str) -> SceneResult<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, field)?;
        Ok(buf[0])
    }

    fn u16(&mut self, field: &'static str) -> SceneResult<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, field)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn i16(&mut self, field: &'static str) -> SceneResult<i16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, field)?;
        Ok(i16::from_le_bytes(buf))
    }

    fn header(&mut self) -> SceneResult<BinaryHeader> {
        let mut magic = [0u8; 4];
        self.fill(&mut magic, "magic")?;
        if magic != MAGIC {
            return Err(SceneError::BadMagic(magic));
        }
        Ok(BinaryHeader {
            version: self.u8("version")?,
            screen_count: self.u8("screen count")?,
        })
    }

    /// Keeps at most [`MAX_LABEL_LEN`] bytes but always consumes the
    /// declared length, so the next record starts where the writer put it.
    fn label(&mut self) -> SceneResult<String> {
        let declared = self.u8("name length")?;
        let kept = usize::from(declared).min(MAX_LABEL_LEN);
        let mut buf = [0u8; MAX_LABEL_LEN];
        self.fill(&mut buf[..kept], "name")?;

        let overflow = usize::from(declared) - kept;
        if overflow > 0 {
            tracing::debug!(declared, kept, "Label longer than buffer, truncating");
            self.skip(overflow as u64, "name")?;
        }

        Ok(String::from_utf8_lossy(&buf[..kept]).into_owned())
    }

    fn record(&mut self) -> SceneResult<Record> {
        let tag = self.u8("element type")?;
        let x = self.i16("x")?;
        let y = self.i16("y")?;
        let w = self.i16("w")?;
        let h = self.i16("h")?;
        let color = PackedColor::from_raw(self.u16("color")?);
        let text = self.label()?;

        Ok(Record {
            tag,
            bounds: Bounds::new(x.into(), y.into(), w.into(), h.into()),
            color,
            text,
        })
    }
}

/// One element record as it sits in the stream.
struct Record {
    tag: u8,
    bounds: Bounds,
    color: PackedColor,
    text: String,
}

impl Record {
    fn into_element(self) -> Option<Element> {
        let kind = ElementKind::from_tag(self.tag)?;
        Some(Element {
            kind,
            bounds: self.bounds,
            color: self.color,
            text: self.text,
        })
    }
}

/// Read and validate the stream header.
///
/// # Errors
///
/// Returns [`SceneError::BadMagic`] if the stream is not `P240`, or
/// [`SceneError::Truncated`] if it ends inside the header.
pub fn read_header<R: Read>(reader: R) -> SceneResult<BinaryHeader> {
    ByteReader::new(reader).header()
}

/// Decode the first screen block of a `P240` stream.
///
/// The whole block is decoded before returning, so a caller that draws only
/// on `Ok` never draws a partial screen. Returns `Ok(None)` when the stream
/// declares zero screens.
///
/// # Errors
///
/// Returns [`SceneError::BadMagic`] on a foreign stream and
/// [`SceneError::Truncated`] when the stream ends before the declared data.
pub fn decode_binary<R: Read>(reader: R) -> SceneResult<Option<ScreenPlan>> {
    let mut input = ByteReader::new(reader);
    let header = input.header()?;
    tracing::debug!(
        version = header.version,
        screens = header.screen_count,
        "Decoding P240 stream"
    );

    if header.screen_count == 0 {
        return Ok(None);
    }
    if header.screen_count > 1 {
        tracing::debug!(
            screens = header.screen_count,
            "Playing back first screen block only"
        );
    }

    let background = PackedColor::from_raw(input.u16("background color")?);
    let count = input.u16("element count")?;
    let mut elements = Vec::with_capacity(usize::from(count.min(RESERVED_ELEMENTS)));

    for index in 0..count {
        let record = input.record()?;
        let tag = record.tag;
        match record.into_element() {
            Some(element) => elements.push(element),
            None => tracing::trace!(index, tag, "Skipping record with unknown type"),
        }
    }

    Ok(Some(ScreenPlan {
        background: Some(background),
        elements,
        background_asset: None,
    }))
}

/// Encode every screen of a project, in project order.
///
/// Mirrors the design tool's export. The device plays back only the first
/// block.
///
/// # Errors
///
/// Returns an error if the project has more than 255 screens, a screen has
/// more than 65535 drawable elements, or a coordinate does not fit in i16.
pub fn encode_project(scene: &SceneDocument) -> SceneResult<Vec<u8>> {
    let count = u8::try_from(scene.screens.len())
        .map_err(|_| SceneError::TooManyScreens(scene.screens.len()))?;
    let mut out = header_bytes(count);
    for screen in &scene.screens {
        write_screen(&mut out, &screen.to_plan())?;
    }
    Ok(out)
}

/// Encode a single screen as a one-screen stream.
///
/// # Errors
///
/// Returns an error if the screen has more than 65535 drawable elements or
/// a coordinate does not fit in i16.
pub fn encode_screen(screen: &ScreenDocument) -> SceneResult<Vec<u8>> {
    let mut out = header_bytes(1);
    write_screen(&mut out, &screen.to_plan())?;
    Ok(out)
}

fn header_bytes(screen_count: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.push(screen_count);
    out
}

fn write_screen(out: &mut Vec<u8>, plan: &ScreenPlan) -> SceneResult<()> {
    if plan.background_asset.as_deref().is_some_and(|a| !a.is_empty()) {
        tracing::warn!(
            asset = plan.background_asset.as_deref(),
            "Background asset has no binary representation, omitted"
        );
    }
    out.extend_from_slice(
        &plan
            .background
            .unwrap_or(PackedColor::BLACK)
            .raw()
            .to_le_bytes(),
    );

    let records: Vec<(u8, &Element)> = plan
        .elements
        .iter()
        .filter_map(|element| {
            let tag = element.kind.tag();
            if tag.is_none() {
                tracing::warn!(
                    kind = %element.kind,
                    asset = %element.text,
                    "Element has no binary representation, omitted"
                );
            }
            tag.map(|t| (t, element))
        })
        .collect();

    let count =
        u16::try_from(records.len()).map_err(|_| SceneError::TooManyElements(records.len()))?;
    out.extend_from_slice(&count.to_le_bytes());

    for (tag, element) in records {
        out.push(tag);
        let b = element.bounds;
        for (field, value) in [("x", b.x), ("y", b.y), ("w", b.w), ("h", b.h)] {
            let v = i16::try_from(value)
                .map_err(|_| SceneError::CoordinateOutOfRange { field, value })?;
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&element.color.raw().to_le_bytes());

        let label = truncate_label(&element.text);
        #[allow(clippy::cast_possible_truncation)]
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    Ok(())
}

/// Longest prefix of `text` that fits [`MAX_LABEL_LEN`] bytes without
/// splitting a character.
fn truncate_label(text: &str) -> &str {
    if text.len() <= MAX_LABEL_LEN {
        return text;
    }
    let mut end = MAX_LABEL_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
