//! Integration tests for scene rendering (pixel-renderer).
//!
//! Drives both the document and binary entry points against a recording
//! surface and checks the exact primitive call sequence.

use std::io::{Cursor, Read};

use pixel_core::{encode_screen, Bounds, PackedColor, SceneDocument};
use pixel_renderer::{
    DrawCall, Framebuffer, GraphicsSurface, ImageDecoder, MemoryAssetStore, Point,
    RecordingSurface, RenderOutcome, RenderResult, Renderer, SkipImages, Surface,
};

/// Decoder that pushes a 1x1 image per blit, so blits show up in the log.
struct MarkerDecoder;

impl ImageDecoder for MarkerDecoder {
    fn draw_image(
        &mut self,
        source: &mut dyn Read,
        origin: Point,
        surface: &mut dyn Surface,
    ) -> RenderResult<()> {
        let mut data = Vec::new();
        source.read_to_end(&mut data).unwrap();
        surface.push_image(origin, 1, 1, &[PackedColor::WHITE]);
        Ok(())
    }
}

fn renderer(assets: MemoryAssetStore) -> Renderer<RecordingSurface, MemoryAssetStore, MarkerDecoder> {
    Renderer::new(RecordingSurface::new(), assets, MarkerDecoder)
}

fn render_json(json: &str) -> Vec<DrawCall> {
    render_json_with(json, MemoryAssetStore::new())
}

fn render_json_with(json: &str, assets: MemoryAssetStore) -> Vec<DrawCall> {
    let mut r = renderer(assets);
    r.render_json(json).unwrap();
    r.into_surface().take_calls()
}

fn render_bytes(bytes: &[u8]) -> (RenderResult<RenderOutcome>, Vec<DrawCall>) {
    let mut r = renderer(MemoryAssetStore::new());
    let result = r.render_binary(Cursor::new(bytes));
    (result, r.into_surface().take_calls())
}

/// Hand-assembled P240 stream with one screen.
fn stream(background: u16, records: &[(u8, [i16; 4], u16, &str)]) -> Vec<u8> {
    let mut out = b"P240".to_vec();
    out.push(5);
    out.push(1);
    out.extend_from_slice(&background.to_le_bytes());
    out.extend_from_slice(&u16::try_from(records.len()).unwrap().to_le_bytes());
    for (tag, geometry, color, name) in records {
        out.push(*tag);
        for v in geometry {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&color.to_le_bytes());
        out.push(u8::try_from(name.len()).unwrap());
        out.extend_from_slice(name.as_bytes());
    }
    out
}

fn fill_rect(x: i32, y: i32, w: i32, h: i32, color: PackedColor) -> DrawCall {
    DrawCall::FillRect {
        rect: Bounds::new(x, y, w, h),
        color,
    }
}

// ==========================================================================
// Document form
// ==========================================================================

#[test]
fn test_single_rect_document() {
    let calls = render_json(
        r##"{"activeScreenId":"s1","screens":[{"id":"s1","backgroundColor":"#000000",
            "elements":[{"type":"fillRect","x":10,"y":10,"w":20,"h":20,"color":"#FF0000"}]}]}"##,
    );
    assert_eq!(
        calls,
        vec![
            DrawCall::FillScreen(PackedColor::BLACK),
            fill_rect(10, 10, 20, 20, PackedColor::RED),
        ]
    );
}

#[test]
fn test_missing_active_screen_draws_nothing() {
    let mut r = renderer(MemoryAssetStore::new());
    let outcome = r
        .render_json(r##"{"activeScreenId":"nope","screens":[{"id":"s1","backgroundColor":"#FFF"}]}"##)
        .unwrap();
    assert_eq!(outcome, RenderOutcome::ScreenNotFound);

    let outcome = r
        .render_json(r##"{"screens":[{"id":"s1","backgroundColor":"#FFF"}]}"##)
        .unwrap();
    assert_eq!(outcome, RenderOutcome::NoActiveScreen);

    assert!(r.surface().is_empty());
    assert_eq!(r.frame_count(), 0);
}

#[test]
fn test_only_active_screen_rendered() {
    let doc = |active: &str| {
        format!(
            r##"{{"activeScreenId":"{active}","screens":[
                {{"id":"a","backgroundColor":"#FF0000",
                  "elements":[{{"type":"fillRect","x":1,"y":1,"w":1,"h":1,"color":"#FFF"}}]}},
                {{"id":"b","backgroundColor":"#00FF00",
                  "elements":[{{"type":"fillRect","x":2,"y":2,"w":2,"h":2,"color":"#00F"}}]}}
            ]}}"##
        )
    };
    assert_eq!(
        render_json(&doc("a")),
        vec![
            DrawCall::FillScreen(PackedColor::RED),
            fill_rect(1, 1, 1, 1, PackedColor::WHITE),
        ]
    );
    assert_eq!(
        render_json(&doc("b")),
        vec![
            DrawCall::FillScreen(PackedColor::GREEN),
            fill_rect(2, 2, 2, 2, PackedColor::BLUE),
        ]
    );
}

#[test]
fn test_wrong_typed_background_fills_black() {
    for background in ["null", "12", "false"] {
        let calls = render_json(&format!(
            r#"{{"activeScreenId":"s","screens":[{{"id":"s","backgroundColor":{background}}}]}}"#
        ));
        assert_eq!(calls, vec![DrawCall::FillScreen(PackedColor::BLACK)]);
    }
}

#[test]
fn test_no_background_means_no_fill() {
    let calls = render_json(
        r#"{"activeScreenId":"s","screens":[{"id":"s",
            "elements":[{"type":"drawRect","x":0,"y":0,"w":5,"h":5}]}]}"#,
    );
    assert_eq!(
        calls,
        vec![DrawCall::DrawRect {
            rect: Bounds::new(0, 0, 5, 5),
            color: PackedColor::BLACK
        }]
    );
}

#[test]
fn test_unknown_and_malformed_elements_skipped() {
    let calls = render_json(
        r##"{"activeScreenId":"s","screens":[{"id":"s","elements":[
            {"type":"sparkle","x":0,"y":0,"w":5,"h":5,"color":"#FFF"},
            7,
            {"type":"fillRect","x":"oops","y":3,"w":4.9,"h":4,"color":"#00FF00"}
        ]}]}"##,
    );
    assert_eq!(calls, vec![fill_rect(0, 3, 4, 4, PackedColor::GREEN)]);
}

#[test]
fn test_invalid_json_is_an_error() {
    let mut r = renderer(MemoryAssetStore::new());
    assert!(r.render_json("{not json").is_err());
    assert!(r.surface().is_empty());
}

// ==========================================================================
// Assets
// ==========================================================================

#[test]
fn test_background_asset_drawn_after_elements() {
    let mut assets = MemoryAssetStore::new();
    assets.insert_asset("logo", vec![0xFF, 0xD8, 0xFF]);
    let calls = render_json_with(
        r##"{"activeScreenId":"s","screens":[{"id":"s","backgroundColor":"#FFFFFF",
            "backgroundAsset":"logo",
            "elements":[{"type":"fillRect","x":1,"y":2,"w":3,"h":4,"color":"#000"}]}]}"##,
        assets,
    );
    assert_eq!(
        calls,
        vec![
            DrawCall::FillScreen(PackedColor::WHITE),
            fill_rect(1, 2, 3, 4, PackedColor::BLACK),
            DrawCall::PushImage {
                origin: Point::new(0, 0),
                width: 1,
                height: 1
            },
        ]
    );
}

#[test]
fn test_asset_element_drawn_at_position() {
    let mut assets = MemoryAssetStore::new();
    assets.insert_asset("icon", vec![1]);
    let mut r = renderer(assets);
    let outcome = r
        .render_json(
            r#"{"activeScreenId":"s","screens":[{"id":"s","elements":[
                {"asset":"icon","x":50,"y":60,"w":10,"h":10},
                {"asset":"missing","x":0,"y":0,"w":10,"h":10},
                {"type":"assetImage","asset":"","x":0,"y":0,"w":10,"h":10}
            ]}]}"#,
        )
        .unwrap();

    assert_eq!(
        outcome,
        RenderOutcome::Rendered(pixel_renderer::FrameStats {
            elements: 0,
            images: 1
        })
    );
    assert_eq!(
        r.into_surface().take_calls(),
        vec![DrawCall::PushImage {
            origin: Point::new(50, 60),
            width: 1,
            height: 1
        }]
    );
}

#[test]
fn test_missing_background_asset_skipped() {
    let calls = render_json(
        r#"{"activeScreenId":"s","screens":[{"id":"s","backgroundAsset":"gone"}]}"#,
    );
    assert!(calls.is_empty());
}

// ==========================================================================
// Binary form
// ==========================================================================

#[test]
fn test_binary_single_rect() {
    let bytes = stream(0x0000, &[(1, [10, 10, 20, 20], 0xF800, "")]);
    let (result, calls) = render_bytes(&bytes);
    assert!(result.unwrap().is_rendered());
    assert_eq!(
        calls,
        vec![
            DrawCall::FillScreen(PackedColor::BLACK),
            fill_rect(10, 10, 20, 20, PackedColor::RED),
        ]
    );
}

#[test]
fn test_binary_bad_magic_draws_nothing() {
    let mut bytes = stream(0xFFFF, &[(1, [0, 0, 1, 1], 0xFFFF, "")]);
    bytes[..4].copy_from_slice(b"P241");
    let (result, calls) = render_bytes(&bytes);
    assert!(result.is_err());
    assert!(calls.is_empty());
}

#[test]
fn test_binary_truncated_draws_nothing() {
    let bytes = stream(
        0xFFFF,
        &[
            (1, [0, 0, 1, 1], 0xFFFF, ""),
            (7, [0, 0, 16, 16], 0xFFFF, "Hello"),
        ],
    );
    let (result, calls) = render_bytes(&bytes[..bytes.len() - 2]);
    assert!(result.is_err());
    assert!(calls.is_empty());
}

#[test]
fn test_binary_zero_screens() {
    let (result, calls) = render_bytes(b"P240\x05\x00");
    assert_eq!(result.unwrap(), RenderOutcome::Empty);
    assert!(calls.is_empty());
}

#[test]
fn test_binary_unknown_tag_skipped() {
    let bytes = stream(
        0x0000,
        &[
            (9, [0, 0, 5, 5], 0xFFFF, "junk"),
            (1, [1, 1, 2, 2], 0x07E0, ""),
        ],
    );
    let (_, calls) = render_bytes(&bytes);
    assert_eq!(
        calls,
        vec![
            DrawCall::FillScreen(PackedColor::BLACK),
            fill_rect(1, 1, 2, 2, PackedColor::GREEN),
        ]
    );
}

#[test]
fn test_binary_long_name_clamped_and_in_sync() {
    let name = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    let bytes = stream(
        0x0000,
        &[
            (7, [0, 0, 100, 16], 0xFFFF, name),
            (1, [5, 5, 5, 5], 0x001F, ""),
        ],
    );
    let (_, calls) = render_bytes(&bytes);
    assert_eq!(
        calls,
        vec![
            DrawCall::FillScreen(PackedColor::BLACK),
            DrawCall::SetTextColor(PackedColor::WHITE),
            DrawCall::SetTextSize(2),
            DrawCall::DrawString {
                text: "A".repeat(31),
                origin: Point::new(0, 0)
            },
            fill_rect(5, 5, 5, 5, PackedColor::BLUE),
        ]
    );
}

// ==========================================================================
// Parity
// ==========================================================================

#[test]
fn test_document_and_binary_render_identically() {
    let json = r##"{"activeScreenId":"main","screens":[{"id":"main","backgroundColor":"#102030",
        "elements":[
            {"type":"fillRect","x":10,"y":10,"w":20,"h":20,"color":"#FF0000"},
            {"type":"drawRect","x":-5,"y":200,"w":60,"h":50,"color":"#0f0"},
            {"type":"fillRoundRect","x":30,"y":30,"w":40,"h":20,"color":"#123456"},
            {"type":"fillCircle","x":100,"y":100,"w":41,"h":30,"color":"#abcdef"},
            {"type":"drawCircle","x":0,"y":0,"w":9,"h":9,"color":"bad"},
            {"type":"fillTriangle","x":100,"y":80,"w":40,"h":40,"color":"#FFFFFF"},
            {"type":"drawString","name":"Temperature","x":5,"y":6,"w":100,"h":24,"color":"#FFF"},
            {"type":"drawCentreString","name":"Centred","x":0,"y":120,"w":240,"h":7,"color":"#808080"}
        ]}]}"##;

    let document_calls = render_json(json);

    let scene = SceneDocument::from_json(json).unwrap();
    let bytes = encode_screen(scene.active_screen().unwrap()).unwrap();
    let (result, binary_calls) = render_bytes(&bytes);
    assert!(result.unwrap().is_rendered());

    assert_eq!(document_calls.len(), 1 + 6 + 3 + 3);
    assert_eq!(document_calls, binary_calls);
}

#[test]
fn test_frame_count_increments_per_render() {
    let mut r = renderer(MemoryAssetStore::new());
    let bytes = stream(0x0000, &[]);
    r.render_binary(Cursor::new(&bytes)).unwrap();
    r.render_binary(Cursor::new(&bytes)).unwrap();
    assert_eq!(r.frame_count(), 2);
    assert_eq!(r.surface().len(), 2);
}

// ==========================================================================
// Raster backend
// ==========================================================================

fn raster() -> Renderer<GraphicsSurface<Framebuffer>, MemoryAssetStore, SkipImages> {
    Renderer::new(
        GraphicsSurface::new(Framebuffer::default()),
        MemoryAssetStore::new(),
        SkipImages,
    )
}

fn lit(frame: &Framebuffer, color: PackedColor) -> usize {
    frame.packed().filter(|c| *c == color).count()
}

#[test]
fn test_far_coordinates_render_to_frame() {
    let mut r = raster();
    let outcome = r
        .render_json(
            r##"{"activeScreenId":"s","screens":[{"id":"s","backgroundColor":"#000000","elements":[
                {"type":"drawString","name":"far","x":2147483645,"y":0,"w":10,"h":2000,"color":"#FFF"},
                {"type":"drawCentreString","name":"far","x":-2147483648,"y":0,"w":10,"h":16,"color":"#FFF"},
                {"type":"fillTriangle","x":2147483000,"y":-2147483648,"w":2147483647,"h":2147483647,"color":"#FFF"},
                {"type":"fillCircle","x":-2147483648,"y":-2147483648,"w":2147483647,"h":2147483647,"color":"#FFF"},
                {"type":"fillRoundRect","x":2147483647,"y":0,"w":2147483647,"h":50,"color":"#FFF"},
                {"type":"fillRect","x":10,"y":10,"w":5,"h":5,"color":"#F00"}
            ]}]}"##,
        )
        .unwrap();

    assert!(outcome.is_rendered());
    let frame = r.into_surface().into_inner();
    assert_eq!(lit(&frame, PackedColor::RED), 25);
    assert_eq!(lit(&frame, PackedColor::WHITE), 0);
}

#[test]
fn test_binary_oversized_rect_covers_frame() {
    let bytes = stream(0x0000, &[(1, [-16000, -16000, 32767, 32767], 0x07E0, "")]);
    let mut r = raster();
    assert!(r.render_binary(Cursor::new(&bytes)).unwrap().is_rendered());

    let frame = r.into_surface().into_inner();
    assert_eq!(lit(&frame, PackedColor::GREEN), 240 * 240);
}
