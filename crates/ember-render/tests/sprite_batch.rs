//! End-to-end batching tests driving a `SpriteBatch` over the mock device.

use std::sync::{Arc, Mutex};

use glam::Vec2;

use ember_core::geometry::Rect;
use ember_render::{
    BatchConfig, Color, Effect, Glyph, GlyphKerning, GraphicsDevice, MAX_BATCH_SPRITES,
    RenderError, RenderResult, SetDataMode, SpriteBatch, SpriteFont, SpriteParams, SpriteSortMode,
    SpriteVertex, Texture2D, TextureId,
};
use ember_test_utils::{DeviceCall, MockDevice};

const QUAD_BYTES: u64 = 4 * SpriteVertex::SIZE;

fn batch(supports_no_overwrite: bool) -> (Arc<MockDevice>, SpriteBatch) {
    let device = Arc::new(MockDevice::new(supports_no_overwrite));
    let batch = SpriteBatch::new(device.clone()).unwrap();
    device.clear_calls();
    (device, batch)
}

fn texture(id: u64) -> Texture2D {
    Texture2D::new(TextureId(id), 64, 64)
}

fn config(sort_mode: SpriteSortMode) -> BatchConfig {
    BatchConfig {
        sort_mode,
        ..BatchConfig::default()
    }
}

#[test]
fn construction_allocates_both_buffers() {
    let device = Arc::new(MockDevice::new(true));
    let _batch = SpriteBatch::new(device.clone()).unwrap();

    let calls = device.calls();
    assert!(calls.contains(&DeviceCall::CreateVertexBuffer {
        size: MAX_BATCH_SPRITES as u64 * QUAD_BYTES,
    }));
    // six u16 indices per sprite, written once
    assert!(calls.contains(&DeviceCall::CreateIndexBuffer {
        size: MAX_BATCH_SPRITES * 6 * 2,
    }));
}

#[test]
fn protocol_violations_are_rejected() {
    let (_device, mut batch) = batch(true);

    // draw before any begin
    let err = batch.draw(&texture(1), Vec2::ZERO, Color::WHITE);
    assert!(matches!(err, Err(RenderError::InvalidOperation(_))));

    // end without begin
    assert!(matches!(
        batch.end(),
        Err(RenderError::InvalidOperation(_))
    ));

    // re-entrant begin
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    assert!(matches!(
        batch.begin(config(SpriteSortMode::Deferred)),
        Err(RenderError::InvalidOperation(_))
    ));

    // the original batch is still usable
    batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    batch.end().unwrap();
}

#[test]
fn deferred_preserves_push_order() {
    let (device, mut batch) = batch(true);
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for id in [3, 1, 2] {
        batch.draw(&texture(id), Vec2::ZERO, Color::WHITE).unwrap();
    }
    assert_eq!(device.draw_count(), 0, "nothing flushes before end");
    batch.end().unwrap();

    let drawn: Vec<_> = device.draw_textures().into_iter().flatten().collect();
    assert_eq!(drawn, vec![TextureId(3), TextureId(1), TextureId(2)]);
}

#[test]
fn texture_sort_coalesces_to_distinct_textures() {
    let (device, mut batch) = batch(true);
    batch.begin(config(SpriteSortMode::Texture)).unwrap();
    for id in [1, 2, 1, 2, 1, 2] {
        batch.draw(&texture(id), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();

    assert_eq!(device.draw_count(), 2);
    assert_eq!(batch.stats().draw_calls, 2);
    assert_eq!(batch.stats().sprites, 6);
}

#[test]
fn depth_sorts_drain_in_order() {
    for (mode, expected) in [
        (SpriteSortMode::BackToFront, [TextureId(9), TextureId(5), TextureId(1)]),
        (SpriteSortMode::FrontToBack, [TextureId(1), TextureId(5), TextureId(9)]),
    ] {
        let (device, mut batch) = batch(true);
        batch.begin(config(mode)).unwrap();
        for (id, depth) in [(9, 0.9), (1, 0.1), (5, 0.5)] {
            batch
                .draw_ext(
                    &texture(id),
                    Vec2::ZERO,
                    &SpriteParams {
                        depth,
                        ..SpriteParams::default()
                    },
                )
                .unwrap();
        }
        batch.end().unwrap();

        let drawn: Vec<_> = device.draw_textures().into_iter().flatten().collect();
        assert_eq!(drawn, expected, "mode {mode:?}");
    }
}

#[test]
fn oversized_batch_pages_through_the_ring() {
    let (device, mut batch) = batch(true);
    let sprite_count = 2 * MAX_BATCH_SPRITES + 1;

    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for _ in 0..sprite_count {
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();

    let uploads = device.uploads();
    assert_eq!(uploads.len(), 3);
    assert_eq!(uploads[0].1 as u64, MAX_BATCH_SPRITES as u64 * QUAD_BYTES);
    assert_eq!(uploads[1].1 as u64, MAX_BATCH_SPRITES as u64 * QUAD_BYTES);
    assert_eq!(uploads[2].1 as u64, QUAD_BYTES);
    for (_, size, _) in &uploads {
        assert!(*size as u64 <= MAX_BATCH_SPRITES as u64 * QUAD_BYTES);
    }
    // one texture, but one run per page
    assert_eq!(device.draw_count(), 3);
    assert_eq!(batch.stats().pages, 3);
    assert_eq!(batch.stats().sprites as usize, sprite_count);
}

#[test]
fn ring_appends_then_discards_on_wrap() {
    let (device, mut batch) = batch(true);

    // fill most of the ring
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for _ in 0..(MAX_BATCH_SPRITES - 100) {
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();

    // this no longer fits after the previous upload; it must restart at
    // offset zero with a discard, never append past capacity
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for _ in 0..200 {
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();

    let uploads = device.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0], (
        0,
        (MAX_BATCH_SPRITES - 100) * QUAD_BYTES as usize,
        SetDataMode::NoOverwrite,
    ));
    assert_eq!(uploads[1], (0, 200 * QUAD_BYTES as usize, SetDataMode::Discard));
}

#[test]
fn consecutive_small_batches_append() {
    let (device, mut batch) = batch(true);
    for expected_offset in [0u64, 10, 20] {
        batch.begin(config(SpriteSortMode::Deferred)).unwrap();
        for _ in 0..10 {
            batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
        }
        batch.end().unwrap();

        let (byte_offset, _, _) = *device.uploads().last().unwrap();
        assert_eq!(byte_offset, expected_offset * QUAD_BYTES);
    }
}

#[test]
fn backend_without_append_always_discards() {
    let (device, mut batch) = batch(false);
    for _ in 0..3 {
        batch.begin(config(SpriteSortMode::Deferred)).unwrap();
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
        batch.end().unwrap();
    }

    for (byte_offset, _, mode) in device.uploads() {
        assert_eq!(byte_offset, 0);
        assert_eq!(mode, SetDataMode::Discard);
    }
}

#[test]
fn immediate_mode_flushes_every_draw() {
    let (device, mut batch) = batch(true);
    batch.begin(config(SpriteSortMode::Immediate)).unwrap();
    for _ in 0..3 {
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    }
    // draws happen synchronously, not at end
    assert_eq!(device.draw_count(), 3);
    assert_eq!(device.upload_count(), 3);
    batch.end().unwrap();
    assert_eq!(device.draw_count(), 3);
    // state was applied once at begin, not per draw
    assert_eq!(device.state_apply_count(), 1);
}

#[test]
fn batches_start_empty_after_end() {
    let (device, mut batch) = batch(true);
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for _ in 0..5 {
        batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();
    assert_eq!(batch.stats().sprites, 5);

    // an empty cycle issues no uploads or draws
    device.clear_calls();
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    batch.end().unwrap();
    assert_eq!(device.upload_count(), 0);
    assert_eq!(device.draw_count(), 0);
    assert_eq!(batch.stats().sprites, 0);

    // and a following one-sprite cycle flushes exactly one sprite
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    batch.draw(&texture(2), Vec2::ZERO, Color::WHITE).unwrap();
    batch.end().unwrap();
    assert_eq!(batch.stats().sprites, 1);
    assert_eq!(device.upload_count(), 1);
}

#[test]
fn draw_call_geometry_matches_run_length() {
    let (device, mut batch) = batch(true);
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for id in [7, 7, 7, 8] {
        batch.draw(&texture(id), Vec2::ZERO, Color::WHITE).unwrap();
    }
    batch.end().unwrap();

    let draws = device.draws();
    assert_eq!(draws.len(), 2);
    match &draws[0] {
        DeviceCall::DrawIndexed {
            base_vertex,
            num_vertices,
            start_index,
            primitive_count,
            ..
        } => {
            assert_eq!(*base_vertex, 0);
            assert_eq!(*num_vertices, 12);
            assert_eq!(*start_index, 0);
            assert_eq!(*primitive_count, 6);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &draws[1] {
        DeviceCall::DrawIndexed {
            base_vertex,
            primitive_count,
            ..
        } => {
            assert_eq!(*base_vertex, 12);
            assert_eq!(*primitive_count, 2);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

struct CountingEffect {
    applied: Mutex<Vec<usize>>,
    passes: usize,
}

impl Effect for CountingEffect {
    fn pass_count(&self) -> usize {
        self.passes
    }

    fn apply_pass(&self, index: usize, _device: &dyn GraphicsDevice) -> RenderResult<()> {
        self.applied.lock().unwrap().push(index);
        Ok(())
    }
}

#[test]
fn custom_effect_repeats_draws_per_pass() {
    let (device, mut batch) = batch(true);
    let effect = Arc::new(CountingEffect {
        applied: Mutex::new(Vec::new()),
        passes: 2,
    });

    batch
        .begin(BatchConfig {
            sort_mode: SpriteSortMode::Deferred,
            effect: Some(effect.clone()),
            ..BatchConfig::default()
        })
        .unwrap();
    batch.draw(&texture(1), Vec2::ZERO, Color::WHITE).unwrap();
    batch.draw(&texture(2), Vec2::ZERO, Color::WHITE).unwrap();
    batch.end().unwrap();

    // two runs, each drawn once per pass
    assert_eq!(device.draw_count(), 4);
    assert_eq!(*effect.applied.lock().unwrap(), vec![0, 1, 0, 1]);
}

#[test]
fn backend_failure_aborts_remaining_pages() {
    let (device, mut batch) = batch(true);
    device.fail_draws_after(1);

    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    for id in [1, 2, 3] {
        batch.draw(&texture(id), Vec2::ZERO, Color::WHITE).unwrap();
    }
    let err = batch.end();
    assert!(matches!(err, Err(RenderError::Backend(_))));
    assert_eq!(device.draw_count(), 1, "failure aborts the remaining runs");

    // the failed batch did not leak sprites into the next one
    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    batch.end().unwrap();
    assert_eq!(batch.stats().sprites, 0);
}

fn glyph_font() -> SpriteFont {
    let mut font = SpriteFont::new(texture(42), 16.0, 0.0, None);
    for (i, c) in ['h', 'i', '!'].into_iter().enumerate() {
        font.insert_glyph(
            c,
            Glyph {
                source: Rect::new(i as f32 * 8.0, 0.0, 8.0, 12.0),
                cropping: Vec2::ZERO,
                kerning: GlyphKerning {
                    left: 0.0,
                    width: 8.0,
                    right: 0.0,
                },
            },
        );
    }
    font
}

#[test]
fn draw_string_feeds_the_quad_pipeline() {
    let (device, mut batch) = batch(true);
    let font = glyph_font();

    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    batch
        .draw_string(&font, "hi!", Vec2::new(10.0, 20.0), Color::WHITE)
        .unwrap();
    batch.end().unwrap();

    // three glyphs, one atlas texture, one coalesced draw call
    assert_eq!(batch.stats().sprites, 3);
    assert_eq!(device.draw_count(), 1);
    let drawn: Vec<_> = device.draw_textures().into_iter().flatten().collect();
    assert_eq!(drawn, vec![TextureId(42)]);
}

#[test]
fn draw_string_missing_glyph_is_an_error() {
    let (_device, mut batch) = batch(true);
    let font = glyph_font();

    batch.begin(config(SpriteSortMode::Deferred)).unwrap();
    let err = batch.draw_string(&font, "hx", Vec2::ZERO, Color::WHITE);
    assert!(matches!(err, Err(RenderError::MissingGlyph('x'))));
}
