//! The batch controller: the public `begin`/`draw*`/`end` state machine.

use std::sync::Arc;

use bytemuck::Zeroable;
use ember_core::geometry::Rect;
use glam::{Mat4, Vec2};

use crate::color::Color;
use crate::device::{BufferId, GraphicsDevice, PrimitiveTopology};
use crate::effect::Effect;
use crate::error::{RenderError, RenderResult};
use crate::font::SpriteFont;
use crate::state::{
    BlendState, DepthStencilState, PipelineState, RasterizerState, SamplerState,
};
use crate::texture::{Texture2D, TextureId};

use super::queue::SpriteQueue;
use super::ring::{MAX_BATCH_SPRITES, RingAllocator};
use super::runs::TextureRuns;
use super::sort::{SpriteSortMode, resolve_order};
use super::vertex::{SpriteEffects, SpriteRecord, SpriteVertex, write_quad};

/// Configuration for one `begin`/`end` cycle.
pub struct BatchConfig {
    pub sort_mode: SpriteSortMode,
    pub blend: BlendState,
    pub sampler: SamplerState,
    pub depth_stencil: DepthStencilState,
    pub rasterizer: RasterizerState,
    /// Custom shading effect. When set, every coalesced draw call is
    /// repeated once per effect pass.
    pub effect: Option<Arc<dyn Effect>>,
    pub transform: Mat4,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sort_mode: SpriteSortMode::Deferred,
            blend: BlendState::ALPHA_BLEND,
            sampler: SamplerState::LINEAR_CLAMP,
            depth_stencil: DepthStencilState::NONE,
            rasterizer: RasterizerState::CULL_COUNTER_CLOCKWISE,
            effect: None,
            transform: Mat4::IDENTITY,
        }
    }
}

/// Optional placement arguments for the extended `draw` variants.
#[derive(Debug, Clone, Copy)]
pub struct SpriteParams {
    /// Region of the texture to draw, in texture pixels. `None` draws the
    /// whole texture.
    pub source: Option<Rect<f32>>,
    pub color: Color,
    /// Rotation in radians around `origin`.
    pub rotation: f32,
    /// Rotation/placement origin in source-rectangle pixels.
    pub origin: Vec2,
    /// Per-axis scale applied to the source size. Ignored by the
    /// destination-rectangle variants, which fix the on-screen size.
    pub scale: Vec2,
    pub effects: SpriteEffects,
    /// Layer depth, written to the vertex z coordinate and used by the
    /// depth sort modes.
    pub depth: f32,
}

impl Default for SpriteParams {
    fn default() -> Self {
        Self {
            source: None,
            color: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            effects: SpriteEffects::empty(),
            depth: 0.0,
        }
    }
}

/// Counters for the draw calls and uploads issued since `begin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteBatchStats {
    pub sprites: u32,
    pub draw_calls: u32,
    pub uploads: u32,
    pub pages: u32,
}

/// Accumulates textured-quad draw requests and converts them into a minimal
/// sequence of indexed draw calls on a [`GraphicsDevice`].
///
/// The batcher owns a fixed-capacity GPU vertex buffer
/// ([`MAX_BATCH_SPRITES`] sprites per page) and a static index buffer, both
/// created once at construction. CPU-side record storage persists across
/// batches and grows on demand, so steady-state drawing allocates nothing.
///
/// Not safe for concurrent use: one controller instance belongs to one
/// render thread. Multiple controllers can coexist, each with its own
/// storage and ring cursor.
pub struct SpriteBatch {
    device: Arc<dyn GraphicsDevice>,
    queue: SpriteQueue,
    ring: RingAllocator,
    vertices: Vec<SpriteVertex>,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    supports_no_overwrite: bool,
    sort_mode: SpriteSortMode,
    state: PipelineState,
    effect: Option<Arc<dyn Effect>>,
    stats: SpriteBatchStats,
    open: bool,
}

impl SpriteBatch {
    /// Create a batcher over `device`, allocating its GPU buffers.
    ///
    /// The backend capability for no-overwrite uploads is queried here, once;
    /// the index buffer is filled with the static quad index pattern and
    /// never written again.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> RenderResult<Self> {
        let supports_no_overwrite = device.supports_no_overwrite();
        let vertex_buffer =
            device.create_vertex_buffer(MAX_BATCH_SPRITES as u64 * 4 * SpriteVertex::SIZE)?;
        let index_buffer = device.create_index_buffer(bytemuck::cast_slice(&quad_indices()))?;

        tracing::info!(
            capacity = MAX_BATCH_SPRITES,
            supports_no_overwrite,
            "created sprite batch"
        );

        Ok(Self {
            device,
            queue: SpriteQueue::new(),
            ring: RingAllocator::new(MAX_BATCH_SPRITES as u32),
            vertices: Vec::new(),
            vertex_buffer,
            index_buffer,
            supports_no_overwrite,
            sort_mode: SpriteSortMode::Deferred,
            state: PipelineState::default(),
            effect: None,
            stats: SpriteBatchStats::default(),
            open: false,
        })
    }

    /// Open a batch. Fails if a batch is already open.
    pub fn begin(&mut self, config: BatchConfig) -> RenderResult<()> {
        if self.open {
            return Err(RenderError::InvalidOperation(
                "begin called while a batch is already open",
            ));
        }

        self.sort_mode = config.sort_mode;
        self.state = PipelineState {
            blend: config.blend,
            sampler: config.sampler,
            depth_stencil: config.depth_stencil,
            rasterizer: config.rasterizer,
            transform: config.transform,
        };
        self.effect = config.effect;
        self.stats = SpriteBatchStats::default();

        // Immediate mode draws on every call, so the device is prepared up
        // front instead of per flush. A failure here leaves the batch closed.
        if self.sort_mode == SpriteSortMode::Immediate {
            self.prepare_device()?;
        }
        self.open = true;
        Ok(())
    }

    /// Close the batch, flushing queued sprites. Fails if no batch is open.
    ///
    /// The queue is emptied even when the flush fails partway; a backend
    /// error aborts the remaining pages and leaves GPU state backend-defined.
    pub fn end(&mut self) -> RenderResult<()> {
        if !self.open {
            return Err(RenderError::InvalidOperation(
                "end called without a matching begin",
            ));
        }
        self.open = false;

        let result = if self.queue.is_empty() {
            Ok(())
        } else {
            let result = self.flush();
            self.queue.clear();
            result
        };
        self.effect = None;

        tracing::trace!(
            sprites = self.stats.sprites,
            draw_calls = self.stats.draw_calls,
            pages = self.stats.pages,
            "batch ended"
        );
        result
    }

    /// Whether a batch is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Counters accumulated since the last `begin`.
    pub fn stats(&self) -> SpriteBatchStats {
        self.stats
    }

    /// Draw the whole texture at `position`.
    pub fn draw(
        &mut self,
        texture: &Texture2D,
        position: Vec2,
        color: Color,
    ) -> RenderResult<()> {
        self.draw_ext(
            texture,
            position,
            &SpriteParams {
                color,
                ..SpriteParams::default()
            },
        )
    }

    /// Draw at `position` with full placement control.
    pub fn draw_ext(
        &mut self,
        texture: &Texture2D,
        position: Vec2,
        params: &SpriteParams,
    ) -> RenderResult<()> {
        let size = match params.source {
            Some(source) => source.size(),
            None => texture.size(),
        } * params.scale;
        self.record_sprite(texture, [position.x, position.y, size.x, size.y], params)
    }

    /// Draw stretched into `destination`.
    pub fn draw_rect(
        &mut self,
        texture: &Texture2D,
        destination: Rect<f32>,
        color: Color,
    ) -> RenderResult<()> {
        self.draw_rect_ext(
            texture,
            destination,
            &SpriteParams {
                color,
                ..SpriteParams::default()
            },
        )
    }

    /// Draw stretched into `destination` with full placement control.
    /// `params.scale` is ignored: the destination rectangle already fixes
    /// the on-screen size.
    pub fn draw_rect_ext(
        &mut self,
        texture: &Texture2D,
        destination: Rect<f32>,
        params: &SpriteParams,
    ) -> RenderResult<()> {
        self.record_sprite(
            texture,
            [
                destination.x,
                destination.y,
                destination.width,
                destination.height,
            ],
            params,
        )
    }

    /// Draw `text` at `position` using `font`.
    pub fn draw_string(
        &mut self,
        font: &SpriteFont,
        text: &str,
        position: Vec2,
        color: Color,
    ) -> RenderResult<()> {
        self.draw_string_ext(
            font,
            text,
            position,
            &SpriteParams {
                color,
                ..SpriteParams::default()
            },
        )
    }

    /// Draw `text` with rotation, origin, scale, mirroring, and depth.
    ///
    /// Each glyph becomes one quad request through the same pipeline as any
    /// other sprite: the pen offset is scaled and rotated around
    /// `params.origin` (in unscaled text-space pixels), and mirroring
    /// applies to each glyph's texture coordinates. `params.source` is
    /// ignored; the glyph supplies it.
    pub fn draw_string_ext(
        &mut self,
        font: &SpriteFont,
        text: &str,
        position: Vec2,
        params: &SpriteParams,
    ) -> RenderResult<()> {
        let (sin, cos) = params.rotation.sin_cos();
        font.for_each_glyph(text, |glyph, offset| {
            let local = (offset - params.origin) * params.scale;
            let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
            self.draw_ext(
                font.texture(),
                position + rotated,
                &SpriteParams {
                    source: Some(glyph.source),
                    color: params.color,
                    rotation: params.rotation,
                    origin: Vec2::ZERO,
                    scale: params.scale,
                    effects: params.effects,
                    depth: params.depth,
                },
            )
        })
    }

    /// Normalize the request into a [`SpriteRecord`] and queue it, or flush
    /// it synchronously in `Immediate` mode.
    ///
    /// The source rectangle and origin are normalized here, exactly once;
    /// nothing downstream ever consults the texture dimensions again.
    fn record_sprite(
        &mut self,
        texture: &Texture2D,
        destination: [f32; 4],
        params: &SpriteParams,
    ) -> RenderResult<()> {
        if !self.open {
            return Err(RenderError::InvalidOperation(
                "draw called outside of begin/end",
            ));
        }

        let (source, origin) = normalize_request(texture.size(), params);
        let (rotation_sin, rotation_cos) = params.rotation.sin_cos();
        let record = SpriteRecord {
            source,
            destination,
            origin,
            rotation_sin,
            rotation_cos,
            depth: params.depth,
            color: params.color,
            effects: params.effects,
        };

        if self.sort_mode == SpriteSortMode::Immediate {
            flush_pages(
                self.device.as_ref(),
                &mut self.ring,
                &mut self.vertices,
                self.vertex_buffer,
                self.supports_no_overwrite,
                &[record],
                &[texture.id()],
                None,
                self.effect.as_deref(),
                &mut self.stats,
            )
        } else {
            self.queue.push(record, texture.id());
            Ok(())
        }
    }

    fn prepare_device(&self) -> RenderResult<()> {
        self.device.bind_buffers(self.vertex_buffer, self.index_buffer)?;
        self.device.apply_pipeline_state(&self.state)
    }

    /// Flush every queued sprite: resolve the order, then page through the
    /// ring. Does not clear the queue; `end` owns that.
    fn flush(&mut self) -> RenderResult<()> {
        self.prepare_device()?;

        let mut order = std::mem::take(&mut self.queue.order);
        let sorted = resolve_order(
            self.sort_mode,
            self.queue.records(),
            self.queue.textures(),
            &mut order,
        );

        let result = flush_pages(
            self.device.as_ref(),
            &mut self.ring,
            &mut self.vertices,
            self.vertex_buffer,
            self.supports_no_overwrite,
            self.queue.records(),
            self.queue.textures(),
            sorted.then_some(order.as_slice()),
            self.effect.as_deref(),
            &mut self.stats,
        );
        self.queue.order = order;
        result
    }
}

/// Materialize, upload, and draw sprites in pages of at most
/// [`MAX_BATCH_SPRITES`], in resolved order.
///
/// A backend failure propagates immediately, aborting the remaining pages.
#[allow(clippy::too_many_arguments)]
fn flush_pages(
    device: &dyn GraphicsDevice,
    ring: &mut RingAllocator,
    vertices: &mut Vec<SpriteVertex>,
    vertex_buffer: BufferId,
    supports_no_overwrite: bool,
    records: &[SpriteRecord],
    textures: &[TextureId],
    order: Option<&[u32]>,
    effect: Option<&dyn Effect>,
    stats: &mut SpriteBatchStats,
) -> RenderResult<()> {
    let total = records.len();
    let mut offset = 0;

    while offset < total {
        let page_len = (total - offset).min(MAX_BATCH_SPRITES);
        let slot = ring.allocate(page_len as u32, supports_no_overwrite);

        vertices.clear();
        vertices.resize(page_len * 4, SpriteVertex::zeroed());
        for (page_index, quad) in vertices.chunks_exact_mut(4).enumerate() {
            let record_index = match order {
                Some(order) => order[offset + page_index] as usize,
                None => offset + page_index,
            };
            write_quad(&records[record_index], quad.try_into().unwrap());
        }

        let byte_offset = slot.first_sprite as u64 * 4 * SpriteVertex::SIZE;
        device.upload(
            vertex_buffer,
            byte_offset,
            bytemuck::cast_slice(vertices),
            slot.mode,
        )?;
        stats.uploads += 1;
        stats.pages += 1;

        let page_runs = match order {
            Some(order) => TextureRuns::with_order(textures, &order[offset..offset + page_len]),
            None => TextureRuns::new(&textures[offset..offset + page_len]),
        };
        for (texture, range) in page_runs {
            device.bind_texture(texture)?;

            let base_vertex = ((slot.first_sprite + range.start) * 4) as i32;
            let quads = range.end - range.start;
            match effect {
                Some(effect) => {
                    for pass in 0..effect.pass_count() {
                        effect.apply_pass(pass, device)?;
                        device.draw_indexed(
                            PrimitiveTopology::TriangleList,
                            base_vertex,
                            quads * 4,
                            0,
                            quads * 2,
                        )?;
                        stats.draw_calls += 1;
                    }
                }
                None => {
                    device.draw_indexed(
                        PrimitiveTopology::TriangleList,
                        base_vertex,
                        quads * 4,
                        0,
                        quads * 2,
                    )?;
                    stats.draw_calls += 1;
                }
            }
        }

        stats.sprites += page_len as u32;
        offset += page_len;
    }
    Ok(())
}

/// The static index pattern: six indices per quad, two triangles.
fn quad_indices() -> Vec<u16> {
    let mut indices = Vec::with_capacity(MAX_BATCH_SPRITES * 6);
    for sprite in 0..MAX_BATCH_SPRITES as u16 {
        let base = sprite * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 3, base + 2, base + 1]);
    }
    indices
}

/// Normalize the source rectangle by the texture dimensions and the origin
/// by the source size. Zero-sized textures and source rectangles normalize
/// to zero rather than NaN.
fn normalize_request(texture_size: Vec2, params: &SpriteParams) -> ([f32; 4], [f32; 2]) {
    match params.source {
        Some(src) => (
            [
                safe_div(src.x, texture_size.x),
                safe_div(src.y, texture_size.y),
                safe_div(src.width, texture_size.x),
                safe_div(src.height, texture_size.y),
            ],
            [
                safe_div(params.origin.x, src.width),
                safe_div(params.origin.y, src.height),
            ],
        ),
        None => (
            [0.0, 0.0, 1.0, 1.0],
            [
                safe_div(params.origin.x, texture_size.x),
                safe_div(params.origin.y, texture_size.y),
            ],
        ),
    }
}

fn safe_div(numerator: f32, denominator: f32) -> f32 {
    if denominator.abs() < f32::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}
