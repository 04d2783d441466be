//! The graphics-device boundary.
//!
//! [`GraphicsDevice`] is the narrow interface the batcher consumes from the
//! graphics backend: a capability query, buffer creation and upload, state
//! application, texture binding, and an indexed draw primitive. The trait is
//! object-safe and takes `&self` everywhere; implementations that need to
//! mutate internal state (command recording, mock verification) use interior
//! mutability.

use crate::error::RenderResult;
use crate::state::PipelineState;
use crate::texture::TextureId;

/// Handle to a buffer object owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BufferId(pub u64);

/// Synchronization contract for a buffer upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetDataMode {
    /// No contract; only valid when the buffer is not in flight (e.g. filling
    /// the static index buffer at construction).
    None,
    /// Prior contents may be invalidated wholesale. The backend must not
    /// stall waiting for the GPU to finish consuming old data.
    Discard,
    /// Prior contents remain valid; the written range must not overlap any
    /// range the GPU may still be reading.
    NoOverwrite,
}

/// Primitive topology for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
    LineStrip,
}

/// The operations the sprite batcher requires from a graphics backend.
///
/// Errors returned from any method propagate unchanged out of the batcher;
/// there is no retry and no recovery path at this layer.
pub trait GraphicsDevice {
    /// Whether the backend supports `NoOverwrite` uploads into a buffer that
    /// already holds in-flight data. Queried once at batcher construction;
    /// backends answering `false` receive only `Discard` uploads.
    fn supports_no_overwrite(&self) -> bool;

    /// Create a vertex buffer of `size` bytes with undefined contents.
    fn create_vertex_buffer(&self, size: u64) -> RenderResult<BufferId>;

    /// Create an index buffer initialized with `data`. The contents are
    /// immutable for the lifetime of the buffer.
    fn create_index_buffer(&self, data: &[u8]) -> RenderResult<BufferId>;

    /// Upload `data` into `buffer` at `byte_offset` under the given
    /// synchronization contract.
    fn upload(
        &self,
        buffer: BufferId,
        byte_offset: u64,
        data: &[u8],
        mode: SetDataMode,
    ) -> RenderResult<()>;

    /// Select the vertex and index buffers subsequent draws read from.
    fn bind_buffers(&self, vertex: BufferId, index: BufferId) -> RenderResult<()>;

    /// Apply the fixed-function state and transform for subsequent draws.
    fn apply_pipeline_state(&self, state: &PipelineState) -> RenderResult<()>;

    /// Bind `texture` for subsequent draws.
    fn bind_texture(&self, texture: TextureId) -> RenderResult<()>;

    /// Issue one indexed draw call.
    ///
    /// `base_vertex` is added to every index fetched from the index buffer;
    /// `num_vertices` is the vertex range referenced, `start_index` the first
    /// index, and `primitive_count` the number of primitives assembled.
    fn draw_indexed(
        &self,
        topology: PrimitiveTopology,
        base_vertex: i32,
        num_vertices: u32,
        start_index: u32,
        primitive_count: u32,
    ) -> RenderResult<()>;
}
