//! Mock implementation of [`GraphicsDevice`] for testing.
//!
//! Records every operation without interacting with a GPU. Supports failure
//! injection so tests can verify that backend errors abort a flush and
//! propagate unchanged.

use parking_lot::Mutex;

use ember_render::{
    BufferId, GraphicsDevice, PipelineState, PrimitiveTopology, RenderError, RenderResult,
    SetDataMode, TextureId,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateVertexBuffer {
        size: u64,
    },
    CreateIndexBuffer {
        size: usize,
    },
    Upload {
        buffer: BufferId,
        byte_offset: u64,
        size: usize,
        mode: SetDataMode,
    },
    BindBuffers {
        vertex: BufferId,
        index: BufferId,
    },
    ApplyPipelineState,
    BindTexture {
        texture: TextureId,
    },
    DrawIndexed {
        topology: PrimitiveTopology,
        base_vertex: i32,
        num_vertices: u32,
        start_index: u32,
        primitive_count: u32,
        /// Texture bound at the time of the draw.
        texture: Option<TextureId>,
    },
}

#[derive(Default)]
struct MockState {
    calls: Vec<DeviceCall>,
    next_buffer_id: u64,
    bound_texture: Option<TextureId>,
    draws_issued: u32,
    fail_draws_after: Option<u32>,
}

/// A [`GraphicsDevice`] that records calls instead of executing them.
///
/// # Example
///
/// ```
/// use ember_test_utils::MockDevice;
///
/// let device = MockDevice::new(true);
/// // ... drive a SpriteBatch over the device, then:
/// assert_eq!(device.upload_count(), 0);
/// assert!(device.calls().is_empty());
/// ```
pub struct MockDevice {
    supports_no_overwrite: bool,
    state: Mutex<MockState>,
}

impl MockDevice {
    /// Create a mock advertising the given append-upload capability.
    pub fn new(supports_no_overwrite: bool) -> Self {
        Self {
            supports_no_overwrite,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Make every draw call past the first `count` fail with a backend
    /// error, for testing abort-and-propagate behavior.
    pub fn fail_draws_after(&self, count: u32) {
        self.state.lock().fail_draws_after = Some(count);
    }

    /// A copy of all recorded calls, in order.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().calls.clone()
    }

    /// All recorded draw calls, in order.
    pub fn draws(&self) -> Vec<DeviceCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::DrawIndexed { .. }))
            .cloned()
            .collect()
    }

    /// The texture bound for each draw call, in draw order.
    pub fn draw_textures(&self) -> Vec<Option<TextureId>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::DrawIndexed { texture, .. } => Some(*texture),
                _ => None,
            })
            .collect()
    }

    /// All vertex-buffer uploads as `(byte_offset, size, mode)`, in order.
    pub fn uploads(&self) -> Vec<(u64, usize, SetDataMode)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Upload {
                    byte_offset,
                    size,
                    mode,
                    ..
                } => Some((*byte_offset, *size, *mode)),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.draws().len()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads().len()
    }

    pub fn state_apply_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::ApplyPipelineState))
            .count()
    }

    /// Forget everything recorded so far. Capability and failure injection
    /// settings are kept.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl GraphicsDevice for MockDevice {
    fn supports_no_overwrite(&self) -> bool {
        self.supports_no_overwrite
    }

    fn create_vertex_buffer(&self, size: u64) -> RenderResult<BufferId> {
        let mut state = self.state.lock();
        let id = BufferId(state.next_buffer_id);
        state.next_buffer_id += 1;
        state.calls.push(DeviceCall::CreateVertexBuffer { size });
        Ok(id)
    }

    fn create_index_buffer(&self, data: &[u8]) -> RenderResult<BufferId> {
        let mut state = self.state.lock();
        let id = BufferId(state.next_buffer_id);
        state.next_buffer_id += 1;
        state
            .calls
            .push(DeviceCall::CreateIndexBuffer { size: data.len() });
        Ok(id)
    }

    fn upload(
        &self,
        buffer: BufferId,
        byte_offset: u64,
        data: &[u8],
        mode: SetDataMode,
    ) -> RenderResult<()> {
        self.state.lock().calls.push(DeviceCall::Upload {
            buffer,
            byte_offset,
            size: data.len(),
            mode,
        });
        Ok(())
    }

    fn bind_buffers(&self, vertex: BufferId, index: BufferId) -> RenderResult<()> {
        self.state
            .lock()
            .calls
            .push(DeviceCall::BindBuffers { vertex, index });
        Ok(())
    }

    fn apply_pipeline_state(&self, _state: &PipelineState) -> RenderResult<()> {
        self.state.lock().calls.push(DeviceCall::ApplyPipelineState);
        Ok(())
    }

    fn bind_texture(&self, texture: TextureId) -> RenderResult<()> {
        let mut state = self.state.lock();
        state.bound_texture = Some(texture);
        state.calls.push(DeviceCall::BindTexture { texture });
        Ok(())
    }

    fn draw_indexed(
        &self,
        topology: PrimitiveTopology,
        base_vertex: i32,
        num_vertices: u32,
        start_index: u32,
        primitive_count: u32,
    ) -> RenderResult<()> {
        let mut state = self.state.lock();
        if let Some(limit) = state.fail_draws_after
            && state.draws_issued >= limit
        {
            return Err(RenderError::Backend("injected draw failure".into()));
        }
        state.draws_issued += 1;
        let texture = state.bound_texture;
        state.calls.push(DeviceCall::DrawIndexed {
            topology,
            base_vertex,
            num_vertices,
            start_index,
            primitive_count,
            texture,
        });
        Ok(())
    }
}
