use crate::device::GraphicsDevice;
use crate::error::RenderResult;

/// A custom shading effect with an ordered list of passes.
///
/// When an effect is active on a batch, every draw call the coalescer emits
/// is repeated once per pass, with [`Effect::apply_pass`] invoked before each
/// repetition. Without an effect, the backend's default shading path is used
/// and state is applied once per flush.
pub trait Effect {
    /// Number of passes in the currently selected technique.
    fn pass_count(&self) -> usize;

    /// Apply pass `index` (0-based) to the device.
    fn apply_pass(&self, index: usize, device: &dyn GraphicsDevice) -> RenderResult<()>;
}
