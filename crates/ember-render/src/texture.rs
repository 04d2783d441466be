use glam::Vec2;

/// Stable identity of a texture owned by the graphics backend.
///
/// The batcher only ever compares ids for equality (to coalesce consecutive
/// sprites into one draw call) and forwards them to
/// [`GraphicsDevice::bind_texture`](crate::device::GraphicsDevice::bind_texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TextureId(pub u64);

/// A 2D texture as seen by the batcher: an opaque identity plus pixel
/// dimensions.
///
/// The dimensions are read exactly once per `draw` call, to normalize the
/// caller-supplied source rectangle; they are never consulted again after the
/// sprite is recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture2D {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture2D {
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions as a float vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}
