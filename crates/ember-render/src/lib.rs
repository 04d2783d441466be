//! Ember Render
//!
//! 2D sprite batching and buffering for the Ember engine. Draw requests made
//! between [`SpriteBatch::begin`] and [`SpriteBatch::end`] are accumulated as
//! compact value records, optionally reordered by texture or depth, converted
//! into textured quads, and issued to a [`GraphicsDevice`] as a minimal
//! sequence of indexed draw calls.
//!
//! The graphics backend itself is an external collaborator behind the
//! [`GraphicsDevice`] trait; this crate never talks to a GPU directly.

pub mod batch;
pub mod color;
pub mod device;
pub mod effect;
pub mod error;
pub mod font;
pub mod state;
pub mod texture;

pub use batch::{
    BatchConfig, MAX_BATCH_SPRITES, SpriteBatch, SpriteBatchStats, SpriteEffects, SpriteParams,
    SpriteSortMode, SpriteVertex,
};
pub use color::Color;
pub use device::{BufferId, GraphicsDevice, PrimitiveTopology, SetDataMode};
pub use effect::Effect;
pub use error::{RenderError, RenderResult};
pub use font::{Glyph, GlyphKerning, SpriteFont};
pub use state::{
    BlendFactor, BlendState, CompareFunction, CullMode, DepthStencilState, FilterMode,
    PipelineState, RasterizerState, SamplerState, TextureAddressMode,
};
pub use texture::{Texture2D, TextureId};
