//! Sprite batching and buffering.
//!
//! The pipeline, leaf to root:
//!
//! | Component | Module | Role |
//! |-----------|--------|------|
//! | Quad generator | [`vertex`] | One sprite record → 4 vertices |
//! | Record store | [`queue`] | Parallel growable arrays of pending sprites |
//! | Order resolver | [`sort`] | Identity or sorted index permutation |
//! | Ring allocator | [`ring`] | Discard-vs-append upload placement |
//! | Run coalescer | [`runs`] | Maximal same-texture runs → draw calls |
//! | Controller | [`sprite_batch`] | The `begin`/`draw*`/`end` state machine |

pub mod queue;
pub mod ring;
pub mod runs;
pub mod sort;
pub mod sprite_batch;
pub mod vertex;

pub use ring::{MAX_BATCH_SPRITES, RingAllocator, UploadSlot};
pub use runs::TextureRuns;
pub use sort::SpriteSortMode;
pub use sprite_batch::{BatchConfig, SpriteBatch, SpriteBatchStats, SpriteParams};
pub use vertex::{SpriteEffects, SpriteRecord, SpriteVertex, write_quad};
