//! The buffer ring allocator: where in the GPU vertex buffer the next page
//! of sprites lands, and under which synchronization contract.

use crate::device::SetDataMode;

/// Capacity of the GPU vertex buffer, in sprites. One page of the coalescer
/// is at most this many sprites (4x as many vertices).
pub const MAX_BATCH_SPRITES: usize = 2048;

/// Placement decision for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSlot {
    /// First sprite slot written by this upload.
    pub first_sprite: u32,
    /// Synchronization contract handed to the backend.
    pub mode: SetDataMode,
}

/// Cursor over a fixed-capacity vertex buffer shared across flushes.
///
/// Appending after previously-submitted data avoids invalidating buffer
/// contents the GPU may still be consuming; once the ring would overflow (or
/// when the backend cannot append safely at all) the upload restarts at
/// offset zero with [`SetDataMode::Discard`], which breaks the
/// synchronization dependency instead of stalling the CPU.
#[derive(Debug)]
pub struct RingAllocator {
    capacity: u32,
    cursor: u32,
}

impl RingAllocator {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            cursor: 0,
        }
    }

    /// Decide the placement of an upload of `sprites` sprites.
    ///
    /// `supports_no_overwrite` is the backend capability flag; without it
    /// every upload discards. The decision is pure apart from advancing the
    /// cursor: discard resets to zero, append advances past the written
    /// range. `sprites` must not exceed the ring capacity — the coalescer
    /// pages requests before asking.
    pub fn allocate(&mut self, sprites: u32, supports_no_overwrite: bool) -> UploadSlot {
        debug_assert!(sprites <= self.capacity);

        if !supports_no_overwrite || self.cursor + sprites > self.capacity {
            self.cursor = sprites;
            UploadSlot {
                first_sprite: 0,
                mode: SetDataMode::Discard,
            }
        } else {
            let slot = UploadSlot {
                first_sprite: self.cursor,
                mode: SetDataMode::NoOverwrite,
            };
            self.cursor += sprites;
            slot
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> u32 {
        self.cursor
    }
}
