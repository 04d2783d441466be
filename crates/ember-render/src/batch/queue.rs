//! The sprite record store: parallel growable arrays of pending draws.

use crate::texture::TextureId;

use super::vertex::SpriteRecord;

/// Fixed number of records added whenever the store runs out of capacity.
///
/// Growth is by a constant increment, not by doubling; callers budgeting CPU
/// memory rely on the store never over-allocating past the next step.
pub(crate) const GROWTH_INCREMENT: usize = 128;

/// Pending draw requests for the currently open batch.
///
/// Records and texture identities live in parallel arrays keyed by position,
/// alongside the sort scratch array. Backing storage persists across batches
/// and only grows; `clear` resets the count without deallocating.
#[derive(Debug, Default)]
pub(crate) struct SpriteQueue {
    records: Vec<SpriteRecord>,
    textures: Vec<TextureId>,
    /// Scratch index permutation filled by the order resolver.
    pub order: Vec<u32>,
}

impl SpriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. All parallel arrays grow together by
    /// [`GROWTH_INCREMENT`] when capacity is exhausted.
    pub fn push(&mut self, record: SpriteRecord, texture: TextureId) {
        if self.records.len() == self.records.capacity() {
            self.records.reserve_exact(GROWTH_INCREMENT);
            self.textures.reserve_exact(GROWTH_INCREMENT);
            // The scratch array is empty between flushes, so its reserve is
            // measured against the records capacity rather than the
            // increment: the resolver's extend must never reallocate.
            self.order.reserve_exact(self.records.capacity());
        }
        self.records.push(record);
        self.textures.push(texture);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SpriteRecord] {
        &self.records
    }

    pub fn textures(&self) -> &[TextureId] {
        &self.textures
    }

    /// Reset the count to zero, keeping all backing storage.
    pub fn clear(&mut self) {
        self.records.clear();
        self.textures.clear();
        self.order.clear();
    }
}
