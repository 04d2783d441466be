//! The order resolver: sort mode → iteration order over queued sprites.

use crate::texture::TextureId;

use super::vertex::SpriteRecord;

/// How queued sprites are ordered before materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpriteSortMode {
    /// Accumulate in push order and flush once at `end`. No sorting.
    #[default]
    Deferred,
    /// Bypass the store entirely: every `draw` call flushes synchronously.
    Immediate,
    /// Group by texture identity to minimize texture switches. The relative
    /// order of distinct textures is unspecified; only grouping matters.
    Texture,
    /// Sort by layer depth, highest first.
    BackToFront,
    /// Sort by layer depth, lowest first.
    FrontToBack,
}

/// Fill `order` with the index permutation for the given mode.
///
/// Returns `false` for the identity order (`Deferred`/`Immediate`), in which
/// case `order` is left empty and no permutation is materialized. Sorting is
/// stable: sprites with equal keys keep their push order. That tie-break is
/// part of this implementation's contract, not a property callers should
/// expect from every sprite batcher.
pub(crate) fn resolve_order(
    mode: SpriteSortMode,
    records: &[SpriteRecord],
    textures: &[TextureId],
    order: &mut Vec<u32>,
) -> bool {
    debug_assert_eq!(records.len(), textures.len());

    order.clear();
    match mode {
        SpriteSortMode::Deferred | SpriteSortMode::Immediate => return false,
        SpriteSortMode::Texture => {
            order.extend(0..records.len() as u32);
            order.sort_by_key(|&i| textures[i as usize]);
        }
        SpriteSortMode::BackToFront => {
            order.extend(0..records.len() as u32);
            order.sort_by(|&a, &b| {
                records[b as usize]
                    .depth
                    .total_cmp(&records[a as usize].depth)
            });
        }
        SpriteSortMode::FrontToBack => {
            order.extend(0..records.len() as u32);
            order.sort_by(|&a, &b| {
                records[a as usize]
                    .depth
                    .total_cmp(&records[b as usize].depth)
            });
        }
    }
    true
}
