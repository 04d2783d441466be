//! The run coalescer: maximal same-texture runs over the resolved order.

use std::ops::Range;

use crate::texture::TextureId;

/// Iterator over maximal runs of consecutive sprites sharing one texture.
///
/// Walks a window of the sprite list in resolved order — either the identity
/// order or an index permutation — and yields `(texture, range)` pairs,
/// where the range is in resolved positions relative to the window start.
/// One draw call is emitted per run; the bound texture changes only at run
/// boundaries.
pub struct TextureRuns<'a> {
    textures: &'a [TextureId],
    order: Option<&'a [u32]>,
    len: usize,
    position: usize,
}

impl<'a> TextureRuns<'a> {
    /// Runs over `textures` in push order.
    pub fn new(textures: &'a [TextureId]) -> Self {
        Self {
            textures,
            order: None,
            len: textures.len(),
            position: 0,
        }
    }

    /// Runs over `textures` visited through the index permutation `order`.
    pub fn with_order(textures: &'a [TextureId], order: &'a [u32]) -> Self {
        Self {
            textures,
            order: Some(order),
            len: order.len(),
            position: 0,
        }
    }

    fn texture_at(&self, position: usize) -> TextureId {
        match self.order {
            Some(order) => self.textures[order[position] as usize],
            None => self.textures[position],
        }
    }
}

impl Iterator for TextureRuns<'_> {
    type Item = (TextureId, Range<u32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.len {
            return None;
        }

        let start = self.position;
        let texture = self.texture_at(start);
        self.position += 1;
        while self.position < self.len && self.texture_at(self.position) == texture {
            self.position += 1;
        }
        Some((texture, start as u32..self.position as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<TextureId> {
        raw.iter().copied().map(TextureId).collect()
    }

    #[test]
    fn empty_yields_nothing() {
        let textures = ids(&[]);
        assert_eq!(TextureRuns::new(&textures).count(), 0);
    }

    #[test]
    fn distinct_textures_one_run_each() {
        let textures = ids(&[1, 2, 3]);
        let runs: Vec<_> = TextureRuns::new(&textures).collect();
        assert_eq!(
            runs,
            vec![
                (TextureId(1), 0..1),
                (TextureId(2), 1..2),
                (TextureId(3), 2..3),
            ]
        );
    }

    #[test]
    fn consecutive_repeats_coalesce() {
        let textures = ids(&[5, 5, 5, 8, 8, 5]);
        let runs: Vec<_> = TextureRuns::new(&textures).collect();
        assert_eq!(
            runs,
            vec![
                (TextureId(5), 0..3),
                (TextureId(8), 3..5),
                (TextureId(5), 5..6),
            ]
        );
    }

    #[test]
    fn permutation_regroups() {
        let textures = ids(&[1, 2, 1, 2]);
        let order = [0u32, 2, 1, 3];
        let runs: Vec<_> = TextureRuns::with_order(&textures, &order).collect();
        assert_eq!(runs, vec![(TextureId(1), 0..2), (TextureId(2), 2..4)]);
    }
}
