//! The quad generator: one sprite record in, four vertices out.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::color::Color;

bitflags! {
    /// Mirroring applied to a sprite's texture coordinates.
    ///
    /// The two bits line up with the corner enumeration (bit 0 = x, bit 1 =
    /// y), so flipping is an XOR on the corner index. Applying the same flip
    /// twice restores the original assignment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpriteEffects: u32 {
        const FLIP_HORIZONTALLY = 1 << 0;
        const FLIP_VERTICALLY = 1 << 1;
    }
}

/// One queued draw request, recorded as a compact value.
///
/// The source rectangle is normalized at `draw` time by the texture
/// dimensions and never recomputed afterwards; rotation is stored as a
/// precomputed sin/cos pair so materialization never calls into libm.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRecord {
    /// Normalized source rectangle: u, v, width, height.
    pub source: [f32; 4],
    /// Destination rectangle in pixels: x, y, width, height.
    pub destination: [f32; 4],
    /// Rotation origin, normalized by the source rectangle size.
    pub origin: [f32; 2],
    pub rotation_sin: f32,
    pub rotation_cos: f32,
    /// Layer depth, written unchanged to the vertex z coordinate.
    pub depth: f32,
    pub color: Color,
    pub effects: SpriteEffects,
}

/// A single sprite vertex: position, packed color, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 3],
    pub color: Color,
    pub texcoord: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<SpriteVertex>(), 24);

impl SpriteVertex {
    /// Size of one vertex in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Returns the wgpu vertex buffer layout matching this format, for
    /// integrators building a render pipeline over the batcher's output.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            // location 0: position (vec3)
            0 => Float32x3,
            // location 1: color (unorm rgba8)
            1 => Unorm8x4,
            // location 2: texcoord (vec2)
            2 => Float32x2,
        ];

        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Corner enumeration in origin-relative unit space: top-left, top-right,
/// bottom-left, bottom-right. Bit 0 selects x, bit 1 selects y.
const CORNER_OFFSETS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Materialize the four vertices of `sprite` into `out`.
///
/// Rotation is always applied through the precomputed sin/cos pair; a zero
/// rotation is not special-cased. Texture coordinates are selected by
/// XOR-ing the corner index with the mirror bits before indexing the corner
/// table, then scaled and offset by the normalized source rectangle. No
/// allocation, no branching on sprite contents.
pub fn write_quad(sprite: &SpriteRecord, out: &mut [SpriteVertex; 4]) {
    let [u, v, uw, vh] = sprite.source;
    let [x, y, w, h] = sprite.destination;
    let (sin, cos) = (sprite.rotation_sin, sprite.rotation_cos);
    let flip = sprite.effects.bits() as usize;

    for (corner, vertex) in out.iter_mut().enumerate() {
        let dx = (CORNER_OFFSETS[corner][0] - sprite.origin[0]) * w;
        let dy = (CORNER_OFFSETS[corner][1] - sprite.origin[1]) * h;
        let uv = CORNER_OFFSETS[corner ^ flip];

        vertex.position = [
            x + dx * cos - dy * sin,
            y + dx * sin + dy * cos,
            sprite.depth,
        ];
        vertex.color = sprite.color;
        vertex.texcoord = [u + uv[0] * uw, v + uv[1] * vh];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SpriteRecord {
        SpriteRecord {
            source: [0.0, 0.0, 1.0, 1.0],
            destination: [10.0, 20.0, 30.0, 40.0],
            origin: [0.0, 0.0],
            rotation_sin: 0.0,
            rotation_cos: 1.0,
            depth: 0.5,
            color: Color::WHITE,
            effects: SpriteEffects::empty(),
        }
    }

    fn quad(sprite: &SpriteRecord) -> [SpriteVertex; 4] {
        let mut out = [SpriteVertex::zeroed(); 4];
        write_quad(sprite, &mut out);
        out
    }

    #[test]
    fn axis_aligned_positions() {
        let out = quad(&record());
        assert_eq!(out[0].position, [10.0, 20.0, 0.5]);
        assert_eq!(out[1].position, [40.0, 20.0, 0.5]);
        assert_eq!(out[2].position, [10.0, 60.0, 0.5]);
        assert_eq!(out[3].position, [40.0, 60.0, 0.5]);
    }

    #[test]
    fn quarter_turn_about_origin() {
        let mut sprite = record();
        sprite.destination = [0.0, 0.0, 10.0, 10.0];
        // 90 degrees counter-clockwise in screen space
        sprite.rotation_sin = 1.0;
        sprite.rotation_cos = 0.0;
        let out = quad(&sprite);
        assert_eq!(out[0].position, [0.0, 0.0, 0.5]);
        // top-right corner rotates onto the +y axis
        assert_eq!(out[1].position, [0.0, 10.0, 0.5]);
        assert_eq!(out[2].position, [-10.0, 0.0, 0.5]);
    }

    #[test]
    fn centered_origin_offsets_corners() {
        let mut sprite = record();
        sprite.destination = [100.0, 100.0, 20.0, 20.0];
        sprite.origin = [0.5, 0.5];
        let out = quad(&sprite);
        assert_eq!(out[0].position, [90.0, 90.0, 0.5]);
        assert_eq!(out[3].position, [110.0, 110.0, 0.5]);
    }

    #[test]
    fn source_rect_scales_texcoords() {
        let mut sprite = record();
        sprite.source = [0.25, 0.5, 0.25, 0.125];
        let out = quad(&sprite);
        assert_eq!(out[0].texcoord, [0.25, 0.5]);
        assert_eq!(out[1].texcoord, [0.5, 0.5]);
        assert_eq!(out[2].texcoord, [0.25, 0.625]);
        assert_eq!(out[3].texcoord, [0.5, 0.625]);
    }

    #[test]
    fn horizontal_flip_swaps_u() {
        let mut sprite = record();
        sprite.effects = SpriteEffects::FLIP_HORIZONTALLY;
        let out = quad(&sprite);
        let plain = quad(&record());
        assert_eq!(out[0].texcoord, plain[1].texcoord);
        assert_eq!(out[1].texcoord, plain[0].texcoord);
        assert_eq!(out[2].texcoord, plain[3].texcoord);
        assert_eq!(out[3].texcoord, plain[2].texcoord);
        // positions are untouched by mirroring
        assert_eq!(out[0].position, plain[0].position);
    }

    #[test]
    fn vertical_flip_swaps_v() {
        let mut sprite = record();
        sprite.effects = SpriteEffects::FLIP_VERTICALLY;
        let out = quad(&sprite);
        let plain = quad(&record());
        assert_eq!(out[0].texcoord, plain[2].texcoord);
        assert_eq!(out[2].texcoord, plain[0].texcoord);
    }

    #[test]
    fn flips_compose_independently() {
        // Both flips together must equal applying each on its own: the
        // combined table is the plain table with both corner bits inverted.
        let plain = quad(&record());
        let mut sprite = record();
        sprite.effects = SpriteEffects::FLIP_HORIZONTALLY | SpriteEffects::FLIP_VERTICALLY;
        let both = quad(&sprite);
        for corner in 0..4 {
            assert_eq!(both[corner].texcoord, plain[corner ^ 0b11].texcoord);
        }
    }

    #[test]
    fn shared_color_on_all_corners() {
        let mut sprite = record();
        sprite.color = Color::rgba(1, 2, 3, 4);
        for vertex in quad(&sprite) {
            assert_eq!(vertex.color, Color::rgba(1, 2, 3, 4));
        }
    }
}
