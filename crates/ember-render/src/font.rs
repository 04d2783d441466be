//! Glyph-metrics provider for text rendering.
//!
//! A [`SpriteFont`] maps characters to regions of a font atlas texture plus
//! the metrics needed to place them. Text drawing is nothing special at the
//! batching layer: [`SpriteBatch::draw_string`](crate::SpriteBatch::draw_string)
//! decomposes a string into per-glyph quad requests that flow through the
//! same pipeline as any other sprite. No shaping or kerning-pair logic lives
//! here; the metrics are external inputs baked by the font pipeline.

use ahash::AHashMap;
use ember_core::geometry::Rect;
use glam::Vec2;

use crate::error::{RenderError, RenderResult};
use crate::texture::Texture2D;

/// Horizontal metrics for one glyph: space before the quad, the quad's
/// advance width, and space after.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphKerning {
    pub left: f32,
    pub width: f32,
    pub right: f32,
}

/// One character's placement data within the font atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Source rectangle in atlas pixels.
    pub source: Rect<f32>,
    /// Offset from the pen position to the quad's top-left corner.
    pub cropping: Vec2,
    /// Horizontal advance metrics.
    pub kerning: GlyphKerning,
}

/// A bitmap font: an atlas texture plus per-character glyph metrics.
#[derive(Debug, Clone)]
pub struct SpriteFont {
    texture: Texture2D,
    glyphs: AHashMap<char, Glyph>,
    line_spacing: f32,
    spacing: f32,
    default_character: Option<char>,
}

impl SpriteFont {
    pub fn new(
        texture: Texture2D,
        line_spacing: f32,
        spacing: f32,
        default_character: Option<char>,
    ) -> Self {
        Self {
            texture,
            glyphs: AHashMap::new(),
            line_spacing,
            spacing,
            default_character,
        }
    }

    /// Register a glyph for `character`, replacing any previous entry.
    pub fn insert_glyph(&mut self, character: char, glyph: Glyph) {
        self.glyphs.insert(character, glyph);
    }

    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    /// Vertical distance between baselines.
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    /// Extra horizontal distance inserted after every glyph.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Look up `character`, falling back to the default character if one is
    /// declared. A miss with no fallback is an error, never skipped silently.
    pub fn glyph(&self, character: char) -> RenderResult<&Glyph> {
        if let Some(glyph) = self.glyphs.get(&character) {
            return Ok(glyph);
        }
        self.default_character
            .and_then(|c| self.glyphs.get(&c))
            .ok_or(RenderError::MissingGlyph(character))
    }

    /// Walk `text` glyph by glyph, invoking `emit` with each glyph and its
    /// pen-relative offset. `'\n'` advances to the next line and carriage
    /// returns are ignored; every other character must resolve to a glyph.
    pub fn for_each_glyph(
        &self,
        text: &str,
        mut emit: impl FnMut(&Glyph, Vec2) -> RenderResult<()>,
    ) -> RenderResult<()> {
        let mut pen = Vec2::ZERO;
        for c in text.chars() {
            match c {
                '\n' => {
                    pen.x = 0.0;
                    pen.y += self.line_spacing;
                }
                '\r' => {}
                _ => {
                    let glyph = self.glyph(c)?;
                    pen.x += glyph.kerning.left;
                    emit(glyph, pen + glyph.cropping)?;
                    pen.x += glyph.kerning.width + glyph.kerning.right + self.spacing;
                }
            }
        }
        Ok(())
    }

    /// Measure the pixel bounds of `text` using the same walk as
    /// [`SpriteBatch::draw_string`](crate::SpriteBatch::draw_string).
    ///
    /// A character that would make `draw_string` fail fails measurement the
    /// same way.
    pub fn measure_string(&self, text: &str) -> RenderResult<Vec2> {
        if text.is_empty() {
            return Ok(Vec2::ZERO);
        }
        let mut size = Vec2::new(0.0, self.line_spacing);
        self.for_each_glyph(text, |glyph, offset| {
            size.x = size.x.max(offset.x + glyph.source.width);
            size.y = size.y.max(offset.y + self.line_spacing);
            Ok(())
        })?;
        Ok(size)
    }
}
