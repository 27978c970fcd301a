use std::collections::HashMap;

use glam::Vec2;
use image::{Rgba, RgbaImage};

// ── Built-in bitmap font ─────────────────────────────────────────────────────

/// Glyph cell size in the generated atlas, including one pixel of spacing.
const CELL_W: u32 = 6;
const CELL_H: u32 = 8;
const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ATLAS_COLS: u32 = 16;

/// 5×7 glyphs, one `u8` per row with the leftmost pixel in bit 4.
#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0, 0, 0, 0, 0, 0, 0]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('.', [0, 0, 0, 0, 0, 0b01100, 0b01100]),
    (',', [0, 0, 0, 0, 0b01100, 0b00100, 0b01000]),
    (':', [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0]),
    ('-', [0, 0, 0, 0b11111, 0, 0, 0]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100]),
    ('%', [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
    ('/', [0, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0]),
    ('(', [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010]),
    (')', [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000]),
];

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics for a single character in the bitmap font atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub id: char,
    /// Top-left pixel of the glyph region in the atlas.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// How far to advance the cursor after drawing this glyph.
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// A bitmap font plus the atlas image its glyph rectangles point into.
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    /// Vertical distance between successive baselines in pixels.
    pub line_height: u32,
    pub atlas: RgbaImage,
}

impl Font {
    /// The 5×7 pixel font compiled into the binary. Glyphs are white with
    /// transparent background so a tint colours them.
    pub fn builtin() -> Self {
        let rows = (GLYPHS.len() as u32).div_ceil(ATLAS_COLS);
        let mut atlas = RgbaImage::new(ATLAS_COLS * CELL_W, rows * CELL_H);
        let mut glyphs = HashMap::with_capacity(GLYPHS.len());

        for (i, (ch, bits)) in GLYPHS.iter().enumerate() {
            let x0 = (i as u32 % ATLAS_COLS) * CELL_W;
            let y0 = (i as u32 / ATLAS_COLS) * CELL_H;
            for (dy, row) in bits.iter().enumerate() {
                for dx in 0..GLYPH_W {
                    if row & (1 << (GLYPH_W - 1 - dx)) != 0 {
                        atlas.put_pixel(x0 + dx, y0 + dy as u32, Rgba([255, 255, 255, 255]));
                    }
                }
            }
            glyphs.insert(*ch, Glyph {
                id: *ch,
                x: x0,
                y: y0,
                width: GLYPH_W,
                height: GLYPH_H,
                x_advance: CELL_W,
            });
        }

        Self { glyphs, line_height: CELL_H, atlas }
    }

    /// Glyph for `ch`, falling back to its uppercase form.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&ch.to_ascii_uppercase()))
    }

    /// Pixel width of the widest line of `text` at `font_size`.
    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        if self.line_height == 0 {
            return 0.0;
        }
        let scale = font_size / self.line_height as f32;
        text.lines()
            .map(|line| line.chars().filter_map(|c| self.glyph(c)).map(|g| g.x_advance).sum::<u32>())
            .max()
            .unwrap_or(0) as f32
            * scale
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// One positioned glyph: a quad in pixels plus its atlas UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub min: Vec2,
    pub size: Vec2,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Lay out `text` with its top-left at `start`.
///
/// - `font_size` is the desired line height; glyphs scale uniformly by
///   `font_size / font.line_height`.
/// - `'\n'` returns to `start.x` and moves down one line.
/// - Characters the font lacks are skipped without advancing.
/// - Spaces advance but produce no quad.
pub fn layout_text(text: &str, font: &Font, start: Vec2, font_size: f32) -> Vec<GlyphQuad> {
    if font.line_height == 0 {
        return Vec::new();
    }
    let scale = font_size / font.line_height as f32;
    let tw = font.atlas.width() as f32;
    let th = font.atlas.height() as f32;

    let mut quads = Vec::new();
    let mut cursor = start;
    for ch in text.chars() {
        if ch == '\n' {
            cursor = Vec2::new(start.x, cursor.y + font.line_height as f32 * scale);
            continue;
        }
        let Some(glyph) = font.glyph(ch) else {
            continue;
        };
        if ch != ' ' {
            quads.push(GlyphQuad {
                min: cursor,
                size: Vec2::new(glyph.width as f32, glyph.height as f32) * scale,
                uv_min: [glyph.x as f32 / tw, glyph.y as f32 / th],
                uv_max: [(glyph.x + glyph.width) as f32 / tw, (glyph.y + glyph.height) as f32 / th],
            });
        }
        cursor.x += glyph.x_advance as f32 * scale;
    }
    quads
}
