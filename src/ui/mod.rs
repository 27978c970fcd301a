// ── HUD shapes & text ─────────────────────────────────────────────────────────
//
// Screen-fixed objects drawn after the world. Everything here is plain data;
// `Hud::draw` turns it into quads for the renderer.

use glam::Vec2;

use crate::graphics::Color;
use crate::renderer::batch::{BatchBuilder, Space};
use crate::renderer::text::{Font, GlyphQuad, layout_text};
use crate::renderer::texture::TextureId;

/// Default HUD text size in pixels, the line height of a 16 px canvas font.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

// ── Rectangle ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle with its origin at the top-left corner.
/// `scale_x` shrinks it toward the left edge, which is how meters fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub position: Vec2,
    pub size: Vec2,
    pub fill: Option<Color>,
    /// Line width and colour of the outline.
    pub stroke: Option<(f32, Color)>,
    pub scale_x: f32,
    pub visible: bool,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
            fill: None,
            stroke: None,
            scale_x: 1.0,
            visible: true,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, width: f32, color: Color) -> Self {
        self.stroke = Some((width, color));
        self
    }

    /// Horizontal scale, clamped to `[0, 1]`.
    pub fn set_scale_x(&mut self, scale: f32) {
        self.scale_x = scale.clamp(0.0, 1.0);
    }

    /// Size after `scale_x` is applied.
    pub fn display_size(&self) -> Vec2 {
        Vec2::new(self.size.x * self.scale_x, self.size.y)
    }
}

// ── TextLabel ─────────────────────────────────────────────────────────────────

/// Bitmap-font text with a cached layout.
///
/// The glyph quads are rebuilt only when the text or size change;
/// `set_text` with the current string is free.
#[derive(Debug, Clone)]
pub struct TextLabel {
    text: String,
    position: Vec2,
    pub color: Color,
    font_size: f32,
    quads: Vec<GlyphQuad>,
    dirty: bool,
    pub visible: bool,
}

impl TextLabel {
    pub fn new(x: f32, y: f32, text: &str) -> Self {
        Self {
            text: text.to_owned(),
            position: Vec2::new(x, y),
            color: Color::WHITE,
            font_size: DEFAULT_FONT_SIZE,
            quads: Vec::new(),
            dirty: true,
            visible: true,
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self.dirty = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_owned();
            self.dirty = true;
        }
    }

    /// Glyph quads for the current text, laid out with `font` on demand.
    pub fn quads(&mut self, font: &Font) -> &[GlyphQuad] {
        if self.dirty {
            self.quads = layout_text(&self.text, font, self.position, self.font_size);
            self.dirty = false;
        }
        &self.quads
    }
}

// ── Hud ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Rect(usize),
    Label(usize),
}

/// HUD objects, drawn in the order they were added.
#[derive(Debug, Default)]
pub struct Hud {
    rects: Vec<Rectangle>,
    labels: Vec<TextLabel>,
    order: Vec<Item>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rectangle(&mut self, rect: Rectangle) -> RectId {
        self.rects.push(rect);
        let id = self.rects.len() - 1;
        self.order.push(Item::Rect(id));
        RectId(id)
    }

    pub fn add_text(&mut self, label: TextLabel) {
        self.labels.push(label);
        self.order.push(Item::Label(self.labels.len() - 1));
    }

    pub fn rect(&self, id: RectId) -> Option<&Rectangle> {
        self.rects.get(id.0)
    }

    pub fn rect_mut(&mut self, id: RectId) -> Option<&mut Rectangle> {
        self.rects.get_mut(id.0)
    }

    /// Append every visible object to `batch` in screen space.
    pub fn draw(&mut self, font: &Font, font_texture: TextureId, batch: &mut BatchBuilder) {
        for item in &self.order {
            match *item {
                Item::Rect(i) => {
                    let rect = &self.rects[i];
                    if !rect.visible {
                        continue;
                    }
                    let size = rect.display_size();
                    if let Some(fill) = rect.fill {
                        batch.fill_rect(Space::Screen, rect.position, size, fill);
                    }
                    if let Some((width, color)) = rect.stroke {
                        batch.stroke_rect(Space::Screen, rect.position, size, width, color);
                    }
                }
                Item::Label(i) => {
                    let label = &mut self.labels[i];
                    if !label.visible {
                        continue;
                    }
                    let color = label.color;
                    for q in label.quads(font) {
                        batch.quad(font_texture, Space::Screen, q.min, q.size, q.uv_min, q.uv_max, color);
                    }
                }
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_x_is_clamped() {
        let mut bar = Rectangle::new(4.0, 4.0, 148.0, 18.0);
        bar.set_scale_x(1.5);
        assert_eq!(bar.scale_x, 1.0);
        bar.set_scale_x(-0.5);
        assert_eq!(bar.scale_x, 0.0);
    }

    #[test]
    fn set_same_text_keeps_cache() {
        let font = Font::builtin();
        let mut label = TextLabel::new(5.0, 3.0, "Hunger");
        assert_eq!(label.quads(&font).len(), 6);
        label.set_text("Hunger");
        assert!(!label.dirty);
        label.set_text("Hungry");
        assert!(label.dirty);
    }

    #[test]
    fn default_size_is_a_16px_line() {
        let font = Font::builtin();
        let mut label = TextLabel::new(5.0, 3.0, "H");
        let quad = label.quads(&font)[0];
        assert_eq!(quad.size.y, 14.0);
        assert_eq!(quad.min, Vec2::new(5.0, 3.0));
        assert!(quad.min.y + quad.size.y <= 3.0 + DEFAULT_FONT_SIZE);
    }

    #[test]
    fn visible_labels_are_drawn() {
        let font = Font::builtin();
        let mut hud = Hud::new();
        hud.add_rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0).with_fill(Color::RED));
        hud.add_text(TextLabel::new(0.0, 0.0, "A"));
        let mut batch = BatchBuilder::new();
        hud.draw(&font, TextureId(1), &mut batch);
        assert!(!batch.is_empty());
    }

    #[test]
    fn hidden_items_are_not_drawn() {
        let font = Font::builtin();
        let mut hud = Hud::new();
        let r = hud.add_rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0).with_fill(Color::RED));
        hud.rect_mut(r).unwrap().visible = false;
        let mut batch = BatchBuilder::new();
        hud.draw(&font, TextureId(1), &mut batch);
        assert!(batch.is_empty());
    }
}
