//! Colours and the immediate shape list used for debug overlays.

use glam::Vec2;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const MAGENTA: Self = Self([1.0, 0.0, 1.0, 1.0]);
    pub const TRANSPARENT: Self = Self([0.0, 0.0, 0.0, 0.0]);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r, g, b, a * alpha])
    }
}

// ── Graphics ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    FillRect { min: Vec2, size: Vec2, color: Color },
    StrokeRect { min: Vec2, size: Vec2, thickness: f32, color: Color },
    Line { from: Vec2, to: Vec2, thickness: f32, color: Color },
}

/// A world-space list of flat shapes drawn in one go.
///
/// Shapes accumulate until [`Graphics::clear`]; `alpha` multiplies every
/// shape colour and `depth` orders the object against sprites.
#[derive(Clone, Debug)]
pub struct Graphics {
    pub alpha: f32,
    pub depth: f32,
    pub visible: bool,
    shapes: Vec<Shape>,
}

impl Default for Graphics {
    fn default() -> Self {
        Self { alpha: 1.0, depth: 0.0, visible: true, shapes: Vec::new() }
    }
}

impl Graphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.shapes.push(Shape::FillRect { min, size, color });
    }

    pub fn stroke_rect(&mut self, min: Vec2, size: Vec2, thickness: f32, color: Color) {
        self.shapes.push(Shape::StrokeRect { min, size, thickness, color });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.shapes.push(Shape::Line { from, to, thickness, color });
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
