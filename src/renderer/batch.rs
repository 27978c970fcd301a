//! CPU-side quad batching.
//!
//! Everything on screen is a textured quad. Consecutive quads that share a
//! texture and a coordinate space are merged into one [`DrawBatch`], so the
//! painter's order of the calls is the order on screen.

use glam::Vec2;

use super::pipeline::TileVertex;
use super::texture::{TextureId, WHITE_TEXTURE};
use crate::graphics::Color;

/// Which projection a batch is drawn with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Space {
    /// Scrolls with the camera.
    World,
    /// Fixed to the window, in pixels from the top-left.
    Screen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawBatch {
    pub texture: TextureId,
    pub space: Space,
    pub vertices: Vec<TileVertex>,
}

/// Accumulates quads into batches.
#[derive(Default, Debug)]
pub struct BatchBuilder {
    batches: Vec<DrawBatch>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn target(&mut self, texture: TextureId, space: Space) -> &mut Vec<TileVertex> {
        let reuse = matches!(self.batches.last(), Some(b) if b.texture == texture && b.space == space);
        if !reuse {
            self.batches.push(DrawBatch { texture, space, vertices: Vec::new() });
        }
        let last = self.batches.len() - 1;
        &mut self.batches[last].vertices
    }

    /// Axis-aligned textured quad with its top-left corner at `min`.
    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        texture: TextureId,
        space: Space,
        min: Vec2,
        size: Vec2,
        uv_min: [f32; 2],
        uv_max: [f32; 2],
        color: Color,
    ) {
        let max = min + size;
        let corners = [
            ([min.x, min.y], [uv_min[0], uv_min[1]]),
            ([max.x, min.y], [uv_max[0], uv_min[1]]),
            ([min.x, max.y], [uv_min[0], uv_max[1]]),
            ([max.x, max.y], [uv_max[0], uv_max[1]]),
        ];
        push_corners(self.target(texture, space), corners, color);
    }

    pub fn fill_rect(&mut self, space: Space, min: Vec2, size: Vec2, color: Color) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        self.quad(WHITE_TEXTURE, space, min, size, [0.0, 0.0], [1.0, 1.0], color);
    }

    /// Outline drawn inside the rectangle.
    pub fn stroke_rect(&mut self, space: Space, min: Vec2, size: Vec2, thickness: f32, color: Color) {
        let t = thickness.min(size.x * 0.5).min(size.y * 0.5);
        if t <= 0.0 {
            return;
        }
        let inner_h = size.y - 2.0 * t;
        self.fill_rect(space, min, Vec2::new(size.x, t), color);
        self.fill_rect(space, Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color);
        self.fill_rect(space, Vec2::new(min.x, min.y + t), Vec2::new(t, inner_h), color);
        self.fill_rect(space, Vec2::new(min.x + size.x - t, min.y + t), Vec2::new(t, inner_h), color);
    }

    /// A line segment as a quad `thickness` wide, centred on the segment.
    pub fn line(&mut self, space: Space, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let dir = (to - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let n = dir.perp() * (thickness * 0.5);
        let corners = [
            ((from - n).to_array(), [0.0, 0.0]),
            ((to - n).to_array(), [1.0, 0.0]),
            ((from + n).to_array(), [0.0, 1.0]),
            ((to + n).to_array(), [1.0, 1.0]),
        ];
        push_corners(self.target(WHITE_TEXTURE, space), corners, color);
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn finish(self) -> Vec<DrawBatch> {
        self.batches
    }
}

/// Two triangles from corners ordered TL, TR, BL, BR.
fn push_corners(out: &mut Vec<TileVertex>, c: [([f32; 2], [f32; 2]); 4], color: Color) {
    for i in [0, 1, 2, 1, 3, 2] {
        out.push(TileVertex { position: c[i].0, uv: c[i].1, color: color.0 });
    }
}
