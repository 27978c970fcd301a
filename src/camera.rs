use glam::Vec2;

use crate::physics::Aabb;

/// Camera uniform uploaded to the GPU: the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2z/w`, `sy = -2z/h`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection mapping pixels `[0..w] × [0..h]` to clip
    /// space. Screen-space drawing (the HUD) uses this.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx,   0.0,  0.0, 0.0], // col0
                [0.0,  sy,   0.0, 0.0], // col1
                [0.0,  0.0,  1.0, 0.0], // col2
                [-1.0, 1.0,  0.0, 1.0], // col3
            ],
        }
    }
}

/// 2D camera centred on a world-space point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space pixel position at the centre of the screen.
    pub position: Vec2,
    /// 1.0 = 1:1, >1 zooms in.
    pub zoom: f32,
    /// Region the view is kept inside when following.
    pub bounds: Option<Aabb>,
}

impl Camera {
    /// A camera showing world `(0, 0)` at the top-left of a `width × height`
    /// viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self { position: Vec2::new(width * 0.5, height * 0.5), zoom: 1.0, bounds: None }
    }

    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = Some(bounds);
    }

    /// World size visible through a viewport of `viewport` pixels.
    pub fn view_size(&self, viewport: Vec2) -> Vec2 {
        viewport / self.zoom.max(0.01)
    }

    /// Centre on `target`, then pull back inside `bounds`. An axis where the
    /// bounds are smaller than the view is centred on the bounds instead.
    pub fn follow(&mut self, target: Vec2, viewport: Vec2) {
        self.position = target;
        let Some(bounds) = self.bounds else {
            return;
        };
        let half = self.view_size(viewport) * 0.5;
        let size = bounds.size();
        let centre = bounds.center();
        self.position.x = if size.x <= half.x * 2.0 {
            centre.x
        } else {
            target.x.clamp(bounds.min.x + half.x, bounds.max.x - half.x)
        };
        self.position.y = if size.y <= half.y * 2.0 {
            centre.y
        } else {
            target.y.clamp(bounds.min.y + half.y, bounds.max.y - half.y)
        };
    }

    /// World rectangle currently on screen.
    pub fn world_view(&self, viewport: Vec2) -> Aabb {
        Aabb::from_center(self.position, self.view_size(viewport) * 0.5)
    }

    /// Build the GPU-ready `CameraUniform` for the given viewport dimensions.
    ///
    /// The centre is snapped to whole pixels so tile edges stay crisp.
    /// ```text
    /// x_ndc = sx * world_x + tx    (sx = 2z/w,  tx = -sx*cx)
    /// y_ndc = sy * world_y + ty    (sy = -2z/h, ty = -sy*cy)
    /// ```
    pub fn build_view_proj(&self, width: f32, height: f32) -> CameraUniform {
        let cx = self.position.x.round();
        let cy = self.position.y.round();
        let z = self.zoom.max(0.01);

        let sx = 2.0 * z / width;
        let sy = -2.0 * z / height;
        let tx = -sx * cx;
        let ty = -sy * cy;

        CameraUniform {
            view_proj: [
                [sx,  0.0, 0.0, 0.0], // col0
                [0.0, sy,  0.0, 0.0], // col1
                [0.0, 0.0, 1.0, 0.0], // col2
                [tx,  ty,  0.0, 1.0], // col3
            ],
        }
    }
}
