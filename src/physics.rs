//! Arcade physics: axis-aligned bodies moving against solid tiles.
//!
//! Each step integrates velocity and then resolves collisions one axis at a
//! time, so a body pressed into a wall diagonally keeps sliding along it.

use glam::Vec2;
use tracing::info;

use crate::graphics::{Color, Graphics};
use crate::sprite::{SpriteId, SpriteList};
use crate::tilemap::StaticLayer;

/// Largest distance a body travels in one collision sub-step.
/// Kept below half a 16px tile so fast bodies cannot skip a wall.
pub const MAX_SUBSTEP: f32 = 7.0;

// ── AABB ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }
}

// ── Solid query ─────────────────────────────────────────────────────────────

/// Anything a body can collide with.
pub trait SolidTiles {
    /// World rectangles of every solid cell overlapping `area`.
    fn solids_in(&self, area: &Aabb) -> Vec<Aabb>;
}

impl SolidTiles for StaticLayer {
    fn solids_in(&self, area: &Aabb) -> Vec<Aabb> {
        self.colliding_tiles_in(area)
    }
}

// ── Body ────────────────────────────────────────────────────────────────────

/// Which sides touched a solid during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Blocked {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub size: Vec2,
    /// Offset of the body centre from the sprite centre.
    pub offset: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub blocked: Blocked,
}

impl Body {
    pub fn new(size: Vec2) -> Self {
        Self { size, offset: Vec2::ZERO, velocity: Vec2::ZERO, blocked: Blocked::default() }
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.velocity.y = y;
    }

    /// World rectangle of the body for a sprite centred at `position`.
    pub fn bounds(&self, position: Vec2) -> Aabb {
        Aabb::from_center(position + self.offset, self.size * 0.5)
    }
}

/// Move a body by `velocity * dt` from `position`, stopping at solids.
///
/// X is resolved before Y. A blocked axis has its velocity zeroed, its
/// `blocked` flag set and the body placed flush against the solid. Returns
/// the new sprite position.
pub fn move_with_collision(body: &mut Body, position: Vec2, dt: f32, solids: &[&dyn SolidTiles]) -> Vec2 {
    body.blocked = Blocked::default();
    let half = body.size * 0.5;
    let delta = body.velocity * dt;
    let steps = (delta.abs().max_element() / MAX_SUBSTEP).ceil().max(1.0) as u32;
    let step = delta / steps as f32;

    let mut pos = position;
    for _ in 0..steps {
        if step.x != 0.0 && body.velocity.x != 0.0 {
            pos.x += step.x;
            let aabb = body.bounds(pos);
            let hits = collect_hits(&aabb, solids);
            if !hits.is_empty() {
                if step.x > 0.0 {
                    let wall = hits.iter().map(|h| h.min.x).fold(f32::INFINITY, f32::min);
                    pos.x = wall - half.x - body.offset.x;
                    body.blocked.right = true;
                } else {
                    let wall = hits.iter().map(|h| h.max.x).fold(f32::NEG_INFINITY, f32::max);
                    pos.x = wall + half.x - body.offset.x;
                    body.blocked.left = true;
                }
                body.velocity.x = 0.0;
            }
        }

        if step.y != 0.0 && body.velocity.y != 0.0 {
            pos.y += step.y;
            let aabb = body.bounds(pos);
            let hits = collect_hits(&aabb, solids);
            if !hits.is_empty() {
                if step.y > 0.0 {
                    let floor = hits.iter().map(|h| h.min.y).fold(f32::INFINITY, f32::min);
                    pos.y = floor - half.y - body.offset.y;
                    body.blocked.down = true;
                } else {
                    let ceiling = hits.iter().map(|h| h.max.y).fold(f32::NEG_INFINITY, f32::max);
                    pos.y = ceiling + half.y - body.offset.y;
                    body.blocked.up = true;
                }
                body.velocity.y = 0.0;
            }
        }
    }
    pos
}

fn collect_hits(aabb: &Aabb, solids: &[&dyn SolidTiles]) -> Vec<Aabb> {
    solids
        .iter()
        .flat_map(|s| s.solids_in(aabb))
        .filter(|hit| hit.overlaps(aabb))
        .collect()
}

// ── World ───────────────────────────────────────────────────────────────────

/// Index of a layer registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Collider {
    sprite: SpriteId,
    layer: LayerId,
}

const DEBUG_BODY_COLOR: Color = Color::MAGENTA;
const DEBUG_VELOCITY_COLOR: Color = Color::GREEN;

/// Owns gravity, collider pairs and the optional debug overlay.
#[derive(Debug)]
pub struct ArcadeWorld {
    pub gravity: Vec2,
    colliders: Vec<Collider>,
    debug: Option<Graphics>,
}

impl ArcadeWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity, colliders: Vec::new(), debug: None }
    }

    /// Make `sprite`'s body collide with the solid tiles of `layer`.
    pub fn add_collider(&mut self, sprite: SpriteId, layer: LayerId) {
        let collider = Collider { sprite, layer };
        if !self.colliders.contains(&collider) {
            self.colliders.push(collider);
        }
    }

    /// Turn on body outlines and velocity vectors. Idempotent.
    pub fn create_debug_graphic(&mut self) {
        if self.debug.is_none() {
            info!("physics debug graphic enabled");
            let mut graphics = Graphics::new();
            graphics.set_depth(f32::MAX);
            self.debug = Some(graphics);
        }
    }

    pub fn debug_graphic(&self) -> Option<&Graphics> {
        self.debug.as_ref()
    }

    /// Advance every body in `sprites` by `dt` seconds.
    pub fn step(&mut self, dt: f32, sprites: &mut SpriteList, layers: &[StaticLayer]) {
        let gravity = self.gravity;
        for sprite in sprites.iter_mut() {
            let id = sprite.id();
            let Some(body) = sprite.body.as_mut() else {
                continue;
            };
            body.velocity += gravity * dt;

            let solids: Vec<&dyn SolidTiles> = self
                .colliders
                .iter()
                .filter(|c| c.sprite == id)
                .filter_map(|c| layers.get(c.layer.0))
                .map(|layer| layer as &dyn SolidTiles)
                .collect();
            sprite.position = move_with_collision(body, sprite.position, dt, &solids);
        }

        if let Some(graphics) = self.debug.as_mut() {
            graphics.clear();
            for sprite in sprites.iter() {
                let Some(body) = sprite.body.as_ref() else {
                    continue;
                };
                let aabb = body.bounds(sprite.position);
                graphics.stroke_rect(aabb.min, aabb.size(), 1.0, DEBUG_BODY_COLOR);
                let centre = aabb.center();
                // Line length is a tenth of a second of travel.
                graphics.line(centre, centre + body.velocity * 0.1, 1.0, DEBUG_VELOCITY_COLOR);
            }
        }
    }
}
