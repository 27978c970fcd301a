//! Textured sprites and the display list that owns them.

use glam::Vec2;

use crate::anims::AnimationState;
use crate::physics::Body;

/// Stable handle to a sprite in a [`SpriteList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

/// Seconds over which a sprite with a lifetime fades out before removal.
pub const FADE_OUT_SECS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Sprite {
    id: SpriteId,
    /// Centre of the sprite in world pixels.
    pub position: Vec2,
    pub texture: String,
    pub frame: u32,
    pub scale: Vec2,
    pub alpha: f32,
    pub depth: f32,
    pub visible: bool,
    pub anims: AnimationState,
    pub body: Option<Body>,
    /// Seconds left to live; `None` lives for the whole scene.
    pub lifetime: Option<f32>,
}

impl Sprite {
    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = Vec2::splat(scale);
        self
    }

    pub fn set_frame(&mut self, frame: u32) -> &mut Self {
        self.frame = frame;
        self
    }

    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.depth = depth;
        self
    }

    /// Remove the sprite after `secs`, fading over the final second.
    pub fn set_lifetime(&mut self, secs: f32) -> &mut Self {
        self.lifetime = Some(secs.max(0.0));
        self
    }

    /// Count down the lifetime. Returns `false` once the sprite has expired.
    pub fn age(&mut self, dt: f32) -> bool {
        let Some(left) = self.lifetime.as_mut() else {
            return true;
        };
        *left -= dt;
        if *left <= 0.0 {
            return false;
        }
        self.alpha = (*left / FADE_OUT_SECS).min(1.0);
        true
    }
}

/// Sprites in display order: later entries draw on top at equal depth.
#[derive(Debug, Default)]
pub struct SpriteList {
    sprites: Vec<Sprite>,
    next_id: u32,
}

impl SpriteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite at the top of the display list.
    pub fn add(&mut self, position: Vec2, texture: &str, frame: u32) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push(Sprite {
            id,
            position,
            texture: texture.to_string(),
            frame,
            scale: Vec2::ONE,
            alpha: 1.0,
            depth: 0.0,
            visible: true,
            anims: AnimationState::new(),
            body: None,
            lifetime: None,
        });
        id
    }

    fn index_of(&self, id: SpriteId) -> Option<usize> {
        self.sprites.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    /// Move a sprite to the end of the display list.
    pub fn bring_to_top(&mut self, id: SpriteId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                let sprite = self.sprites.remove(i);
                self.sprites.push(sprite);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        self.index_of(id).map(|i| self.sprites.remove(i))
    }

    /// Age every sprite and drop the expired ones. Returns how many went.
    pub fn expire(&mut self, dt: f32) -> usize {
        let before = self.sprites.len();
        self.sprites.retain_mut(|s| s.age(dt));
        before - self.sprites.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Display position of `id`, 0 being the bottom.
    pub fn display_index(&self, id: SpriteId) -> Option<usize> {
        self.index_of(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bring_to_top_reorders() {
        let mut list = SpriteList::new();
        let player = list.add(Vec2::ZERO, "characters", 1);
        let poop = list.add(Vec2::ZERO, "poop", 0);
        assert_eq!(list.display_index(poop), Some(1));
        assert!(list.bring_to_top(player));
        assert_eq!(list.display_index(player), Some(1));
        assert_eq!(list.display_index(poop), Some(0));
    }

    #[test]
    fn ids_stay_valid_after_removal() {
        let mut list = SpriteList::new();
        let a = list.add(Vec2::ZERO, "a", 0);
        let b = list.add(Vec2::ZERO, "b", 0);
        assert!(list.remove(a).is_some());
        assert_eq!(list.get(b).map(|s| s.texture.as_str()), Some("b"));
        assert!(list.get(a).is_none());
        assert!(!list.bring_to_top(a));
    }

    #[test]
    fn lifetime_fades_then_expires() {
        let mut list = SpriteList::new();
        let id = list.add(Vec2::ZERO, "poop", 0);
        list.get_mut(id).unwrap().set_lifetime(2.0);

        assert_eq!(list.expire(0.5), 0);
        assert_eq!(list.get(id).unwrap().alpha, 1.0);

        assert_eq!(list.expire(1.0), 0);
        assert!((list.get(id).unwrap().alpha - 0.5).abs() < 1e-5);

        assert_eq!(list.expire(0.6), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn sprites_without_lifetime_persist() {
        let mut list = SpriteList::new();
        list.add(Vec2::ZERO, "characters", 1);
        assert_eq!(list.expire(1000.0), 0);
        assert_eq!(list.len(), 1);
    }
}
