//! Frame animations for spritesheet sprites.
//!
//! Animations are registered once in a global [`AnimationManager`] and shared
//! by key; every sprite carries its own [`AnimationState`] that tracks which
//! animation is running and where it is.

use std::collections::HashMap;

use tracing::debug;

use crate::error::AssetError;

/// Inclusive list of frame indices from `start` to `end`.
/// Counts down when `start > end`.
pub fn generate_frame_numbers(start: u32, end: u32) -> Vec<u32> {
    if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    }
}

// ── Definitions ─────────────────────────────────────────────────────────────

/// How many times an animation plays after its first run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    Times(u32),
}

impl Repeat {
    /// `-1` loops forever, anything else repeats that many extra times.
    pub fn from_count(count: i32) -> Self {
        if count < 0 { Repeat::Forever } else { Repeat::Times(count as u32) }
    }
}

/// Which frames of the texture an animation uses.
#[derive(Clone, Debug, PartialEq)]
pub enum Frames {
    List(Vec<u32>),
    /// Every frame of the texture, in order.
    All,
}

/// Input to [`AnimationManager::create`].
#[derive(Clone, Debug)]
pub struct AnimationConfig {
    pub key: String,
    pub texture: String,
    pub frames: Frames,
    /// Frames per second.
    pub frame_rate: f32,
    pub repeat: Repeat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub key: String,
    pub texture: String,
    pub frames: Vec<u32>,
    pub frame_rate: f32,
    pub repeat: Repeat,
}

impl Animation {
    /// Seconds each frame is shown for.
    pub fn frame_duration(&self) -> f32 {
        if self.frame_rate > 0.0 { 1.0 / self.frame_rate } else { f32::INFINITY }
    }
}

#[derive(Default, Debug)]
pub struct AnimationManager {
    anims: HashMap<String, Animation>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation. `frame_count` resolves `Frames::All` and bounds
    /// explicit lists; it is the number of frames in `config.texture`.
    ///
    /// Re-registering an existing key keeps the first definition.
    pub fn create(&mut self, config: AnimationConfig, frame_count: u32) -> Result<&Animation, AssetError> {
        let frames = match config.frames {
            Frames::All => (0..frame_count).collect(),
            Frames::List(list) => list,
        };
        if frames.is_empty() {
            return Err(AssetError::EmptyAnimation(config.key));
        }
        if let Some(&bad) = frames.iter().find(|&&f| f >= frame_count) {
            return Err(AssetError::FrameOutOfRange {
                texture: config.texture,
                frame: bad,
                frame_count,
            });
        }
        let key = config.key.clone();
        debug!(key = %key, texture = %config.texture, frames = frames.len(), "animation created");
        Ok(self.anims.entry(key).or_insert(Animation {
            key: config.key,
            texture: config.texture,
            frames,
            frame_rate: config.frame_rate,
            repeat: config.repeat,
        }))
    }

    pub fn get(&self, key: &str) -> Option<&Animation> {
        self.anims.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.anims.contains_key(key)
    }
}

// ── Playback ────────────────────────────────────────────────────────────────

/// Per-sprite playback cursor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    current: Option<String>,
    frame_index: usize,
    elapsed: f32,
    repeats_done: u32,
    playing: bool,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Key of the running (or last stopped) animation.
    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Start `anim` from its first frame and return that frame.
    ///
    /// With `ignore_if_playing`, a call for the animation that is already
    /// running is a no-op and returns `None`.
    pub fn play(&mut self, anim: &Animation, ignore_if_playing: bool) -> Option<u32> {
        if ignore_if_playing && self.playing && self.current.as_deref() == Some(anim.key.as_str()) {
            return None;
        }
        self.current = Some(anim.key.clone());
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.repeats_done = 0;
        self.playing = true;
        anim.frames.first().copied()
    }

    /// Freeze on the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advance by `dt` seconds. Returns the frame to display when it changed.
    pub fn tick(&mut self, dt: f32, anims: &AnimationManager) -> Option<u32> {
        if !self.playing {
            return None;
        }
        let anim = self.current.as_deref().and_then(|k| anims.get(k))?;
        let step = anim.frame_duration();
        if !step.is_finite() {
            return None;
        }

        self.elapsed += dt;
        let mut changed = false;
        while self.elapsed >= step {
            self.elapsed -= step;
            if self.frame_index + 1 < anim.frames.len() {
                self.frame_index += 1;
                changed = true;
                continue;
            }
            let loop_again = match anim.repeat {
                Repeat::Forever => true,
                Repeat::Times(n) => self.repeats_done < n,
            };
            if loop_again {
                self.repeats_done += 1;
                self.frame_index = 0;
                changed = true;
            } else {
                self.playing = false;
                self.elapsed = 0.0;
                break;
            }
        }

        if changed { anim.frames.get(self.frame_index).copied() } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> AnimationConfig {
        AnimationConfig {
            key: "walk-left".into(),
            texture: "characters".into(),
            frames: Frames::List(generate_frame_numbers(12, 14)),
            frame_rate: 10.0,
            repeat: Repeat::Forever,
        }
    }

    #[test]
    fn frame_numbers_are_inclusive() {
        assert_eq!(generate_frame_numbers(12, 14), vec![12, 13, 14]);
        assert_eq!(generate_frame_numbers(2, 0), vec![2, 1, 0]);
        assert_eq!(generate_frame_numbers(5, 5), vec![5]);
    }

    #[test]
    fn repeat_from_count() {
        assert_eq!(Repeat::from_count(-1), Repeat::Forever);
        assert_eq!(Repeat::from_count(2), Repeat::Times(2));
    }

    #[test]
    fn create_rejects_frames_past_sheet() {
        let mut mgr = AnimationManager::new();
        assert!(mgr.create(walk(), 13).is_err());
        assert!(mgr.create(walk(), 48).is_ok());
    }

    #[test]
    fn all_frames_resolves_against_sheet() {
        let mut mgr = AnimationManager::new();
        let anim = mgr
            .create(
                AnimationConfig {
                    key: "stink".into(),
                    texture: "poop".into(),
                    frames: Frames::All,
                    frame_rate: 10.0,
                    repeat: Repeat::Forever,
                },
                3,
            )
            .unwrap();
        assert_eq!(anim.frames, vec![0, 1, 2]);
    }
}
