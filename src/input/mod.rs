use std::collections::{HashMap, HashSet};

pub use winit::keyboard::KeyCode;

/// Raw keyboard state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
    /// Engine time (ms) at which each held key went down.
    key_down_at: HashMap<KeyCode, f64>,
    /// Last interval slot `check_down` fired for, per key.
    throttle_slot: HashMap<KeyCode, i64>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press at engine time `now_ms`. Auto-repeat events for a
    /// key that is already held are ignored.
    pub fn press(&mut self, key: KeyCode, now_ms: f64) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
            self.key_down_at.insert(key, now_ms);
            self.throttle_slot.remove(&key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        if self.keys_held.remove(&key) {
            self.keys_released.insert(key);
        }
        self.key_down_at.remove(&key);
    }

    /// Forget everything currently held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        let held: Vec<KeyCode> = self.keys_held.iter().copied().collect();
        for key in held {
            self.release(key);
        }
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }

    /// Rate-limited "is down" query.
    ///
    /// Returns `true` on the first call after `key` goes down, then at most
    /// once per `duration_ms` for as long as it stays held. Intervals are
    /// measured from the moment of the press, not from the last `true`.
    pub fn check_down(&mut self, key: KeyCode, now_ms: f64, duration_ms: f64) -> bool {
        let Some(&down_at) = self.key_down_at.get(&key) else {
            return false;
        };
        let held_for = (now_ms - down_at).max(0.0);
        let slot = if duration_ms > 0.0 {
            (held_for / duration_ms).floor() as i64
        } else {
            held_for as i64
        };
        let last = self.throttle_slot.get(&key).copied().unwrap_or(-1);
        if slot > last {
            self.throttle_slot.insert(key, slot);
            true
        } else {
            false
        }
    }

    /// Snapshot of the cursor keys plus space and shift.
    pub fn cursors(&self) -> Cursors {
        Cursors {
            left: self.is_key_held(KeyCode::ArrowLeft),
            right: self.is_key_held(KeyCode::ArrowRight),
            up: self.is_key_held(KeyCode::ArrowUp),
            down: self.is_key_held(KeyCode::ArrowDown),
            space: self.is_key_held(KeyCode::Space),
            shift: self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight),
        }
    }
}

/// Held state of the cursor keys for one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursors {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub space: bool,
    pub shift: bool,
}

impl Cursors {
    pub fn any_direction(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}
