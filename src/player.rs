//! Player movement and animation selection from the cursor keys.

use glam::Vec2;

use crate::input::Cursors;

/// Direction the character sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
    /// Walking away from the camera (up the screen).
    Back,
    /// Walking toward the camera (down the screen).
    Front,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Left, Facing::Right, Facing::Back, Facing::Front];

    pub fn walk_key(self) -> &'static str {
        match self {
            Facing::Left => "walk-left",
            Facing::Right => "walk-right",
            Facing::Back => "walk-back",
            Facing::Front => "walk-front",
        }
    }

    /// Standing frame of the `characters` sheet.
    pub fn idle_frame(self) -> u32 {
        match self {
            Facing::Left => 13,
            Facing::Right => 25,
            Facing::Back => 37,
            Facing::Front => 1,
        }
    }

    /// First and last frame of the walk cycle.
    pub fn walk_frames(self) -> (u32, u32) {
        match self {
            Facing::Left => (12, 14),
            Facing::Right => (24, 26),
            Facing::Back => (36, 38),
            Facing::Front => (0, 2),
        }
    }

    /// Facing implied by a velocity, horizontal first. `None` when still.
    pub fn from_velocity(velocity: Vec2) -> Option<Facing> {
        if velocity.x < 0.0 {
            Some(Facing::Left)
        } else if velocity.x > 0.0 {
            Some(Facing::Right)
        } else if velocity.y < 0.0 {
            Some(Facing::Back)
        } else if velocity.y > 0.0 {
            Some(Facing::Front)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationChoice {
    Walk(Facing),
    /// Stop animating; show the idle frame for the facing if there is one,
    /// otherwise keep the current frame.
    Idle(Option<Facing>),
}

/// Raw per-axis velocity from the held keys, before normalisation.
/// Left wins over right and up wins over down.
pub fn axis_velocity(keys: &Cursors, axis_speed: f32) -> Vec2 {
    let x = if keys.left {
        -axis_speed
    } else if keys.right {
        axis_speed
    } else {
        0.0
    };
    let y = if keys.up {
        -axis_speed
    } else if keys.down {
        axis_speed
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Velocity for this update: `speed` in the held direction, or zero.
/// Diagonals move no faster than straight lines.
pub fn movement_velocity(keys: &Cursors, axis_speed: f32, speed: f32) -> Vec2 {
    axis_velocity(keys, axis_speed).normalize_or_zero() * speed
}

/// Pick the animation for the held keys, falling back on the direction the
/// player was moving last update.
pub fn choose_animation(keys: &Cursors, prev_velocity: Vec2) -> AnimationChoice {
    if keys.left {
        AnimationChoice::Walk(Facing::Left)
    } else if keys.right {
        AnimationChoice::Walk(Facing::Right)
    } else if keys.up {
        AnimationChoice::Walk(Facing::Back)
    } else if keys.down {
        AnimationChoice::Walk(Facing::Front)
    } else {
        AnimationChoice::Idle(Facing::from_velocity(prev_velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_is_middle_of_walk_cycle() {
        for facing in Facing::ALL {
            let (start, end) = facing.walk_frames();
            assert_eq!(facing.idle_frame(), (start + end) / 2);
        }
    }

    #[test]
    fn opposite_keys_favour_left_and_up() {
        let keys = Cursors { left: true, right: true, up: true, down: true, ..Default::default() };
        assert_eq!(axis_velocity(&keys, 100.0), Vec2::new(-100.0, -100.0));
    }
}
