/// Playback tests for sprite animations.
///
/// `AnimationState::tick` only needs an `AnimationManager`, so no GPU or
/// window is involved.
use survive_and_poop::anims::{
    AnimationConfig, AnimationManager, AnimationState, Frames, Repeat, generate_frame_numbers,
};

const FPS: f32 = 10.0;
const STEP: f32 = 1.0 / FPS;

fn manager_with(key: &str, frames: Vec<u32>, repeat: Repeat) -> AnimationManager {
    let mut mgr = AnimationManager::new();
    mgr.create(
        AnimationConfig {
            key: key.into(),
            texture: "characters".into(),
            frames: Frames::List(frames),
            frame_rate: FPS,
            repeat,
        },
        48,
    )
    .unwrap();
    mgr
}

// ── play ─────────────────────────────────────────────────────────────────────

/// `play` returns the first frame so the sprite can show it immediately.
#[test]
fn play_starts_on_first_frame() {
    let mgr = manager_with("walk-left", generate_frame_numbers(12, 14), Repeat::Forever);
    let mut state = AnimationState::new();
    assert_eq!(state.play(mgr.get("walk-left").unwrap(), false), Some(12));
    assert!(state.is_playing());
    assert_eq!(state.current_key(), Some("walk-left"));
}

/// Re-playing the running animation with `ignore_if_playing` keeps the cursor.
#[test]
fn ignore_if_playing_keeps_progress() {
    let mgr = manager_with("walk-left", generate_frame_numbers(12, 14), Repeat::Forever);
    let anim = mgr.get("walk-left").unwrap();
    let mut state = AnimationState::new();
    state.play(anim, true);
    assert_eq!(state.tick(STEP * 1.01, &mgr), Some(13));
    assert_eq!(state.play(anim, true), None);
    assert_eq!(state.tick(STEP, &mgr), Some(14));
}

/// Without `ignore_if_playing` the animation restarts.
#[test]
fn play_without_ignore_restarts() {
    let mgr = manager_with("walk-left", generate_frame_numbers(12, 14), Repeat::Forever);
    let anim = mgr.get("walk-left").unwrap();
    let mut state = AnimationState::new();
    state.play(anim, false);
    state.tick(STEP * 1.01, &mgr);
    assert_eq!(state.play(anim, false), Some(12));
}

// ── tick ─────────────────────────────────────────────────────────────────────

/// Less than one frame of time produces no frame change.
#[test]
fn tick_below_frame_duration_is_silent() {
    let mgr = manager_with("walk-front", generate_frame_numbers(0, 2), Repeat::Forever);
    let mut state = AnimationState::new();
    state.play(mgr.get("walk-front").unwrap(), false);
    assert_eq!(state.tick(STEP * 0.5, &mgr), None);
    assert_eq!(state.tick(STEP * 0.6, &mgr), Some(1));
}

/// Looping animations wrap back to their first frame.
#[test]
fn forever_wraps_around() {
    let mgr = manager_with("walk-front", generate_frame_numbers(0, 2), Repeat::Forever);
    let mut state = AnimationState::new();
    state.play(mgr.get("walk-front").unwrap(), false);
    let mut seen = Vec::new();
    for _ in 0..6 {
        if let Some(f) = state.tick(STEP * 1.001, &mgr) {
            seen.push(f);
        }
    }
    assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
    assert!(state.is_playing());
}

/// `Repeat::Times(0)` plays once and stops on the last frame.
#[test]
fn play_once_stops_on_last_frame() {
    let mgr = manager_with("once", vec![3, 4], Repeat::Times(0));
    let mut state = AnimationState::new();
    state.play(mgr.get("once").unwrap(), false);
    assert_eq!(state.tick(STEP * 1.01, &mgr), Some(4));
    assert_eq!(state.tick(STEP * 5.0, &mgr), None);
    assert!(!state.is_playing());
}

/// A stopped animation never advances.
#[test]
fn stopped_state_does_not_tick() {
    let mgr = manager_with("walk-back", generate_frame_numbers(36, 38), Repeat::Forever);
    let mut state = AnimationState::new();
    state.play(mgr.get("walk-back").unwrap(), false);
    state.stop();
    assert_eq!(state.tick(1.0, &mgr), None);
    assert_eq!(state.current_key(), Some("walk-back"));
}

// ── manager ──────────────────────────────────────────────────────────────────

/// Registering a key twice keeps the first definition.
#[test]
fn duplicate_key_keeps_first_definition() {
    let mut mgr = manager_with("walk-right", generate_frame_numbers(24, 26), Repeat::Forever);
    mgr.create(
        AnimationConfig {
            key: "walk-right".into(),
            texture: "characters".into(),
            frames: Frames::List(vec![0]),
            frame_rate: 1.0,
            repeat: Repeat::Times(0),
        },
        48,
    )
    .unwrap();
    assert_eq!(mgr.get("walk-right").unwrap().frames, vec![24, 25, 26]);
}

/// An empty frame list is rejected.
#[test]
fn empty_frame_list_is_an_error() {
    let mut mgr = AnimationManager::new();
    let result = mgr.create(
        AnimationConfig {
            key: "nothing".into(),
            texture: "poop".into(),
            frames: Frames::List(Vec::new()),
            frame_rate: FPS,
            repeat: Repeat::Forever,
        },
        3,
    );
    assert!(result.is_err());
    assert!(!mgr.contains("nothing"));
}
