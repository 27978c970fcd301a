use survive_and_poop::input::{InputState, KeyCode};

const COOLDOWN: f64 = 500.0;

#[test]
fn press_is_edge_triggered() {
    let mut input = InputState::new();
    input.press(KeyCode::KeyD, 0.0);
    assert!(input.is_key_pressed(KeyCode::KeyD));
    assert!(input.is_key_held(KeyCode::KeyD));
    input.clear_frame_state();
    assert!(!input.is_key_pressed(KeyCode::KeyD));
    assert!(input.is_key_held(KeyCode::KeyD));
}

#[test]
fn auto_repeat_does_not_press_again() {
    let mut input = InputState::new();
    input.press(KeyCode::Space, 0.0);
    input.clear_frame_state();
    input.press(KeyCode::Space, 30.0);
    assert!(!input.is_key_pressed(KeyCode::Space));
}

#[test]
fn release_all_drops_held_keys() {
    let mut input = InputState::new();
    input.press(KeyCode::ArrowLeft, 0.0);
    input.press(KeyCode::ArrowUp, 0.0);
    input.release_all();
    assert!(!input.cursors().any_direction());
    assert!(input.is_key_released(KeyCode::ArrowLeft));
}

#[test]
fn cursors_reflect_held_keys() {
    let mut input = InputState::new();
    input.press(KeyCode::ArrowRight, 0.0);
    input.press(KeyCode::ShiftRight, 0.0);
    let c = input.cursors();
    assert!(c.right && c.shift);
    assert!(!c.left && !c.up && !c.down && !c.space);
}

// ── check_down ───────────────────────────────────────────────────────────────

#[test]
fn check_down_fires_once_per_interval() {
    let mut input = InputState::new();
    input.press(KeyCode::Space, 1000.0);

    let fired: Vec<f64> = (0..=75)
        .map(|i| 1000.0 + i as f64 * (1000.0 / 60.0))
        .filter(|&t| input.check_down(KeyCode::Space, t, COOLDOWN))
        .collect();

    // 1.25 s of holding: at press, +0.5 s, +1.0 s.
    assert_eq!(fired.len(), 3);
    assert_eq!(fired[0], 1000.0);
    assert!(fired[1] >= 1500.0 && fired[1] < 1520.0);
    assert!(fired[2] >= 2000.0 && fired[2] < 2020.0);
}

#[test]
fn check_down_is_false_for_keys_not_held() {
    let mut input = InputState::new();
    assert!(!input.check_down(KeyCode::Space, 0.0, COOLDOWN));
    input.press(KeyCode::Space, 0.0);
    input.release(KeyCode::Space);
    assert!(!input.check_down(KeyCode::Space, 10.0, COOLDOWN));
}

#[test]
fn repress_resets_the_interval() {
    let mut input = InputState::new();
    input.press(KeyCode::Space, 0.0);
    assert!(input.check_down(KeyCode::Space, 0.0, COOLDOWN));
    input.release(KeyCode::Space);
    input.press(KeyCode::Space, 100.0);
    assert!(input.check_down(KeyCode::Space, 100.0, COOLDOWN));
    assert!(!input.check_down(KeyCode::Space, 400.0, COOLDOWN));
}
