use std::path::{Path, PathBuf};

use survive_and_poop::config::{CONFIG_FILE, CliArgs, GameConfig, GameplaySettings};
use survive_and_poop::game::SurviveScene;
use survive_and_poop::needs::GAUGE_MAX;

#[test]
fn defaults_match_the_game() {
    let cfg = GameConfig::default();
    assert_eq!((cfg.window.width, cfg.window.height), (800, 600));
    assert_eq!(cfg.physics.gravity, [0.0, 0.0]);
    assert!(!cfg.physics.debug);
    assert_eq!(cfg.gameplay.walk_speed, 175.0);
    assert_eq!(cfg.gameplay.axis_velocity, 100.0);
    assert_eq!(cfg.gameplay.poop_cooldown_ms, 500.0);
    assert_eq!(cfg.gameplay.fecal_urgency_per_frame, 0.25);
    assert_eq!(cfg.gameplay.hunger_per_frame, 0.5);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let cfg = GameConfig::from_toml_str(
        r#"
        [physics]
        debug = true

        [gameplay]
        poop_lifetime_secs = 0.0
        "#,
    )
    .unwrap();
    assert!(cfg.physics.debug);
    assert_eq!(cfg.gameplay.poop_lifetime_secs, 0.0);
    assert_eq!(cfg.gameplay.walk_speed, 175.0);
    assert_eq!(cfg.window.title, "Survive and Poop");
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(GameConfig::from_toml_str("[window\nwidth = ").is_err());
    assert!(GameConfig::from_toml_str("[window]\nwidth = \"wide\"").is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = GameConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
    assert_eq!(cfg, GameConfig::default());
}

#[test]
fn load_reads_a_file() {
    let path = std::env::temp_dir().join(format!("survive_and_poop_cfg_{}.toml", std::process::id()));
    std::fs::write(&path, "[window]\nwidth = 1024\n").unwrap();
    let cfg = GameConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.window.width, 1024);
    assert_eq!(cfg.window.height, 600);
}

// ── Validation ───────────────────────────────────────────────────────────────

/// A NaN or negative rate in the file must not leak into the gauges.
#[test]
fn bad_gauge_rates_fall_back_to_defaults() {
    let cfg = GameConfig::from_toml_str("[gameplay]\nhunger_per_frame = nan\nfecal_urgency_per_frame = -0.25")
        .unwrap();
    let defaults = GameplaySettings::default();
    assert_eq!(cfg.gameplay.hunger_per_frame, defaults.hunger_per_frame);
    assert_eq!(cfg.gameplay.fecal_urgency_per_frame, defaults.fecal_urgency_per_frame);

    let mut needs = SurviveScene::new(cfg.gameplay).needs().clone();
    let (mut urgency, mut hunger) = (0.0, 0.0);
    for _ in 0..300 {
        needs.tick();
        let (u, h) = (needs.fecal_urgency.value(), needs.hunger.value());
        assert!((0.0..=GAUGE_MAX).contains(&u), "urgency out of range: {u}");
        assert!((0.0..=GAUGE_MAX).contains(&h), "hunger out of range: {h}");
        assert!(u >= urgency && h >= hunger);
        (urgency, hunger) = (u, h);
    }
    assert!(needs.hunger.is_maxed());
}

#[test]
fn bad_speeds_and_timings_fall_back_to_defaults() {
    let cfg = GameConfig::from_toml_str(
        r#"
        [gameplay]
        walk_speed = -175.0
        axis_velocity = inf
        poop_cooldown_ms = nan
        poop_lifetime_secs = -1.0
        "#,
    )
    .unwrap();
    assert_eq!(cfg.gameplay, GameplaySettings::default());
}

#[test]
fn zero_values_are_kept() {
    let cfg = GameConfig::from_toml_str(
        r#"
        [gameplay]
        hunger_per_frame = 0.0
        poop_cooldown_ms = 0.0
        poop_lifetime_secs = 0.0
        "#,
    )
    .unwrap();
    assert_eq!(cfg.gameplay.hunger_per_frame, 0.0);
    assert_eq!(cfg.gameplay.poop_cooldown_ms, 0.0);
    assert_eq!(cfg.gameplay.poop_lifetime_secs, 0.0);
}

#[test]
fn zero_window_values_are_clamped() {
    let cfg = GameConfig::from_toml_str("[window]\nwidth = 0\nheight = 0\ntarget_ups = 0").unwrap();
    assert_eq!((cfg.window.width, cfg.window.height, cfg.window.target_ups), (1, 1, 1));
}

// ── CliArgs ──────────────────────────────────────────────────────────────────

fn args(list: &[&str]) -> CliArgs {
    CliArgs::parse(list.iter().map(|s| s.to_string()))
}

#[test]
fn cli_defaults() {
    let a = args(&[]);
    assert!(!a.debug);
    assert_eq!(a.config_path(), PathBuf::from(CONFIG_FILE));
}

#[test]
fn cli_flags() {
    let a = args(&["--config", "my.toml", "--bogus", "--debug"]);
    assert!(a.debug);
    assert_eq!(a.config_path(), PathBuf::from("my.toml"));
}
