use std::{fs, process};

use glam::Vec2;
use lost_drone_core::MoveDirection;
use lost_drone_session::{ConfigError, LevelConfig};

#[test]
fn omitted_sections_fall_back_to_defaults() {
    let config = LevelConfig::from_toml_str("version = 1\n").expect("minimal level parses");

    assert_eq!(config, LevelConfig::default());
}

#[test]
fn explicit_sections_override_defaults() {
    let config = LevelConfig::from_toml_str(
        r#"
version = 1

[level]
starting_currency = 40
intro_seconds = 2.5

[waves]
anchor = [1.0, 10.0]
spawn_range = [-2.0, 2.0]
seed = 7

[waves.enemy]
direction = "DownLeft"
speed = 4.0
contact_damage = 5.0
radius = 0.3

[[waves.wave]]
enemy_count = 6
spawn_interval_ms = 250

[[crafts]]
position = [-1.0, -3.0]
speed = 5.0
health = 20.0
radius = 0.5
fire_rate_ms = 100

[[crafts]]
position = [1.0, -3.0]
speed = 5.0
health = 20.0
radius = 0.5
fire_rate_ms = 100
"#,
    )
    .expect("level parses");

    assert_eq!(config.level.starting_currency, 40);
    assert_eq!(config.level.intro_seconds, Some(2.5));
    assert!(!config.level.always_gain_currency);
    assert_eq!(config.waves.anchor, Vec2::new(1.0, 10.0));
    assert_eq!(config.waves.enemy.direction, MoveDirection::DownLeft);
    assert_eq!(config.waves.wave.len(), 1);
    assert_eq!(config.waves.wave[0].start_delay_ms, 0);
    assert_eq!(config.crafts.len(), 2);
}

#[test]
fn other_versions_are_rejected() {
    let error = LevelConfig::from_toml_str("version = 2\n").expect_err("version 2 is rejected");

    assert!(matches!(
        error,
        ConfigError::UnsupportedVersion { found: 2 }
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let error = LevelConfig::from_toml_str("version = \"one\"").expect_err("string version");

    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn a_level_needs_crafts() {
    let error = LevelConfig::from_toml_str("version = 1\ncrafts = []\n").expect_err("no crafts");

    assert!(matches!(error, ConfigError::NoCrafts));
}

#[test]
fn invalid_geometry_is_rejected() {
    let mut config = LevelConfig::default();
    config.waves.spawn_range = [3.0, -3.0];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvertedSpawnRange { .. })
    ));

    let mut config = LevelConfig::default();
    config.crafts[0].health = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidCraftHealth { index: 0, .. })
    ));

    let mut config = LevelConfig::default();
    config.nodes.count = 2;
    assert!(matches!(config.validate(), Err(ConfigError::Layout(_))));
}

#[test]
fn load_reads_from_disk_and_reports_the_path_on_failure() {
    let path = std::env::temp_dir().join(format!("lost-drone-level-{}.toml", process::id()));
    fs::write(&path, "version = 1\n[level]\nstarting_currency = 9\n").expect("write level");

    let loaded = LevelConfig::load(&path);
    fs::remove_file(&path).expect("remove level");
    assert_eq!(loaded.expect("level loads").level.starting_currency, 9);

    let error = LevelConfig::load(&path).expect_err("file is gone");
    assert!(format!("{error:#}").contains("failed to read level config"));
}

#[test]
fn unbounded_spawn_ranges_are_rejected() {
    let error = LevelConfig::from_toml_str("version = 1\n[waves]\nspawn_range = [-inf, inf]\n")
        .expect_err("infinite range");
    assert!(matches!(error, ConfigError::UnboundedSpawnRange { .. }));

    let mut config = LevelConfig::default();
    config.waves.spawn_range = [-f32::MAX, f32::MAX];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnboundedSpawnRange { .. })
    ));
}
