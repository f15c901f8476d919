use std::time::Duration;

use glam::Vec2;
use lost_drone_core::{Command, EnemyTemplate, Event, LevelState, MoveDirection};
use lost_drone_system_waves::{Config, WaveSpec, Waves};

const ANCHOR: Vec2 = Vec2::new(0.0, 9.0);

fn template() -> EnemyTemplate {
    EnemyTemplate {
        direction: MoveDirection::Down,
        speed: 3.0,
        contact_damage: 10.0,
        radius: 0.4,
    }
}

fn wave(enemy_count: u32, interval_ms: u64, delay_ms: u64) -> WaveSpec {
    WaveSpec {
        enemy_count,
        spawn_interval: Duration::from_millis(interval_ms),
        start_delay: Duration::from_millis(delay_ms),
    }
}

fn manager(waves: Vec<WaveSpec>) -> Waves {
    Waves::new(Config::new(waves, template(), ANCHOR, (-4.0, 4.0), 0x1d2c_3b4a))
}

fn elapsed(millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }
}

fn spawn_count(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
        .count()
}

#[test]
fn stays_idle_until_the_level_requests_waves() {
    let mut waves = manager(vec![wave(3, 100, 0)]);
    let mut commands = Vec::new();

    waves.handle(&[elapsed(5_000)], &mut commands);

    assert!(commands.is_empty());
    assert!(!waves.is_running());
}

#[test]
fn first_enemy_spawns_when_the_wave_starts() {
    let mut waves = manager(vec![wave(3, 500, 0)]);
    let mut commands = Vec::new();

    waves.handle(&[Event::WaveStartRequested], &mut commands);

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], Command::AnnounceWave { index: 0 });
    assert!(matches!(commands[1], Command::SpawnEnemy { .. }));
    assert_eq!(waves.current_wave(), Some(0));
}

#[test]
fn large_steps_emit_every_enemy_that_came_due() {
    let mut waves = manager(vec![wave(5, 250, 0)]);
    let mut commands = Vec::new();
    waves.handle(&[Event::WaveStartRequested], &mut commands);
    commands.clear();

    waves.handle(&[elapsed(600)], &mut commands);

    assert_eq!(spawn_count(&commands), 2, "two intervals elapsed");
    assert!(!commands.contains(&Command::CompleteSpawning));
}

#[test]
fn completion_follows_the_final_spawn_in_the_same_batch() {
    let mut waves = manager(vec![wave(2, 100, 0)]);
    let mut commands = Vec::new();
    waves.handle(&[Event::WaveStartRequested], &mut commands);
    commands.clear();

    waves.handle(&[elapsed(100)], &mut commands);

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], Command::SpawnEnemy { .. }));
    assert_eq!(commands[1], Command::CompleteSpawning);
    assert!(waves.is_completed());

    commands.clear();
    waves.handle(&[elapsed(10_000)], &mut commands);
    assert!(commands.is_empty(), "completed manager stays silent");
}

#[test]
fn waves_honour_their_start_delay() {
    let mut waves = manager(vec![wave(1, 0, 0), wave(2, 0, 1_000)]);
    let mut commands = Vec::new();
    waves.handle(&[Event::WaveStartRequested], &mut commands);
    assert_eq!(spawn_count(&commands), 1);
    commands.clear();

    waves.handle(&[elapsed(999)], &mut commands);
    assert!(commands.is_empty());
    assert_eq!(waves.current_wave(), Some(1));

    waves.handle(&[elapsed(1)], &mut commands);
    assert_eq!(
        commands
            .iter()
            .filter(|command| !matches!(command, Command::SpawnEnemy { .. }))
            .cloned()
            .collect::<Vec<_>>(),
        vec![Command::AnnounceWave { index: 1 }, Command::CompleteSpawning]
    );
    assert_eq!(spawn_count(&commands), 2);
}

#[test]
fn empty_schedule_completes_on_start() {
    let mut waves = manager(Vec::new());
    let mut commands = Vec::new();

    waves.handle(&[Event::WaveStartRequested], &mut commands);

    assert_eq!(commands, vec![Command::CompleteSpawning]);
    assert!(waves.is_completed());
}

#[test]
fn empty_waves_are_skipped() {
    let mut waves = manager(vec![wave(0, 100, 0), wave(1, 100, 0)]);
    let mut commands = Vec::new();

    waves.handle(&[Event::WaveStartRequested], &mut commands);

    assert_eq!(spawn_count(&commands), 1);
    assert_eq!(commands.last(), Some(&Command::CompleteSpawning));
}

#[test]
fn repeated_start_requests_are_ignored() {
    let mut waves = manager(vec![wave(4, 1_000, 0)]);
    let mut commands = Vec::new();

    waves.handle(&[Event::WaveStartRequested], &mut commands);
    waves.handle(&[Event::WaveStartRequested], &mut commands);

    assert_eq!(spawn_count(&commands), 1);
}

#[test]
fn game_over_halts_spawning() {
    let mut waves = manager(vec![wave(10, 100, 0)]);
    let mut commands = Vec::new();
    waves.handle(&[Event::WaveStartRequested], &mut commands);
    commands.clear();

    waves.handle(
        &[
            Event::LevelStateChanged {
                from: LevelState::SpawningEnemies,
                to: LevelState::Lose,
            },
            elapsed(5_000),
        ],
        &mut commands,
    );

    assert!(commands.is_empty());
    assert!(!waves.is_running());
    assert!(!waves.is_completed());
}

#[test]
fn spawn_positions_are_deterministic_and_within_range() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.len(), 12);
    for position in first {
        assert_eq!(position.y, ANCHOR.y);
        assert!((-4.0..=4.0).contains(&position.x), "x = {}", position.x);
    }
}

fn replay() -> Vec<Vec2> {
    let mut waves = manager(vec![wave(4, 200, 0), wave(8, 100, 300)]);
    let mut commands = Vec::new();
    waves.handle(&[Event::WaveStartRequested], &mut commands);
    for _ in 0..40 {
        waves.handle(&[elapsed(50)], &mut commands);
    }

    commands
        .into_iter()
        .filter_map(|command| match command {
            Command::SpawnEnemy { position, .. } => Some(position),
            _ => None,
        })
        .collect()
}
