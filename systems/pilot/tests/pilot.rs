use std::time::Duration;

use glam::Vec2;
use lost_drone_core::{Command, Event, LevelState, UnitId};
use lost_drone_system_pilot::{CraftInput, Pilot};

const FIRE_RATE: Duration = Duration::from_millis(200);

fn pilot() -> Pilot {
    Pilot::new([(UnitId::new(0), FIRE_RATE), (UnitId::new(1), FIRE_RATE)])
}

fn elapsed(millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }
}

fn shots(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|command| matches!(command, Command::FireShot { .. }))
        .count()
}

#[test]
fn steers_every_frame_with_the_raw_axis() {
    let mut pilot = pilot();
    let mut commands = Vec::new();
    let input = CraftInput::new(UnitId::new(1), Vec2::new(-1.0, 0.5), false);

    pilot.handle(&[], &[input], &mut commands);

    assert_eq!(
        commands,
        vec![Command::SteerCraft {
            unit: UnitId::new(1),
            axis: Vec2::new(-1.0, 0.5),
        }]
    );
}

#[test]
fn holding_fire_respects_the_fire_rate() {
    let mut pilot = pilot();
    let mut commands = Vec::new();
    let input = CraftInput::new(UnitId::new(0), Vec2::ZERO, true);

    pilot.handle(&[], &[input], &mut commands);
    for _ in 0..3 {
        pilot.handle(&[elapsed(50)], &[input], &mut commands);
    }
    assert_eq!(shots(&commands), 1, "cooldown still running after 150ms");

    pilot.handle(&[elapsed(50)], &[input], &mut commands);
    assert_eq!(shots(&commands), 2);
}

#[test]
fn dead_crafts_are_not_piloted() {
    let mut pilot = pilot();
    let mut commands = Vec::new();
    let input = CraftInput::new(UnitId::new(0), Vec2::X, true);

    pilot.handle(
        &[Event::UnitDied {
            unit: UnitId::new(0),
        }],
        &[input],
        &mut commands,
    );

    assert!(commands.is_empty());
    assert!(!pilot.is_flying(UnitId::new(0)));
    assert!(pilot.is_flying(UnitId::new(1)));
}

#[test]
fn unknown_units_are_ignored() {
    let mut pilot = pilot();
    let mut commands = Vec::new();

    pilot.handle(
        &[],
        &[CraftInput::new(UnitId::new(7), Vec2::Y, true)],
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn game_over_grounds_every_craft() {
    let mut pilot = pilot();
    let mut commands = Vec::new();

    pilot.handle(
        &[Event::LevelStateChanged {
            from: LevelState::AllEnemiesSpawned,
            to: LevelState::Win,
        }],
        &[CraftInput::new(UnitId::new(1), Vec2::X, true)],
        &mut commands,
    );

    assert!(commands.is_empty());
    assert!(!pilot.is_flying(UnitId::new(1)));
}
