#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player controller that translates per-frame input into craft commands.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lost_drone_core::{Command, Event, UnitId};

/// Input snapshot for a single craft, distilled by the adapter from its
/// device state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftInput {
    /// Craft the input belongs to.
    pub unit: UnitId,
    /// Horizontal and vertical movement axes in `[-1, 1]`.
    pub axis: Vec2,
    /// Indicates whether the fire button is held on this frame.
    pub fire: bool,
}

impl CraftInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(unit: UnitId, axis: Vec2, fire: bool) -> Self {
        Self { unit, axis, fire }
    }
}

#[derive(Clone, Copy, Debug)]
struct Trigger {
    fire_rate: Duration,
    cooldown: Duration,
    alive: bool,
}

/// Pilot system that steers crafts and paces their fire rate.
#[derive(Debug, Default)]
pub struct Pilot {
    triggers: BTreeMap<UnitId, Trigger>,
    game_over: bool,
}

impl Pilot {
    /// Creates a pilot for the provided crafts and their minimum time between
    /// shots.
    #[must_use]
    pub fn new<I>(crafts: I) -> Self
    where
        I: IntoIterator<Item = (UnitId, Duration)>,
    {
        let triggers = crafts
            .into_iter()
            .map(|(unit, fire_rate)| {
                (
                    unit,
                    Trigger {
                        fire_rate,
                        cooldown: Duration::ZERO,
                        alive: true,
                    },
                )
            })
            .collect();

        Self {
            triggers,
            game_over: false,
        }
    }

    /// Reports whether the craft is known and still flying.
    #[must_use]
    pub fn is_flying(&self, unit: UnitId) -> bool {
        !self.game_over && self.triggers.get(&unit).is_some_and(|trigger| trigger.alive)
    }

    /// Consumes world events and frame input to emit steering and fire commands.
    pub fn handle(&mut self, events: &[Event], inputs: &[CraftInput], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    for trigger in self.triggers.values_mut() {
                        trigger.cooldown = trigger.cooldown.saturating_sub(*dt);
                    }
                }
                Event::UnitDied { unit } => {
                    if let Some(trigger) = self.triggers.get_mut(unit) {
                        trigger.alive = false;
                    }
                }
                Event::LevelStateChanged { to, .. } if to.is_game_over() => {
                    self.game_over = true;
                }
                _ => {}
            }
        }

        if self.game_over {
            return;
        }

        for input in inputs {
            let Some(trigger) = self.triggers.get_mut(&input.unit) else {
                continue;
            };
            if !trigger.alive {
                continue;
            }

            out.push(Command::SteerCraft {
                unit: input.unit,
                axis: input.axis,
            });

            if input.fire && trigger.cooldown.is_zero() {
                trigger.cooldown = trigger.fire_rate;
                out.push(Command::FireShot { unit: input.unit });
            }
        }
    }
}
