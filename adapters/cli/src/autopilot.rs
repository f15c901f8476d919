use std::collections::BTreeMap;

use glam::Vec2;
use lost_drone_core::{Boundary, UnitId};
use lost_drone_system_pilot::CraftInput;
use lost_drone_world::{query, World};

/// Horizontal distance below which a craft counts as lined up with its target.
const ALIGNMENT_TOLERANCE: f32 = 0.15;

/// Margin from the play area edge at which a sweeping craft turns around.
const SWEEP_MARGIN: f32 = 0.5;

/// Scripted stand-in for a human pilot.
///
/// Each craft lines up under the lowest enemy still above it and fires;
/// with nothing to shoot it sweeps across the play area.
#[derive(Debug)]
pub(crate) struct Autopilot {
    fire: bool,
    headings: BTreeMap<UnitId, f32>,
}

impl Autopilot {
    pub(crate) fn new(fire: bool) -> Self {
        Self {
            fire,
            headings: BTreeMap::new(),
        }
    }

    pub(crate) fn inputs(&mut self, world: &World) -> Vec<CraftInput> {
        let play_area = query::play_area(world);
        let enemies = query::enemy_view(world);
        let mut inputs = Vec::new();

        for craft in query::crafts(world).into_iter().filter(|craft| craft.alive) {
            let target = enemies
                .iter()
                .filter(|enemy| enemy.position.y > craft.position.y)
                .min_by(|a, b| a.position.y.total_cmp(&b.position.y))
                .map(|enemy| enemy.position.x);

            let (axis, fire) = match target {
                Some(x) => {
                    let offset = x - craft.position.x;
                    let axis = if offset.abs() <= ALIGNMENT_TOLERANCE {
                        0.0
                    } else {
                        offset.signum()
                    };
                    (axis, self.fire)
                }
                None => (self.sweep(craft.id, craft.position.x, &play_area), false),
            };

            inputs.push(CraftInput::new(craft.id, Vec2::new(axis, 0.0), fire));
        }

        inputs
    }

    fn sweep(&mut self, unit: UnitId, x: f32, play_area: &Boundary) -> f32 {
        let heading = self.headings.entry(unit).or_insert(1.0);
        if x >= play_area.x_max() - SWEEP_MARGIN {
            *heading = -1.0;
        } else if x <= play_area.x_min() + SWEEP_MARGIN {
            *heading = 1.0;
        }
        *heading
    }
}
