#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state for Lost Drone.
//!
//! The field holds the player crafts, the enemies flying down the screen and
//! the shots fired at them. It mutates only through [`apply`] and reports
//! every change as an [`Event`].

mod nodes;

use std::time::Duration;

use glam::Vec2;
use lost_drone_core::{
    Boundary, Command, CraftSnapshot, EnemyId, EnemyTemplate, Event, RemovalReason, ShotId, UnitId,
};
use tracing::trace;

pub use nodes::{arrange_nodes, LayoutError, MIN_NODES};

const DEFAULT_PLAY_AREA: Boundary = Boundary::new(-6.0, 6.0, -4.0, 8.0);
const DEFAULT_CULL_AREA: Boundary = Boundary::new(-8.0, 8.0, -6.0, 16.0);
const DEFAULT_SHOT_SPEED: f32 = 20.0;
const DEFAULT_SHOT_RADIUS: f32 = 0.1;
const DEFAULT_MUZZLE_OFFSET: Vec2 = Vec2::new(0.0, 0.6);

/// Geometry and projectile settings of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Region player crafts are confined to.
    pub play_area: Boundary,
    /// Region outside of which enemies and shots are discarded.
    pub cull_area: Boundary,
    /// Upward speed of fired shots in world units per second.
    pub shot_speed: f32,
    /// Collision radius of a shot.
    pub shot_radius: f32,
    /// Offset from a craft's position at which its shots appear.
    pub muzzle_offset: Vec2,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            play_area: DEFAULT_PLAY_AREA,
            cull_area: DEFAULT_CULL_AREA,
            shot_speed: DEFAULT_SHOT_SPEED,
            shot_radius: DEFAULT_SHOT_RADIUS,
            muzzle_offset: DEFAULT_MUZZLE_OFFSET,
        }
    }
}

/// Starting attributes of a player craft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftConfig {
    /// Spawn position; clamped into the play area.
    pub position: Vec2,
    /// Top speed in world units per second.
    pub speed: f32,
    /// Starting and maximum health.
    pub health: f32,
    /// Collision radius.
    pub radius: f32,
}

/// Represents the authoritative Lost Drone field state.
#[derive(Debug)]
pub struct World {
    field: FieldConfig,
    crafts: Vec<Craft>,
    enemies: Vec<Enemy>,
    shots: Vec<Shot>,
    path_nodes: Vec<Vec2>,
    next_enemy: u32,
    next_shot: u32,
    tick_index: u64,
}

impl World {
    /// Creates a field populated with the provided crafts.
    ///
    /// Crafts receive [`UnitId`] values in the order they are listed,
    /// starting at zero.
    #[must_use]
    pub fn new(field: FieldConfig, crafts: &[CraftConfig]) -> Self {
        let crafts = crafts
            .iter()
            .zip(0_u32..)
            .map(|(config, index)| Craft::spawn(UnitId::new(index), config, &field.play_area))
            .collect();

        Self {
            field,
            crafts,
            enemies: Vec::new(),
            shots: Vec::new(),
            path_nodes: Vec::new(),
            next_enemy: 0,
            next_shot: 0,
            tick_index: 0,
        }
    }

    /// Attaches the path nodes enemies are laid out along.
    #[must_use]
    pub fn with_path_nodes(mut self, path_nodes: Vec<Vec2>) -> Self {
        self.path_nodes = path_nodes;
        self
    }

    fn craft_mut(&mut self, unit: UnitId) -> Option<&mut Craft> {
        self.crafts.iter_mut().find(|craft| craft.id == unit)
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let play_area = self.field.play_area;

        for craft in self.crafts.iter_mut().filter(|craft| craft.alive) {
            craft.position = play_area.clamp(craft.position + craft.velocity * seconds);
        }
        for enemy in &mut self.enemies {
            enemy.position += enemy.velocity * seconds;
        }
        for shot in &mut self.shots {
            shot.position += shot.velocity * seconds;
        }

        self.resolve_shot_hits(out_events);
        self.resolve_crashes(out_events);
        self.cull(out_events);
    }

    fn resolve_shot_hits(&mut self, out_events: &mut Vec<Event>) {
        let mut destroyed: Vec<EnemyId> = Vec::new();
        let enemies = &self.enemies;
        self.shots.retain(|shot| {
            let hit = enemies.iter().find(|enemy| {
                !destroyed.contains(&enemy.id)
                    && overlaps(shot.position, shot.radius, enemy.position, enemy.radius)
            });
            match hit {
                Some(enemy) => {
                    destroyed.push(enemy.id);
                    false
                }
                None => true,
            }
        });

        if destroyed.is_empty() {
            return;
        }

        self.enemies.retain(|enemy| !destroyed.contains(&enemy.id));
        for enemy in destroyed {
            out_events.push(Event::EnemyRemoved {
                enemy,
                reason: RemovalReason::Destroyed,
            });
        }
    }

    fn resolve_crashes(&mut self, out_events: &mut Vec<Event>) {
        let mut crashed: Vec<EnemyId> = Vec::new();
        let crafts = &mut self.crafts;
        self.enemies.retain(|enemy| {
            let Some(craft) = crafts.iter_mut().find(|craft| {
                craft.alive && overlaps(craft.position, craft.radius, enemy.position, enemy.radius)
            }) else {
                return true;
            };
            craft.take_damage(enemy.contact_damage, out_events);
            crashed.push(enemy.id);
            false
        });

        for enemy in crashed {
            out_events.push(Event::EnemyRemoved {
                enemy,
                reason: RemovalReason::Collided,
            });
        }
    }

    fn cull(&mut self, out_events: &mut Vec<Event>) {
        let cull_area = self.field.cull_area;

        let mut departed: Vec<EnemyId> = Vec::new();
        self.enemies.retain(|enemy| {
            let inside = cull_area.contains(enemy.position);
            if !inside {
                departed.push(enemy.id);
            }
            inside
        });
        for enemy in departed {
            out_events.push(Event::EnemyRemoved {
                enemy,
                reason: RemovalReason::LeftField,
            });
        }

        let mut expired: Vec<ShotId> = Vec::new();
        self.shots.retain(|shot| {
            let inside = cull_area.contains(shot.position);
            if !inside {
                expired.push(shot.id);
            }
            inside
        });
        for shot in expired {
            out_events.push(Event::ShotExpired { shot });
        }
    }

    fn spawn_enemy(&mut self, position: Vec2, template: EnemyTemplate, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        self.enemies.push(Enemy {
            id,
            position,
            velocity: template.direction.velocity(template.speed),
            contact_damage: template.contact_damage,
            radius: template.radius,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            position,
        });
    }

    fn fire_shot(&mut self, unit: UnitId, out_events: &mut Vec<Event>) {
        let muzzle_offset = self.field.muzzle_offset;
        let Some(origin) = self
            .craft_mut(unit)
            .filter(|craft| craft.alive)
            .map(|craft| craft.position + muzzle_offset)
        else {
            return;
        };

        let id = ShotId::new(self.next_shot);
        self.next_shot = self.next_shot.wrapping_add(1);
        self.shots.push(Shot {
            id,
            position: origin,
            velocity: Vec2::new(0.0, self.field.shot_speed),
            radius: self.field.shot_radius,
        });
        out_events.push(Event::ShotFired { shot: id, unit });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt, out_events);
        }
        Command::SpawnEnemy { position, template } => {
            world.spawn_enemy(position, template, out_events);
        }
        Command::SteerCraft { unit, axis } => {
            if let Some(craft) = world.craft_mut(unit) {
                craft.steer(axis);
            }
        }
        Command::FireShot { unit } => world.fire_shot(unit, out_events),
        Command::DamageCraft { unit, amount } => {
            if let Some(craft) = world.craft_mut(unit) {
                craft.take_damage(amount, out_events);
            }
        }
        Command::CompleteUpgrading
        | Command::CompleteIntro
        | Command::AnnounceWave { .. }
        | Command::CompleteSpawning
        | Command::GainCurrency { .. }
        | Command::SpendCurrency { .. } => {
            trace!(?command, "command does not mutate the field");
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use lost_drone_core::{Boundary, CraftSnapshot, EnemyId, UnitId};

    use super::World;

    /// Region player crafts are confined to.
    #[must_use]
    pub fn play_area(world: &World) -> Boundary {
        world.field.play_area
    }

    /// Region outside of which enemies and shots are discarded.
    #[must_use]
    pub fn cull_area(world: &World) -> Boundary {
        world.field.cull_area
    }

    /// Identifiers of every craft, alive or not, in identifier order.
    #[must_use]
    pub fn unit_ids(world: &World) -> Vec<UnitId> {
        world.crafts.iter().map(|craft| craft.id).collect()
    }

    /// Captures a snapshot of every craft in identifier order.
    #[must_use]
    pub fn crafts(world: &World) -> Vec<CraftSnapshot> {
        world.crafts.iter().map(super::Craft::snapshot).collect()
    }

    /// Captures a snapshot of a single craft.
    #[must_use]
    pub fn craft(world: &World, unit: UnitId) -> Option<CraftSnapshot> {
        world
            .crafts
            .iter()
            .find(|craft| craft.id == unit)
            .map(super::Craft::snapshot)
    }

    /// Captures a read-only view of the enemies inside the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                position: enemy.position,
                velocity: enemy.velocity,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EnemyView { snapshots }
    }

    /// Number of shots in flight.
    #[must_use]
    pub fn shot_count(world: &World) -> usize {
        world.shots.len()
    }

    /// Path nodes attached to the field.
    #[must_use]
    pub fn path_nodes(world: &World) -> &[Vec2] {
        &world.path_nodes
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only snapshot describing all enemies within the field.
    #[derive(Clone, Debug)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured enemy snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Number of captured enemies.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the field holds no enemies.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Immutable representation of a single enemy used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier assigned to the enemy.
        pub id: EnemyId,
        /// Current position.
        pub position: Vec2,
        /// Constant velocity.
        pub velocity: Vec2,
    }
}

#[derive(Clone, Debug)]
struct Craft {
    id: UnitId,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
    health: f32,
    max_health: f32,
    radius: f32,
    alive: bool,
}

impl Craft {
    fn spawn(id: UnitId, config: &CraftConfig, play_area: &Boundary) -> Self {
        Self {
            id,
            position: play_area.clamp(config.position),
            velocity: Vec2::ZERO,
            speed: config.speed,
            health: config.health,
            max_health: config.health,
            radius: config.radius,
            alive: config.health > 0.0,
        }
    }

    fn snapshot(&self) -> CraftSnapshot {
        CraftSnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            alive: self.alive,
        }
    }

    fn steer(&mut self, axis: Vec2) {
        if !self.alive || !axis.is_finite() {
            return;
        }
        self.velocity = axis.clamp(Vec2::NEG_ONE, Vec2::ONE) * self.speed;
    }

    fn take_damage(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        if !self.alive || amount.is_nan() || amount <= 0.0 {
            return;
        }

        self.health = (self.health - amount).max(0.0);
        out_events.push(Event::CraftDamaged {
            unit: self.id,
            health: self.health,
        });

        if self.health <= 0.0 {
            self.alive = false;
            self.velocity = Vec2::ZERO;
            out_events.push(Event::UnitDied { unit: self.id });
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Vec2,
    velocity: Vec2,
    contact_damage: f32,
    radius: f32,
}

#[derive(Clone, Debug)]
struct Shot {
    id: ShotId,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
}

fn overlaps(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}
