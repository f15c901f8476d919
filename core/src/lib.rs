#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lost Drone engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative field, the level coordinator and pure systems. Adapters and
//! systems submit [`Command`] values describing desired mutations, the session
//! routes each command to the component that owns the affected state, and the
//! resulting [`Event`] values are broadcast to every listener in the order they
//! were produced. Systems consume event streams and respond exclusively with
//! new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Phases a level moves through between the intro and its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelState {
    /// The optional intro sequence is playing.
    Intro,
    /// The player spends currency before the enemies arrive.
    Upgrading,
    /// The wave manager is emitting enemies.
    SpawningEnemies,
    /// Every wave has been emitted; enemies may still be alive.
    AllEnemiesSpawned,
    /// Every player craft was destroyed.
    Lose,
    /// Every enemy was spawned and cleared.
    Win,
}

impl LevelState {
    /// Reports whether the state ends the level session.
    ///
    /// Terminal states are never left once entered.
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::Lose | Self::Win)
    }
}

/// Unique identifier assigned to a player craft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShotId(u32);

impl ShotId {
    /// Creates a new shot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed headings available to constant-velocity movers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    /// Toward decreasing `y`.
    Down,
    /// Toward increasing `y`.
    Top,
    /// Toward increasing `x`.
    Right,
    /// Toward decreasing `x`.
    Left,
    /// Up and to the left.
    TopLeft,
    /// Up and to the right.
    TopRight,
    /// Down and to the left.
    DownLeft,
    /// Down and to the right.
    DownRight,
}

impl MoveDirection {
    /// Returns the heading as a grid vector.
    ///
    /// Diagonals are not normalised, so a diagonal mover covers `sqrt(2)`
    /// times the distance of an axis-aligned mover at the same speed.
    #[must_use]
    pub const fn vector(self) -> Vec2 {
        match self {
            Self::Down => Vec2::new(0.0, -1.0),
            Self::Top => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::TopLeft => Vec2::new(-1.0, 1.0),
            Self::TopRight => Vec2::new(1.0, 1.0),
            Self::DownLeft => Vec2::new(-1.0, -1.0),
            Self::DownRight => Vec2::new(1.0, -1.0),
        }
    }

    /// Velocity of a mover travelling along the heading at `speed`.
    #[must_use]
    pub fn velocity(self, speed: f32) -> Vec2 {
        self.vector() * speed
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl Boundary {
    /// Creates a boundary from its four edges.
    #[must_use]
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x_min(&self) -> f32 {
        self.x_min
    }

    /// Right edge.
    #[must_use]
    pub const fn x_max(&self) -> f32 {
        self.x_max
    }

    /// Bottom edge.
    #[must_use]
    pub const fn y_min(&self) -> f32 {
        self.y_min
    }

    /// Top edge.
    #[must_use]
    pub const fn y_max(&self) -> f32 {
        self.y_max
    }

    /// Reports whether both edge pairs are ordered (`min <= max`).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }

    /// Reports whether the point lies inside the boundary, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }

    /// Moves the point onto the nearest location inside the boundary.
    ///
    /// Malformed boundaries collapse onto their minimum edges instead of
    /// panicking.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.max(self.x_min).min(self.x_max.max(self.x_min)),
            point.y.max(self.y_min).min(self.y_max.max(self.y_min)),
        )
    }
}

/// Attributes shared by every enemy emitted from a wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Heading the enemy flies along.
    pub direction: MoveDirection,
    /// Speed in world units per second.
    pub speed: f32,
    /// Damage dealt to a craft on contact.
    pub contact_damage: f32,
    /// Collision radius in world units.
    pub radius: f32,
}

/// Why an enemy left the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// The enemy flew past the cull boundary.
    LeftField,
    /// A shot destroyed the enemy.
    Destroyed,
    /// The enemy crashed into a player craft.
    Collided,
}

/// Immutable representation of a single player craft used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftSnapshot {
    /// Identifier assigned to the craft.
    pub id: UnitId,
    /// Current position in world units.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Health the craft started with.
    pub max_health: f32,
    /// Indicates whether the craft is still in play.
    pub alive: bool,
}

/// Commands that express all permissible mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Ends the upgrading phase and lets the waves begin.
    CompleteUpgrading,
    /// Reports that the intro sequence finished playing.
    CompleteIntro,
    /// Reports that a wave began emitting enemies.
    AnnounceWave {
        /// Zero-based wave index.
        index: u32,
    },
    /// Reports that the final wave emitted its last enemy.
    CompleteSpawning,
    /// Credits currency to the level's balance.
    GainCurrency {
        /// Amount added to the balance.
        amount: u32,
    },
    /// Attempts to spend currency from the level's balance.
    SpendCurrency {
        /// Price of the purchase.
        cost: u32,
    },
    /// Requests that an enemy be placed into the field.
    SpawnEnemy {
        /// Spawn location in world units.
        position: Vec2,
        /// Movement and combat attributes of the enemy.
        template: EnemyTemplate,
    },
    /// Sets the steering input of a player craft.
    SteerCraft {
        /// Craft being steered.
        unit: UnitId,
        /// Desired movement axis; each component is clamped to `[-1, 1]`.
        axis: Vec2,
    },
    /// Requests that a player craft fire a shot.
    FireShot {
        /// Craft firing the shot.
        unit: UnitId,
    },
    /// Applies damage to a player craft.
    DamageCraft {
        /// Craft receiving the damage.
        unit: UnitId,
        /// Amount of health removed.
        amount: f32,
    },
}

/// Events broadcast after commands are processed.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Elapsed time the level forwards to the currency gainer.
    IncomeTick {
        /// Duration of simulated time that counts toward income.
        dt: Duration,
    },
    /// The intro sequence finished.
    IntroCompleted,
    /// The level instructs the wave manager to begin spawning.
    WaveStartRequested,
    /// A wave began emitting enemies.
    WaveStarted {
        /// Zero-based wave index.
        index: u32,
    },
    /// The wave manager emitted its final enemy.
    SpawningCompleted,
    /// The level moved between two states.
    LevelStateChanged {
        /// State that was active before the transition.
        from: LevelState,
        /// State that is active after the transition.
        to: LevelState,
    },
    /// All waves were spawned and every enemy was cleared.
    LevelCompleted,
    /// Every player craft was destroyed.
    LevelFailed,
    /// The number of live enemies changed.
    EnemyCountChanged {
        /// Updated enemy count.
        count: u32,
    },
    /// A player craft was lost.
    PlayerUnitDestroyed,
    /// The currency balance changed.
    CurrencyChanged {
        /// Updated balance.
        balance: u32,
    },
    /// A purchase was refused because the balance was too low.
    PurchaseRejected {
        /// Price of the refused purchase.
        cost: u32,
        /// Balance at the time of the request.
        balance: u32,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Spawn location.
        position: Vec2,
    },
    /// An enemy left the field.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Cause of the removal.
        reason: RemovalReason,
    },
    /// A craft fired a shot.
    ShotFired {
        /// Identifier assigned to the shot.
        shot: ShotId,
        /// Craft that fired it.
        unit: UnitId,
    },
    /// A shot flew past the cull boundary without hitting anything.
    ShotExpired {
        /// Identifier of the expired shot.
        shot: ShotId,
    },
    /// A craft lost health.
    CraftDamaged {
        /// Craft that was hit.
        unit: UnitId,
        /// Remaining health.
        health: f32,
    },
    /// A craft's health reached zero.
    UnitDied {
        /// Craft that died.
        unit: UnitId,
    },
}
