#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level state coordination for Lost Drone.
//!
//! The [`LevelCoordinator`] is the single authority over the level phase. It is
//! created once per level session, reacts to the notifications of the
//! collaborators it subscribed to (the intro, the wave manager and every
//! player craft), and writes its own notifications into the caller's event
//! buffer. It never owns its collaborators: instructions such as "start the
//! waves" or "advance income" leave the coordinator as [`Event`] values that
//! the hosting session fans out to the systems concerned.

mod currency;

use std::{collections::BTreeSet, time::Duration};

use lost_drone_core::{CraftSnapshot, Event, LevelState, UnitId};
use tracing::{debug, error, info};

pub use currency::Currency;

/// Construction-time settings of a level; immutable once the level starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    starting_currency: u32,
    has_intro: bool,
    always_gain_currency: bool,
}

impl Config {
    /// Creates a configuration without an intro that only earns income once
    /// the waves are under way.
    #[must_use]
    pub const fn new(starting_currency: u32) -> Self {
        Self {
            starting_currency,
            has_intro: false,
            always_gain_currency: false,
        }
    }

    /// Declares whether an intro collaborator will report completion.
    ///
    /// Without an intro the coordinator falls through to the upgrading phase
    /// while initializing.
    #[must_use]
    pub const fn with_intro(self, has_intro: bool) -> Self {
        Self { has_intro, ..self }
    }

    /// Allows income during the intro and upgrading phases.
    #[must_use]
    pub const fn with_always_gain_currency(self, always_gain_currency: bool) -> Self {
        Self {
            always_gain_currency,
            ..self
        }
    }

    /// Currency available when the level starts.
    #[must_use]
    pub const fn starting_currency(&self) -> u32 {
        self.starting_currency
    }

    /// Whether an intro collaborator is configured.
    #[must_use]
    pub const fn has_intro(&self) -> bool {
        self.has_intro
    }

    /// Whether income accrues regardless of the level state.
    #[must_use]
    pub const fn always_gain_currency(&self) -> bool {
        self.always_gain_currency
    }
}

#[derive(Debug, Default)]
struct Subscriptions {
    spawning_completed: bool,
    intro_completed: bool,
    unit_deaths: BTreeSet<UnitId>,
}

impl Subscriptions {
    fn clear(&mut self) {
        self.spawning_completed = false;
        self.intro_completed = false;
        self.unit_deaths.clear();
    }
}

/// Owns the level phase, the enemy and life counters, and the currency balance.
#[derive(Debug)]
pub struct LevelCoordinator {
    always_gain_currency: bool,
    state: LevelState,
    enemy_count: u32,
    lives_remaining: u32,
    lives_total: u32,
    currency: Currency,
    roster: Vec<UnitId>,
    subscriptions: Subscriptions,
    shut_down: bool,
}

impl LevelCoordinator {
    /// Creates the coordinator and subscribes it to its collaborators.
    ///
    /// The level starts in [`LevelState::Intro`] without a transition
    /// notification. When `config` declares no intro, the intro-completed
    /// handler runs before this function returns, so `out` already holds the
    /// `Intro -> Upgrading` transition.
    ///
    /// Repeated ids in `roster` name the same craft and count as one life.
    #[must_use]
    pub fn initialize(config: Config, roster: &[UnitId], out: &mut Vec<Event>) -> Self {
        let unit_deaths: BTreeSet<UnitId> = roster.iter().copied().collect();
        let lives_total = u32::try_from(unit_deaths.len()).unwrap_or(u32::MAX);

        let mut coordinator = Self {
            always_gain_currency: config.always_gain_currency,
            state: LevelState::Intro,
            enemy_count: 0,
            lives_remaining: lives_total,
            lives_total,
            currency: Currency::new(config.starting_currency),
            roster: unit_deaths.iter().copied().collect(),
            subscriptions: Subscriptions {
                spawning_completed: true,
                intro_completed: config.has_intro,
                unit_deaths,
            },
            shut_down: false,
        };
        debug!(
            lives = lives_total,
            has_intro = config.has_intro,
            "level coordinator initialized"
        );

        if !config.has_intro {
            coordinator.intro_completed(out);
        }

        coordinator
    }

    /// Reacts to the collaborator notifications contained in `events`.
    ///
    /// Notifications from collaborators the coordinator is not subscribed to
    /// are ignored. Enemy spawns and removals drive the enemy counter. A shut
    /// down coordinator ignores every event.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        if self.shut_down {
            return;
        }
        for event in events {
            match event {
                Event::IntroCompleted if self.subscriptions.intro_completed => {
                    self.intro_completed(out);
                }
                Event::SpawningCompleted if self.subscriptions.spawning_completed => {
                    self.spawning_completed(out);
                }
                Event::UnitDied { unit } => self.unit_died(*unit, out),
                Event::EnemySpawned { .. } => self.increment_enemy_count(out),
                Event::EnemyRemoved { .. } => self.decrement_enemy_count(out),
                _ => {}
            }
        }
    }

    /// Records a newly spawned enemy.
    pub fn increment_enemy_count(&mut self, out: &mut Vec<Event>) {
        self.enemy_count = self.enemy_count.saturating_add(1);
        out.push(Event::EnemyCountChanged {
            count: self.enemy_count,
        });
    }

    /// Records a removed enemy, winning the level when it was the last one
    /// after every wave has spawned.
    ///
    /// A decrement at zero indicates a bookkeeping fault elsewhere; it is
    /// logged and the count stays at zero.
    pub fn decrement_enemy_count(&mut self, out: &mut Vec<Event>) {
        match self.enemy_count.checked_sub(1) {
            Some(count) => self.enemy_count = count,
            None => error!("enemy count would drop below zero; clamping to zero"),
        }
        out.push(Event::EnemyCountChanged {
            count: self.enemy_count,
        });

        if self.enemy_count == 0 && self.state == LevelState::AllEnemiesSpawned {
            self.change_state(LevelState::Win, out);
        }
    }

    /// Ends the upgrading phase and starts the waves.
    pub fn complete_upgrading(&mut self, out: &mut Vec<Event>) {
        self.change_state(LevelState::SpawningEnemies, out);
    }

    /// Advances the level by `dt`, forwarding it as income when the current
    /// phase earns currency.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.shut_down {
            return;
        }
        if self.accrues_currency() {
            out.push(Event::IncomeTick { dt });
        }
    }

    /// Credits income granted by the currency gainer.
    pub fn gain_currency(&mut self, amount: u32, out: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        self.currency.add(amount);
        out.push(Event::CurrencyChanged {
            balance: self.currency.balance(),
        });
    }

    /// Spends `cost` from the balance, reporting whether the purchase went through.
    pub fn try_purchase(&mut self, cost: u32, out: &mut Vec<Event>) -> bool {
        if self.currency.try_purchase(cost) {
            out.push(Event::CurrencyChanged {
                balance: self.currency.balance(),
            });
            true
        } else {
            debug!(cost, balance = self.currency.balance(), "purchase rejected");
            out.push(Event::PurchaseRejected {
                cost,
                balance: self.currency.balance(),
            });
            false
        }
    }

    /// Drops every subscription. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.subscriptions.clear();
        self.shut_down = true;
        debug!("level coordinator shut down");
    }

    /// Sums the current health of every craft on the roster.
    #[must_use]
    pub fn total_player_health(&self, crafts: &[CraftSnapshot]) -> f32 {
        crafts
            .iter()
            .filter(|craft| self.roster.binary_search(&craft.id).is_ok())
            .map(|craft| craft.health)
            .sum()
    }

    /// Current phase of the level.
    #[must_use]
    pub const fn state(&self) -> LevelState {
        self.state
    }

    /// Reports whether the level reached [`LevelState::Win`] or [`LevelState::Lose`].
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Number of enemies currently alive.
    #[must_use]
    pub const fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    /// Number of player crafts still alive.
    #[must_use]
    pub const fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    /// Number of player crafts the level started with.
    #[must_use]
    pub const fn lives_total(&self) -> u32 {
        self.lives_total
    }

    /// Currency balance.
    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Player crafts registered at initialization, in identifier order.
    #[must_use]
    pub fn roster(&self) -> &[UnitId] {
        &self.roster
    }

    /// Reports whether the coordinator still listens for `unit`'s death.
    #[must_use]
    pub fn is_subscribed_to_unit(&self, unit: UnitId) -> bool {
        self.subscriptions.unit_deaths.contains(&unit)
    }

    /// Reports whether [`LevelCoordinator::shutdown`] ran.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn accrues_currency(&self) -> bool {
        self.always_gain_currency
            || !matches!(self.state, LevelState::Upgrading | LevelState::Intro)
    }

    fn intro_completed(&mut self, out: &mut Vec<Event>) {
        self.subscriptions.intro_completed = false;
        self.change_state(LevelState::Upgrading, out);
    }

    fn spawning_completed(&mut self, out: &mut Vec<Event>) {
        self.change_state(LevelState::AllEnemiesSpawned, out);
    }

    fn unit_died(&mut self, unit: UnitId, out: &mut Vec<Event>) {
        if !self.subscriptions.unit_deaths.remove(&unit) {
            return;
        }

        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        out.push(Event::PlayerUnitDestroyed);

        if self.lives_remaining == 0 && !self.is_game_over() {
            self.change_state(LevelState::Lose, out);
        }
    }

    fn change_state(&mut self, next: LevelState, out: &mut Vec<Event>) {
        if self.state == next {
            return;
        }
        if self.state.is_game_over() {
            debug!(current = ?self.state, requested = ?next, "ignoring transition after game over");
            return;
        }

        let previous = self.state;
        self.state = next;
        info!(from = ?previous, to = ?next, "level state changed");
        out.push(Event::LevelStateChanged {
            from: previous,
            to: next,
        });

        match next {
            LevelState::SpawningEnemies => out.push(Event::WaveStartRequested),
            LevelState::AllEnemiesSpawned => {
                // Every enemy may already be gone when the last wave reports in.
                if self.enemy_count == 0 {
                    self.change_state(LevelState::Win, out);
                }
            }
            LevelState::Lose => out.push(Event::LevelFailed),
            LevelState::Win => out.push(Event::LevelCompleted),
            LevelState::Intro | LevelState::Upgrading => {}
        }
    }
}
