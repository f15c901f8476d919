#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-threaded session that wires the level coordinator, the field and
//! the collaborator systems together.
//!
//! Every frame starts with a [`Command::Tick`] and runs in rounds: commands
//! are routed to the component owning the affected state, the coordinator
//! reacts to the resulting events, listeners observe them, and the systems
//! answer with the commands of the next round.

mod config;
mod listeners;

use std::time::Duration;

use lost_drone_core::{Command, Event, LevelState};
use lost_drone_level::LevelCoordinator;
use lost_drone_system_currency::CurrencyGainer;
use lost_drone_system_intro::LevelIntro;
use lost_drone_system_pilot::{CraftInput, Pilot};
use lost_drone_system_waves::Waves;
use lost_drone_world::{self as world, query, World};
use tracing::{debug, warn};

pub use config::{
    ConfigError, CraftSection, CurrencySection, FieldSection, LevelConfig, LevelSection,
    NodesSection, WaveSection, WavesSection, SUPPORTED_CONFIG_VERSION,
};
pub use listeners::ListenerId;
use listeners::Listeners;

/// Upper bound on command rounds processed within one step.
pub const MAX_ROUNDS: usize = 16;

/// Running level together with every collaborator it talks to.
#[derive(Debug)]
pub struct Session {
    level: LevelCoordinator,
    world: World,
    intro: Option<LevelIntro>,
    gainer: CurrencyGainer,
    waves: Waves,
    pilot: Pilot,
    listeners: Listeners,
    backlog: Vec<Event>,
    queued: Vec<Command>,
}

impl Session {
    /// Builds the field and systems from `config` and initializes the level.
    ///
    /// Notifications raised while initializing are delivered on the first
    /// [`Session::step`], after listeners had a chance to subscribe.
    pub fn new(config: &LevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = World::new(config.field_config(), &config.craft_configs())
            .with_path_nodes(config.path_nodes()?);
        let roster = query::unit_ids(&world);
        let pilot = Pilot::new(roster.iter().copied().zip(config.fire_rates()));

        let mut gainer = CurrencyGainer::new(config.currency_settings());
        gainer.initialize();

        let mut backlog = Vec::new();
        let level = LevelCoordinator::initialize(config.level_settings(), &roster, &mut backlog);
        debug!(
            crafts = roster.len(),
            state = ?level.state(),
            "session initialized"
        );

        Ok(Self {
            level,
            world,
            intro: config.intro_duration().map(LevelIntro::new),
            gainer,
            waves: Waves::new(config.wave_settings()),
            pilot,
            listeners: Listeners::default(),
            backlog,
            queued: Vec::new(),
        })
    }

    /// Registers a callback that observes every event in emission order.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Removes a callback; returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Queues a host command for the next step.
    pub fn submit(&mut self, command: Command) {
        self.queued.push(command);
    }

    /// Cuts the intro short, if one is playing.
    pub fn skip_intro(&mut self) {
        if let Some(intro) = self.intro.as_mut() {
            intro.skip();
        }
    }

    /// Tears the level down; the field keeps simulating.
    pub fn shutdown(&mut self) {
        self.level.shutdown();
    }

    /// Advances the session by one frame.
    pub fn step(&mut self, dt: Duration, inputs: &[CraftInput]) {
        let mut commands = std::mem::take(&mut self.queued);
        commands.push(Command::Tick { dt });
        let mut events = std::mem::take(&mut self.backlog);

        for round in 0..MAX_ROUNDS {
            for command in commands.drain(..) {
                self.route(command, &mut events);
            }

            let mut reactions = Vec::new();
            self.level.handle(&events, &mut reactions);
            events.append(&mut reactions);
            self.listeners.publish(&events);

            let frame_inputs = if round == 0 { inputs } else { &[] };
            self.dispatch(&events, frame_inputs, &mut commands);
            events.clear();

            if commands.is_empty() {
                return;
            }
        }

        warn!(pending = commands.len(), "step ended with unprocessed commands");
    }

    fn route(&mut self, command: Command, events: &mut Vec<Event>) {
        match command {
            Command::Tick { dt } => {
                world::apply(&mut self.world, Command::Tick { dt }, events);
                self.level.tick(dt, events);
            }
            Command::CompleteUpgrading => self.level.complete_upgrading(events),
            Command::CompleteIntro => events.push(Event::IntroCompleted),
            Command::AnnounceWave { index } => events.push(Event::WaveStarted { index }),
            Command::CompleteSpawning => events.push(Event::SpawningCompleted),
            Command::GainCurrency { amount } => self.level.gain_currency(amount, events),
            Command::SpendCurrency { cost } => {
                // Reported through `CurrencyChanged` or `PurchaseRejected`.
                let _ = self.level.try_purchase(cost, events);
            }
            command @ (Command::SpawnEnemy { .. }
            | Command::SteerCraft { .. }
            | Command::FireShot { .. }
            | Command::DamageCraft { .. }) => world::apply(&mut self.world, command, events),
        }
    }

    fn dispatch(&mut self, events: &[Event], inputs: &[CraftInput], out: &mut Vec<Command>) {
        if let Some(intro) = self.intro.as_mut() {
            intro.handle(events, out);
        }
        self.gainer.handle(events, out);
        self.waves.handle(events, out);
        self.pilot.handle(events, inputs, out);
    }

    /// Current level phase.
    #[must_use]
    pub fn state(&self) -> LevelState {
        self.level.state()
    }

    /// Reports whether the level reached [`LevelState::Win`] or [`LevelState::Lose`].
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.level.is_game_over()
    }

    /// Combined health of the crafts on the level roster.
    #[must_use]
    pub fn total_player_health(&self) -> f32 {
        self.level.total_player_health(&query::crafts(&self.world))
    }

    /// Read access to the coordinator.
    #[must_use]
    pub fn level(&self) -> &LevelCoordinator {
        &self.level
    }

    /// Read access to the field.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read access to the wave manager.
    #[must_use]
    pub fn waves(&self) -> &Waves {
        &self.waves
    }

    /// Read access to the intro, when the level plays one.
    #[must_use]
    pub fn intro(&self) -> Option<&LevelIntro> {
        self.intro.as_ref()
    }
}
