#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave manager responsible for emitting enemy spawn commands.
//!
//! The manager idles until the level requests the waves, then paces each
//! wave's enemies from [`Event::TimeAdvanced`] and reports completion once the
//! final enemy has been emitted.

use std::time::Duration;

use glam::Vec2;
use lost_drone_core::{Command, EnemyTemplate, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Pacing of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSpec {
    /// Number of enemies emitted by the wave.
    pub enemy_count: u32,
    /// Time between consecutive enemies; the first enemy appears as soon as
    /// the wave starts.
    pub spawn_interval: Duration,
    /// Pause between the previous wave (or the start request) and this wave.
    pub start_delay: Duration,
}

/// Configuration parameters required to construct the wave manager.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    waves: Vec<WaveSpec>,
    template: EnemyTemplate,
    anchor: Vec2,
    lateral_range: (f32, f32),
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration spawning every enemy at `anchor`, shifted
    /// sideways by a uniform offset drawn from `lateral_range`.
    ///
    /// A reversed range is reordered. A range with a non-finite end or
    /// width collapses onto the anchor.
    #[must_use]
    pub fn new(
        waves: Vec<WaveSpec>,
        template: EnemyTemplate,
        anchor: Vec2,
        lateral_range: (f32, f32),
        rng_seed: u64,
    ) -> Self {
        let (low, high) = lateral_range;
        let lateral_range = if !low.is_finite() || !high.is_finite() || !(high - low).is_finite() {
            (0.0, 0.0)
        } else if low <= high {
            (low, high)
        } else {
            (high, low)
        };
        Self {
            waves,
            template,
            anchor,
            lateral_range,
            rng_seed,
        }
    }

    /// Waves in the order they are played.
    #[must_use]
    pub fn waves(&self) -> &[WaveSpec] {
        &self.waves
    }

    /// Total number of enemies across every wave.
    #[must_use]
    pub fn total_enemies(&self) -> u64 {
        self.waves
            .iter()
            .map(|wave| u64::from(wave.enemy_count))
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Delaying { wave: usize },
    Spawning { wave: usize, emitted: u32 },
    Completed,
    Halted,
}

/// Pure system that emits spawn commands once the level starts the waves.
#[derive(Debug)]
pub struct Waves {
    config: Config,
    phase: Phase,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Waves {
    /// Creates an idle wave manager using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self {
            config,
            phase: Phase::Idle,
            accumulator: Duration::ZERO,
            rng,
        }
    }

    /// Reports whether the final wave emitted its last enemy.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Reports whether the manager started and has not yet finished.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Delaying { .. } | Phase::Spawning { .. })
    }

    /// Index of the wave being delayed or spawned, if any.
    #[must_use]
    pub fn current_wave(&self) -> Option<usize> {
        match self.phase {
            Phase::Delaying { wave } | Phase::Spawning { wave, .. } => Some(wave),
            Phase::Idle | Phase::Completed | Phase::Halted => None,
        }
    }

    /// Consumes level and clock events to emit spawn and progress commands.
    ///
    /// Within one call, spawn commands always precede the completion command
    /// so the level counts the final enemy before it learns spawning ended.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WaveStartRequested => self.start(out),
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::LevelStateChanged { to, .. } if to.is_game_over() => self.halt(),
                _ => {}
            }
        }
    }

    fn start(&mut self, out: &mut Vec<Command>) {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "ignoring repeated wave start request");
            return;
        }

        self.accumulator = Duration::ZERO;
        if self.config.waves.is_empty() {
            self.phase = Phase::Completed;
            out.push(Command::CompleteSpawning);
            return;
        }

        self.phase = Phase::Delaying { wave: 0 };
        self.advance(Duration::ZERO, out);
    }

    fn halt(&mut self) {
        if self.is_running() || self.phase == Phase::Idle {
            self.phase = Phase::Halted;
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if !self.is_running() {
            return;
        }
        self.accumulator = self.accumulator.saturating_add(dt);

        loop {
            match self.phase {
                Phase::Delaying { wave } => {
                    let spec = self.config.waves[wave];
                    if self.accumulator < spec.start_delay {
                        return;
                    }
                    self.accumulator -= spec.start_delay;
                    self.phase = Phase::Spawning { wave, emitted: 0 };
                    debug!(wave, enemies = spec.enemy_count, "wave started");
                    out.push(Command::AnnounceWave {
                        index: u32::try_from(wave).unwrap_or(u32::MAX),
                    });
                }
                Phase::Spawning { wave, emitted } => {
                    let spec = self.config.waves[wave];
                    if emitted >= spec.enemy_count {
                        self.finish_wave(wave, out);
                        continue;
                    }
                    if emitted > 0 {
                        if self.accumulator < spec.spawn_interval {
                            return;
                        }
                        self.accumulator -= spec.spawn_interval;
                    }
                    let position = self.next_spawn_position();
                    out.push(Command::SpawnEnemy {
                        position,
                        template: self.config.template,
                    });
                    self.phase = Phase::Spawning {
                        wave,
                        emitted: emitted + 1,
                    };
                }
                Phase::Idle | Phase::Completed | Phase::Halted => return,
            }
        }
    }

    fn finish_wave(&mut self, wave: usize, out: &mut Vec<Command>) {
        let next = wave + 1;
        if next < self.config.waves.len() {
            self.phase = Phase::Delaying { wave: next };
        } else {
            self.phase = Phase::Completed;
            self.accumulator = Duration::ZERO;
            debug!("all waves spawned");
            out.push(Command::CompleteSpawning);
        }
    }

    fn next_spawn_position(&mut self) -> Vec2 {
        let (low, high) = self.config.lateral_range;
        let offset = if low < high {
            self.rng.gen_range(low..=high)
        } else {
            low
        };
        self.config.anchor + Vec2::X * offset
    }
}
