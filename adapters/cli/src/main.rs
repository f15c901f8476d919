#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Lost Drone level headless.

mod autopilot;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lost_drone_core::{Command, Event, LevelState};
use lost_drone_session::{LevelConfig, Session};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

/// Runs a Lost Drone level without a window and prints the outcome.
#[derive(Debug, Parser)]
#[command(name = "lost-drone", version)]
struct Args {
    /// Level description in TOML; the built-in level is played when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulated seconds after which the run is abandoned.
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Length of a simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Seconds spent in the upgrading phase before the waves are started.
    #[arg(long, default_value_t = 0.0)]
    upgrade_seconds: f32,
    /// Overrides the wave seed of the level description.
    #[arg(long)]
    seed: Option<u64>,
    /// Keeps the autopilot from firing.
    #[arg(long)]
    idle: bool,
    /// Prints the effective level description as TOML and exits.
    #[arg(long)]
    print_config: bool,
}

/// Entry point for the Lost Drone command-line interface.
fn main() -> Result<()> {
    init_tracing();
    run(Args::parse())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: Args) -> Result<()> {
    if args.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }
    let frame = Duration::from_millis(args.frame_ms);
    let budget = Duration::try_from_secs_f32(args.seconds)
        .context("--seconds must be a non-negative number")?;
    let upgrade_time = Duration::try_from_secs_f32(args.upgrade_seconds)
        .context("--upgrade-seconds must be a non-negative number")?;

    let mut config = match &args.config {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.waves.seed = seed;
    }
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut session = Session::new(&config).context("failed to set up the level")?;
    let _ = session.subscribe(log_event);
    let mut autopilot = Autopilot::new(!args.idle);

    let mut elapsed = Duration::ZERO;
    let mut upgrading_since: Option<Duration> = None;
    while elapsed < budget && !session.is_game_over() {
        if session.state() == LevelState::Upgrading {
            let since = *upgrading_since.get_or_insert(elapsed);
            if elapsed - since >= upgrade_time {
                session.submit(Command::CompleteUpgrading);
            }
        }

        let inputs = autopilot.inputs(session.world());
        session.step(frame, &inputs);
        elapsed += frame;
    }

    session.shutdown();
    report(&session, elapsed);
    Ok(())
}

fn log_event(event: &Event) {
    match event {
        Event::LevelStateChanged { from, to } => info!(?from, ?to, "level state changed"),
        Event::WaveStarted { index } => info!(wave = index + 1, "wave started"),
        Event::LevelCompleted => info!("level completed"),
        Event::LevelFailed => info!("level failed"),
        Event::PlayerUnitDestroyed => warn!("player craft destroyed"),
        Event::CurrencyChanged { balance } => debug!(balance, "currency changed"),
        Event::EnemyCountChanged { count } => debug!(count, "enemy count changed"),
        other => trace!(event = ?other, "event"),
    }
}

fn report(session: &Session, elapsed: Duration) {
    let level = session.level();
    let outcome = match level.state() {
        LevelState::Win => "won",
        LevelState::Lose => "lost",
        _ => "unfinished",
    };

    println!("outcome: {outcome}");
    println!("elapsed: {:.2}s", elapsed.as_secs_f32());
    println!("lives: {}/{}", level.lives_remaining(), level.lives_total());
    println!("health: {:.1}", session.total_player_health());
    println!("currency: {}", level.currency().balance());
    println!("enemies alive: {}", level.enemy_count());
}
