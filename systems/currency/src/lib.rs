#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Currency gainer that turns forwarded income time into currency grants.
//!
//! The gainer never touches the balance itself: the level owns it and
//! decides which ticks count as income by emitting [`Event::IncomeTick`].

use std::time::Duration;

use lost_drone_core::{Command, Event};

/// Configuration parameters required to construct the currency gainer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    amount: u32,
    interval: Duration,
}

impl Config {
    /// Grants `amount` every `interval` of income time.
    #[must_use]
    pub const fn new(amount: u32, interval: Duration) -> Self {
        Self { amount, interval }
    }

    /// Currency granted per interval.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Income time required for one grant.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Pure system that emits a grant for every elapsed income interval.
#[derive(Debug)]
pub struct CurrencyGainer {
    config: Config,
    accumulator: Duration,
    granted: u64,
}

impl CurrencyGainer {
    /// Creates a gainer with an empty accumulator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            granted: 0,
        }
    }

    /// Resets the partially accumulated interval and the grant total at the
    /// start of a level session.
    pub fn initialize(&mut self) {
        self.accumulator = Duration::ZERO;
        self.granted = 0;
    }

    /// Total currency granted since the last [`CurrencyGainer::initialize`].
    #[must_use]
    pub const fn granted(&self) -> u64 {
        self.granted
    }

    /// Consumes income ticks and emits [`Command::GainCurrency`] grants.
    ///
    /// Several intervals elapsing in one call yield one combined grant.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.config.amount == 0 || self.config.interval.is_zero() {
            return;
        }

        let mut intervals: u32 = 0;
        for event in events {
            if let Event::IncomeTick { dt } = event {
                intervals = intervals.saturating_add(self.tick(*dt));
            }
        }

        if intervals == 0 {
            return;
        }

        let amount = self.config.amount.saturating_mul(intervals);
        self.granted = self.granted.saturating_add(u64::from(amount));
        out.push(Command::GainCurrency { amount });
    }

    fn tick(&mut self, dt: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(dt);
        let elapsed = self.accumulator.as_nanos() / self.config.interval.as_nanos();
        let intervals = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.accumulator = self
            .accumulator
            .saturating_sub(self.config.interval.saturating_mul(intervals));
        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_interval_carries_over() {
        let mut gainer = CurrencyGainer::new(Config::new(1, Duration::from_secs(1)));

        assert_eq!(gainer.tick(Duration::from_millis(700)), 0);
        assert_eq!(gainer.tick(Duration::from_millis(700)), 1);
        assert_eq!(gainer.accumulator, Duration::from_millis(400));
    }
}
