#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed level intro that reports completion exactly once.

use std::time::Duration;

use lost_drone_core::{Command, Event};
use tracing::debug;

/// Pure system that plays an intro of fixed length.
#[derive(Debug)]
pub struct LevelIntro {
    duration: Duration,
    elapsed: Duration,
    skipped: bool,
    completed: bool,
}

impl LevelIntro {
    /// Creates an intro lasting `duration` of simulated time.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            skipped: false,
            completed: false,
        }
    }

    /// Cuts the intro short; completion is reported on the next handled batch.
    pub fn skip(&mut self) {
        self.skipped = true;
    }

    /// Reports whether completion has been emitted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }

    /// Fraction of the intro played so far, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.completed || self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Consumes clock events and emits [`Command::CompleteIntro`] once the
    /// intro has run its course.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.completed {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
        }

        if self.skipped || self.elapsed >= self.duration {
            self.completed = true;
            debug!(skipped = self.skipped, "intro finished");
            out.push(Command::CompleteIntro);
        }
    }
}
