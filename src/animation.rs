//! Frame pacing for the step-by-step animation.
//!
//! This module contains the clock that decides when the running algorithm is allowed to take its
//! next batch of steps, keeping the animation speed independent of how often the terminal is
//! redrawn.

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

/// Upper bound on how long the event loop blocks waiting for input.
///
/// This constant keeps the interface responsive to key presses even when the animation delay is
/// long, mirroring the input polling interval of the menus.
pub(crate) const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Animation pacing state.
///
/// This structure tracks when the last batch of algorithm steps ran and how many steps each
/// batch performs, so the driver can ask whether the next batch is due.
#[derive(Debug)]
pub(crate) struct AnimationClock {
    /// Delay between consecutive batches of steps.
    ///
    /// This field controls the timing between animation frames. A zero delay runs a batch on every
    /// pass through the event loop.
    pub(crate) delay: Duration,
    /// Number of algorithm steps performed per batch.
    pub(crate) steps_per_tick: NonZeroUsize,
    /// Timestamp of the last batch.
    ///
    /// This field stores the time when the animation last advanced, used to control the timing
    /// between animation frames.
    pub(crate) last_update_time: Instant,
}

impl AnimationClock {
    /// Creates a clock that is due immediately.
    pub(crate) fn new(delay: Duration, steps_per_tick: NonZeroUsize) -> Self {
        Self {
            delay,
            steps_per_tick,
            last_update_time: Instant::now()
                .checked_sub(delay)
                .unwrap_or_else(Instant::now),
        }
    }

    /// Restarts the delay from now.
    pub(crate) fn reset(&mut self) {
        self.last_update_time = Instant::now();
    }

    /// Reports whether the next batch is due and, if so, starts a new delay period.
    pub(crate) fn due(&mut self) -> bool {
        if self.last_update_time.elapsed() >= self.delay {
            self.last_update_time = Instant::now();
            true
        } else {
            false
        }
    }

    /// Time left until the next batch, capped at [`INPUT_POLL_INTERVAL`].
    pub(crate) fn poll_timeout(&self) -> Duration {
        self.delay
            .saturating_sub(self.last_update_time.elapsed())
            .min(INPUT_POLL_INTERVAL)
    }
}
