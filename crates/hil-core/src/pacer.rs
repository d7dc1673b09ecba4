//! Real-time pacing for the tick loop.
//!
//! The pacer keeps simulated time in step with wall-clock time. Before the
//! next tick it sleeps for `max(0, t - elapsed)`, where `t` is the simulated
//! time of the tick just processed and `elapsed` is wall-clock time since the
//! run started. A tick that overruns its slot gets no sleep and no catch-up;
//! the drift simply persists.
//!
//! Time is read from [`tokio::time::Instant`] so tests can run the loop on a
//! paused clock.

use std::time::Duration;

use tokio::time::Instant;

/// Wall-clock anchor for a single run.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    started_at: Instant,
}

impl Pacer {
    /// Start pacing from now.
    pub fn start() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start pacing from an explicit instant.
    pub const fn starting_at(started_at: Instant) -> Self {
        Self { started_at }
    }

    /// Wall-clock time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// How long to sleep so that wall-clock time reaches simulated time `t`.
    pub fn sleep_duration(&self, t: f64) -> Duration {
        sleep_for(t, self.elapsed())
    }

    /// Sleep until wall-clock time reaches simulated time `t`.
    ///
    /// Returns immediately when the run is behind schedule.
    pub async fn hold(&self, t: f64) {
        let wait = self.sleep_duration(t);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// `max(0, scheduled - elapsed)`, with non-finite schedules treated as zero.
pub fn sleep_for(scheduled_secs: f64, elapsed: Duration) -> Duration {
    let remaining = scheduled_secs - elapsed.as_secs_f64();
    if remaining.is_finite() && remaining > 0.0 {
        Duration::try_from_secs_f64(remaining).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
