//! Real-time tick loop with operator controls.
//!
//! This module provides [`run_simulation`], the async function that drives
//! the simulation at fixed simulated-time steps `t = 0, dt, 2*dt, ...` while
//! `t < duration`. Each tick:
//!
//! 1. Polls the [`CommandChannel`] once (never blocking).
//! 2. While paused, sleeps a short interval and re-polls, without consuming
//!    a time step.
//! 3. Computes a gyro reading from the current parameters.
//! 4. Lets the flight computer decide a command.
//! 5. Records the [`Sample`] and reports it to the [`Console`].
//! 6. Sleeps until wall-clock time catches up with `t`.
//!
//! A stop (operator `stop` or input end of stream) is observed only at poll
//! points, so it takes effect within one tick or one pause poll.

use hil_types::{EndReason, Sample};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::command::{CommandChannel, Notice};
use crate::config::{ConfigError, TimingConfig};
use crate::decision;
use crate::input::InputSource;
use crate::pacer::Pacer;
use crate::params::SensorParams;
use crate::sensor;
use crate::state::RunState;

/// Errors that can prevent the simulation from running.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The timing configuration is invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },
}

/// Result of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: EndReason,
    /// Every recorded sample, in tick order.
    pub samples: Vec<Sample>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Sensor parameters in effect when the run ended.
    pub final_params: SensorParams,
}

/// Receiver for operator-facing output produced during the run.
///
/// The binary prints to stdout; tests record what they receive.
pub trait Console: Send {
    /// Called once per recorded tick.
    fn on_sample(&mut self, sample: &Sample);

    /// Called for every processed operator line and for end of input.
    fn on_notice(&mut self, notice: &Notice);
}

/// A console that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentConsole;

impl Console for SilentConsole {
    fn on_sample(&mut self, _sample: &Sample) {}
    fn on_notice(&mut self, _notice: &Notice) {}
}

/// Format the per-tick status line.
///
/// `[t=<t, 1 decimal>s] Gyro=<reading, 2 decimals> | Command=<label>`
pub fn status_line(sample: &Sample) -> String {
    format!(
        "[t={:.1}s] Gyro={:.2} | Command={}",
        sample.timestamp, sample.reading, sample.command
    )
}

/// Run the tick loop until the duration is exhausted or the run stops.
///
/// # Arguments
///
/// * `timing` - Step, duration, and pause poll interval
/// * `params` - Initial sensor parameters
/// * `commands` - Non-blocking operator command intake
/// * `rng` - Random source for sensor noise
/// * `console` - Receives status lines and operator notices
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if `timing` fails validation. Nothing
/// inside the loop is fatal.
pub async fn run_simulation<I: InputSource>(
    timing: &TimingConfig,
    mut params: SensorParams,
    commands: &mut CommandChannel<I>,
    rng: &mut impl Rng,
    console: &mut dyn Console,
) -> Result<SimulationResult, RunnerError> {
    timing.validate()?;

    let dt = timing.dt_secs;
    let duration = timing.duration_secs;
    let pause_poll = timing.pause_poll_interval();

    info!(
        duration_secs = duration,
        dt_secs = dt,
        pause_poll_ms = timing.pause_poll_interval_ms,
        amplitude = params.amplitude(),
        frequency = params.frequency(),
        noise_std = params.noise_std(),
        "Simulation starting"
    );

    let pacer = Pacer::start();
    let mut state = RunState::Running;
    let mut stop_cause: Option<EndReason> = None;
    let mut samples: Vec<Sample> = Vec::new();
    let mut total_ticks: u64 = 0;
    let mut step: u32 = 0;

    loop {
        let t = f64::from(step) * dt;
        if t >= duration || state.is_stopped() {
            break;
        }

        // --- Poll operator input ---
        poll_commands(commands, &mut params, &mut state, console, &mut stop_cause);

        // --- Hold while paused ---
        if state.is_paused() {
            info!(t, "Simulation paused, waiting for resume...");
            while state.is_paused() {
                tokio::time::sleep(pause_poll).await;
                poll_commands(commands, &mut params, &mut state, console, &mut stop_cause);
            }
            if state == RunState::Running {
                info!(t, "Simulation resumed");
            }
        }

        if state.is_stopped() {
            break;
        }

        // --- Sense, decide, record ---
        let reading = sensor::read_gyro(t, &params, rng);
        let command = decision::decide(reading);
        let sample = Sample::new(t, reading, command);
        debug!(t, reading, command = %command, "Tick");

        console.on_sample(&sample);
        samples.push(sample);
        total_ticks = total_ticks.saturating_add(1);

        // --- Pace against wall clock ---
        pacer.hold(t).await;

        let Some(next) = step.checked_add(1) else {
            warn!(step, "Tick counter exhausted");
            break;
        };
        step = next;
    }

    let end_reason = stop_cause.unwrap_or(EndReason::DurationElapsed);
    Ok(SimulationResult {
        end_reason,
        samples,
        total_ticks,
        final_params: params,
    })
}

/// Poll once, report any notice, and remember why the run is stopping.
fn poll_commands<I: InputSource>(
    commands: &mut CommandChannel<I>,
    params: &mut SensorParams,
    state: &mut RunState,
    console: &mut dyn Console,
    stop_cause: &mut Option<EndReason>,
) {
    let Some(notice) = commands.poll(params, state) else {
        return;
    };
    match notice {
        Notice::Stopping => *stop_cause = Some(EndReason::OperatorStop),
        Notice::InputClosed => *stop_cause = Some(EndReason::InputClosed),
        _ => {}
    }
    console.on_notice(&notice);
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_t = result.samples.last().map(|s| s.timestamp),
        amplitude = result.final_params.amplitude(),
        frequency = result.final_params.frequency(),
        noise_std = result.final_params.noise_std(),
        "Simulation ended"
    );
    if result.samples.is_empty() {
        warn!("Simulation ended with no ticks executed");
    } else if result.end_reason.is_early() {
        info!(
            recorded = result.samples.len(),
            "Run cut short by operator; artifacts cover the recorded ticks only"
        );
    }
}
