//! End-to-end tests of the tick loop fed through a channel, the way the
//! binary feeds it from the stdin reader thread.
//!
//! A scripted operator sits behind the [`Console`] and pushes lines into the
//! channel in reaction to what the loop reports, so each command lands on a
//! known poll.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::io::Cursor;

use hil_core::command::{CommandChannel, Notice};
use hil_core::config::{SimulationConfig, TimingConfig};
use hil_core::input::{ChannelInput, spawn_line_reader};
use hil_core::params::SensorParams;
use hil_core::report;
use hil_core::runner::{Console, SimulationResult, run_simulation};
use hil_types::{EndReason, Sample};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::mpsc::Sender;

/// Operator that sends lines after a given number of samples, and can
/// answer a notice with another line.
struct ScriptedOperator {
    tx: Option<Sender<String>>,
    after_samples: Vec<(usize, Option<&'static str>)>,
    on_pause: Option<&'static str>,
    seen: usize,
    notices: Vec<String>,
}

impl ScriptedOperator {
    fn new(tx: Sender<String>) -> Self {
        Self {
            tx: Some(tx),
            after_samples: Vec::new(),
            on_pause: None,
            seen: 0,
            notices: Vec::new(),
        }
    }

    /// Send `line` once `count` samples have been recorded.
    fn after(mut self, count: usize, line: &'static str) -> Self {
        self.after_samples.push((count, Some(line)));
        self
    }

    /// Close the input once `count` samples have been recorded.
    fn close_after(mut self, count: usize) -> Self {
        self.after_samples.push((count, None));
        self
    }

    /// Reply with `line` whenever the loop reports a pause.
    fn on_pause(mut self, line: &'static str) -> Self {
        self.on_pause = Some(line);
        self
    }

    fn send(&mut self, line: &str) {
        if let Some(tx) = &self.tx {
            tx.try_send(line.to_owned()).unwrap();
        }
    }
}

impl Console for ScriptedOperator {
    fn on_sample(&mut self, _sample: &Sample) {
        self.seen += 1;
        let due: Vec<Option<&'static str>> = self
            .after_samples
            .iter()
            .filter(|(count, _)| *count == self.seen)
            .map(|(_, line)| *line)
            .collect();
        for action in due {
            match action {
                Some(line) => self.send(line),
                None => self.tx = None,
            }
        }
    }

    fn on_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.to_string());
        if *notice == Notice::Paused
            && let Some(line) = self.on_pause
        {
            self.send(line);
        }
    }
}

fn timing(duration_secs: f64, dt_secs: f64) -> TimingConfig {
    TimingConfig {
        duration_secs,
        dt_secs,
        pause_poll_interval_ms: 50,
        seed: None,
    }
}

async fn drive(
    timing: &TimingConfig,
    input: ChannelInput,
    console: &mut dyn Console,
) -> SimulationResult {
    let mut commands = CommandChannel::new(input);
    let mut rng = SmallRng::seed_from_u64(2024);
    let params = SensorParams::new(1.0, 0.5, 0.0).unwrap();
    run_simulation(timing, params, &mut commands, &mut rng, console)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn uninterrupted_run_records_every_tick() {
    let (tx, input) = ChannelInput::pair(8);
    let mut operator = ScriptedOperator::new(tx);
    let result = drive(&timing(1.0, 0.5), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::DurationElapsed);
    let stamps: Vec<f64> = result.samples.iter().map(|s| s.timestamp).collect();
    assert_eq!(stamps, vec![0.0, 0.5]);
    assert!(operator.notices.is_empty());
}

#[tokio::test(start_paused = true)]
async fn amplitude_update_is_not_retroactive() {
    let (tx, input) = ChannelInput::pair(8);
    let mut operator = ScriptedOperator::new(tx).after(2, "amp 2.5");
    let result = drive(&timing(1.0, 0.25), input, &mut operator).await;

    assert_eq!(operator.notices, vec!["Amplitude updated to 2.5".to_owned()]);
    assert!((result.samples[1].reading - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    assert!((result.samples[2].reading - 2.5).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn pause_then_resume_continues_from_next_tick() {
    let (tx, input) = ChannelInput::pair(8);
    let mut operator = ScriptedOperator::new(tx)
        .after(1, "pause")
        .on_pause("resume");
    let result = drive(&timing(1.0, 0.25), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::DurationElapsed);
    assert_eq!(result.samples.len(), 4);
    assert_eq!(
        operator.notices,
        vec!["Simulation paused.".to_owned(), "Simulation resumed.".to_owned()]
    );
    // No tick was skipped while paused.
    let stamps: Vec<f64> = result.samples.iter().map(|s| s.timestamp).collect();
    assert_eq!(stamps, vec![0.0, 0.25, 0.5, 0.75]);
}

#[tokio::test(start_paused = true)]
async fn stop_while_paused_appends_nothing_more() {
    let (tx, input) = ChannelInput::pair(8);
    let mut operator = ScriptedOperator::new(tx).after(3, "pause").on_pause("stop");
    let result = drive(&timing(2.0, 0.1), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::OperatorStop);
    assert_eq!(result.samples.len(), 3);
    assert_eq!(
        operator.notices.last().map(String::as_str),
        Some("Stopping simulation...")
    );
}

#[tokio::test(start_paused = true)]
async fn end_of_input_matches_stop() {
    let (tx, input) = ChannelInput::pair(8);
    let mut stopper = ScriptedOperator::new(tx).after(5, "stop");
    let stopped = drive(&timing(2.0, 0.1), input, &mut stopper).await;

    let (tx, input) = ChannelInput::pair(8);
    let mut closer = ScriptedOperator::new(tx).close_after(5);
    let closed = drive(&timing(2.0, 0.1), input, &mut closer).await;

    assert_eq!(stopped.end_reason, EndReason::OperatorStop);
    assert_eq!(closed.end_reason, EndReason::InputClosed);
    assert_eq!(stopped.samples.len(), 5);
    assert_eq!(closed.samples.len(), 5);
}

#[tokio::test]
async fn reader_thread_stop_ends_run_early() {
    let input = spawn_line_reader(Cursor::new("noise 0\nstop\n"), 4).unwrap();
    let mut operator = ScriptedOperator::new(ChannelInput::pair(1).0);
    let result = drive(&timing(30.0, 0.01), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::OperatorStop);
    assert!(result.samples.len() < 3000);
    assert_eq!(
        operator.notices,
        vec![
            "Noise std updated to 0.0".to_owned(),
            "Stopping simulation...".to_owned()
        ]
    );
}

#[tokio::test]
async fn reader_thread_reports_garbled_line_and_keeps_running() {
    let input = spawn_line_reader(Cursor::new(b"\xffbad\namp 2\nstop\n".to_vec()), 4).unwrap();
    let mut operator = ScriptedOperator::new(ChannelInput::pair(1).0);
    let result = drive(&timing(30.0, 0.01), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::OperatorStop);
    assert!(!result.samples.is_empty());
    assert!((result.final_params.amplitude() - 2.0).abs() < f64::EPSILON);
    assert_eq!(
        operator.notices,
        vec![
            "Unknown command.".to_owned(),
            "Amplitude updated to 2.0".to_owned(),
            "Stopping simulation...".to_owned()
        ]
    );
}

#[tokio::test]
async fn reader_thread_end_of_stream_ends_run_early() {
    let input = spawn_line_reader(Cursor::new(""), 4).unwrap();
    let mut operator = ScriptedOperator::new(ChannelInput::pair(1).0);
    let result = drive(&timing(30.0, 0.01), input, &mut operator).await;

    assert_eq!(result.end_reason, EndReason::InputClosed);
    assert!(result.samples.len() < 3000);
}

#[tokio::test(start_paused = true)]
async fn finished_run_feeds_report_writers() {
    let config = SimulationConfig::parse("simulation:\n  duration_secs: 1.0\n  dt_secs: 0.5\n").unwrap();
    let (tx, input) = ChannelInput::pair(8);
    let mut operator = ScriptedOperator::new(tx);
    let result = drive(&config.simulation, input, &mut operator).await;

    let log = report::render_log(&result.samples).unwrap();
    let rows: Vec<&str> = log.lines().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], report::LOG_HEADER);
    assert!(rows[1].starts_with("0.0,"));
    assert!(rows[2].starts_with("0.5,"));

    let svg = report::render_plot(&result.samples).unwrap();
    assert!(svg.contains("Dampers Threshold"));
    assert!(svg.contains("Yaw Threshold"));
}
