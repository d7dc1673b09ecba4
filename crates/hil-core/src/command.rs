//! Operator command parsing and application.
//!
//! Operators type one command per line. Input is trimmed and matched
//! case-insensitively:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `pause` | Suspend sample production |
//! | `resume` | Continue sample production |
//! | `stop` | End the run (also from paused) |
//! | `amp <value>` | Set amplitude, `value >= 0` |
//! | `freq <value>` | Set frequency, `value > 0` |
//! | `noise <value>` | Set noise std, `value >= 0` |
//!
//! Bad input never reaches the parameter store. Every rejection is turned
//! into a [`Notice`] for the operator; nothing is silently dropped.

use std::fmt;

use tracing::{info, warn};

use crate::input::{InputSource, LinePoll};
use crate::params::{Param, ParamError, SensorParams};
use crate::state::{RunEvent, RunState};

/// A parsed, validated operator command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorCommand {
    /// Pause the run.
    Pause,
    /// Resume the run.
    Resume,
    /// Stop the run.
    Stop,
    /// Set a sensor parameter. `value` has already passed validation.
    Set {
        /// The parameter to set.
        param: Param,
        /// The new value.
        value: f64,
    },
}

/// Why an operator line was not accepted.
///
/// The `Display` text is the message shown to the operator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The line does not match any command.
    #[error("Unknown command.")]
    Unrecognized {
        /// The normalized input line.
        input: String,
    },

    /// The value argument is missing or is not a number.
    #[error("Invalid {}. Use: {} <value>", .param.name(), .param.keyword())]
    InvalidValue {
        /// The parameter the command targets.
        param: Param,
        /// The raw argument, if one was given.
        raw: Option<String>,
    },

    /// The value is a number but violates the parameter's constraint.
    #[error("{source}")]
    Rejected {
        /// The underlying validation error.
        #[from]
        source: ParamError,
    },
}

/// Parse one operator line.
///
/// Tokens after a parameter value are ignored.
///
/// # Errors
///
/// Returns [`CommandError`] if the line is not a valid command.
pub fn parse_command(line: &str) -> Result<OperatorCommand, CommandError> {
    let normalized = line.trim().to_lowercase();
    let mut tokens = normalized.split_whitespace();
    let keyword = tokens.next().unwrap_or_default();
    let arg = tokens.next();

    match keyword {
        "pause" if arg.is_none() => Ok(OperatorCommand::Pause),
        "resume" if arg.is_none() => Ok(OperatorCommand::Resume),
        "stop" if arg.is_none() => Ok(OperatorCommand::Stop),
        _ => match param_for_keyword(keyword) {
            Some(param) => parse_value(param, arg),
            None => Err(CommandError::Unrecognized { input: normalized }),
        },
    }
}

fn param_for_keyword(keyword: &str) -> Option<Param> {
    [Param::Amplitude, Param::Frequency, Param::NoiseStd]
        .into_iter()
        .find(|param| param.keyword() == keyword)
}

fn parse_value(param: Param, arg: Option<&str>) -> Result<OperatorCommand, CommandError> {
    let raw = arg.ok_or(CommandError::InvalidValue { param, raw: None })?;
    let value: f64 = raw.parse().map_err(|_err| CommandError::InvalidValue {
        param,
        raw: Some(raw.to_owned()),
    })?;
    let value = param.check(value)?;
    Ok(OperatorCommand::Set { param, value })
}

/// Operator-facing result of processing one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The run was paused.
    Paused,
    /// The run was resumed.
    Resumed,
    /// The operator asked to stop.
    Stopping,
    /// The input stream closed; treated as a stop.
    InputClosed,
    /// A parameter was updated.
    Updated {
        /// The parameter that changed.
        param: Param,
        /// Its new value.
        value: f64,
    },
    /// The line was rejected; state is unchanged.
    Rejected(CommandError),
}

impl Notice {
    /// Whether this notice reports a rejected line.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused => f.write_str("Simulation paused."),
            Self::Resumed => f.write_str("Simulation resumed."),
            Self::Stopping => f.write_str("Stopping simulation..."),
            Self::InputClosed => f.write_str("EOF received. Stopping simulation..."),
            // Debug keeps the decimal point on whole numbers ("2.0", not "2").
            Self::Updated { param, value } => write!(f, "{} updated to {value:?}", param.title()),
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}

/// Apply a validated command to the parameter store and run state.
pub fn apply_command(
    command: OperatorCommand,
    params: &mut SensorParams,
    state: &mut RunState,
) -> Notice {
    match command {
        OperatorCommand::Pause => {
            transition(state, RunEvent::Pause);
            Notice::Paused
        }
        OperatorCommand::Resume => {
            transition(state, RunEvent::Resume);
            Notice::Resumed
        }
        OperatorCommand::Stop => {
            transition(state, RunEvent::Stop);
            Notice::Stopping
        }
        OperatorCommand::Set { param, value } => match params.set(param, value) {
            Ok(previous) => {
                info!(param = %param, previous, value, "Sensor parameter updated");
                Notice::Updated { param, value }
            }
            Err(source) => Notice::Rejected(CommandError::Rejected { source }),
        },
    }
}

fn transition(state: &mut RunState, event: RunEvent) {
    let from = *state;
    if state.apply(event) {
        let to = *state;
        info!(from = %from, to = %to, ?event, "Run state changed");
    }
}

/// Operator command intake for the tick loop.
///
/// Wraps an [`InputSource`] and turns each poll into at most one applied
/// command. Lines queued behind it wait for later polls.
#[derive(Debug)]
pub struct CommandChannel<I> {
    input: I,
}

impl<I: InputSource> CommandChannel<I> {
    /// Create a channel over `input`.
    pub const fn new(input: I) -> Self {
        Self { input }
    }

    /// Poll once without blocking and apply whatever arrived.
    ///
    /// Returns `None` when no line was available, or when the run is
    /// already stopped (stopped runs take no further commands).
    pub fn poll(&mut self, params: &mut SensorParams, state: &mut RunState) -> Option<Notice> {
        if state.is_stopped() {
            return None;
        }
        match self.input.try_read_line() {
            LinePoll::Empty => None,
            LinePoll::Closed => {
                transition(state, RunEvent::InputClosed);
                Some(Notice::InputClosed)
            }
            LinePoll::Line(line) => Some(match parse_command(&line) {
                Ok(command) => apply_command(command, params, state),
                Err(err) => {
                    warn!(input = line.trim(), reason = %err, "Operator command rejected");
                    Notice::Rejected(err)
                }
            }),
        }
    }

    /// Borrow the underlying input source.
    pub const fn input(&self) -> &I {
        &self.input
    }

    /// Consume the channel and return the input source.
    pub fn into_input(self) -> I {
        self.input
    }
}
