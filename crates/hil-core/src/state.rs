//! Run state machine for the tick loop.
//!
//! ```text
//!            pause                 stop / input closed
//!   Running --------> Paused  ----------------------->  Stopped
//!      ^                |                                  ^
//!      +----------------+                                  |
//!            resume                                        |
//!      |             stop / input closed                   |
//!      +---------------------------------------------------+
//! ```
//!
//! `Stopped` is absorbing: once entered, no event leaves it.

use std::fmt;

/// Current state of the simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Ticks are produced normally.
    #[default]
    Running,
    /// Sample production is suspended; commands are still polled.
    Paused,
    /// Terminal. No further ticks or commands.
    Stopped,
}

/// An event that may change the run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunEvent {
    /// Operator `pause`.
    Pause,
    /// Operator `resume`.
    Resume,
    /// Operator `stop`.
    Stop,
    /// The operator input stream closed.
    InputClosed,
}

impl RunState {
    /// Compute the state reached from `self` on `event`.
    pub const fn next(self, event: RunEvent) -> Self {
        match (self, event) {
            (Self::Stopped, _) | (_, RunEvent::Stop | RunEvent::InputClosed) => Self::Stopped,
            (_, RunEvent::Pause) => Self::Paused,
            (_, RunEvent::Resume) => Self::Running,
        }
    }

    /// Apply `event` in place. Returns `true` if the state changed.
    pub fn apply(&mut self, event: RunEvent) -> bool {
        let next = self.next(event);
        let changed = next != *self;
        *self = next;
        changed
    }

    /// Whether the run is paused.
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Whether the run has stopped.
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        })
    }
}
