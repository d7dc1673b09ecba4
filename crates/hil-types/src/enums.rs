//! Enumeration types for the gyroscope HIL simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flight computer commands
// ---------------------------------------------------------------------------

/// The command issued by the flight computer for a single gyro reading.
///
/// Commands are ordered by severity: [`HoldPosition`](Self::HoldPosition)
/// is the quiescent state, [`ActivateDampers`](Self::ActivateDampers) the
/// strongest response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommandLabel {
    /// Angular velocity is within the quiet band; no correction needed.
    HoldPosition,
    /// Moderate angular velocity; trim yaw to stabilize.
    StabilizeYaw,
    /// Large angular velocity; engage the dampers.
    ActivateDampers,
}

impl CommandLabel {
    /// Operator-facing label text, as written to the status line and log.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HoldPosition => "Hold Position",
            Self::StabilizeYaw => "Stabilize Yaw",
            Self::ActivateDampers => "Activate Dampers",
        }
    }
}

impl fmt::Display for CommandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Run termination
// ---------------------------------------------------------------------------

/// Reason why a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Every scheduled tick below the configured duration was executed.
    DurationElapsed,
    /// The operator issued a `stop` command.
    OperatorStop,
    /// The operator input stream closed (treated as an implicit stop).
    InputClosed,
}

impl EndReason {
    /// Whether the run was cut short by the operator side.
    pub const fn is_early(self) -> bool {
        matches!(self, Self::OperatorStop | Self::InputClosed)
    }
}
