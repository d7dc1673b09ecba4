//! Recorded simulation values.

use serde::{Deserialize, Serialize};

use crate::enums::CommandLabel;

/// One recorded tick of the simulation.
///
/// Samples are immutable once recorded. The tick loop appends them in
/// strictly increasing `timestamp` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulated time of the tick in seconds.
    pub timestamp: f64,
    /// Gyroscope reading (angular velocity, rad/s).
    pub reading: f64,
    /// Command the flight computer issued for this reading.
    pub command: CommandLabel,
}

impl Sample {
    /// Create a sample.
    pub const fn new(timestamp: f64, reading: f64, command: CommandLabel) -> Self {
        Self {
            timestamp,
            reading,
            command,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sample_serializes_with_label_variant() {
        let sample = Sample::new(0.5, -0.25, CommandLabel::HoldPosition);
        let yaml = serde_yml::to_string(&sample).unwrap();
        assert!(yaml.contains("command: HoldPosition"));

        let back: Sample = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back.command, CommandLabel::HoldPosition);
        assert!((back.reading - -0.25).abs() < f64::EPSILON);
    }
}
