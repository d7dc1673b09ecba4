//! Flight computer decision logic.
//!
//! Maps a gyro reading to a [`CommandLabel`] by comparing its magnitude
//! against two thresholds. Each band includes its lower bound, so a reading
//! of exactly 0.8 engages the dampers and exactly 0.3 stabilizes yaw.

use hil_types::CommandLabel;

/// Magnitude at or above which the dampers are activated.
pub const DAMPERS_THRESHOLD: f64 = 0.8;

/// Magnitude at or above which yaw is stabilized.
pub const YAW_THRESHOLD: f64 = 0.3;

/// Decide the flight computer command for a reading.
pub fn decide(reading: f64) -> CommandLabel {
    let magnitude = reading.abs();
    if magnitude >= DAMPERS_THRESHOLD {
        CommandLabel::ActivateDampers
    } else if magnitude >= YAW_THRESHOLD {
        CommandLabel::StabilizeYaw
    } else {
        CommandLabel::HoldPosition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_readings_activate_dampers() {
        assert_eq!(decide(0.81), CommandLabel::ActivateDampers);
        assert_eq!(decide(-1.7), CommandLabel::ActivateDampers);
        assert_eq!(decide(25.0), CommandLabel::ActivateDampers);
    }

    #[test]
    fn moderate_readings_stabilize_yaw() {
        assert_eq!(decide(0.5), CommandLabel::StabilizeYaw);
        assert_eq!(decide(-0.79), CommandLabel::StabilizeYaw);
        assert_eq!(decide(0.31), CommandLabel::StabilizeYaw);
    }

    #[test]
    fn small_readings_hold_position() {
        assert_eq!(decide(0.0), CommandLabel::HoldPosition);
        assert_eq!(decide(0.29), CommandLabel::HoldPosition);
        assert_eq!(decide(-0.2999), CommandLabel::HoldPosition);
    }

    #[test]
    fn boundaries_belong_to_higher_band() {
        assert_eq!(decide(0.8), CommandLabel::ActivateDampers);
        assert_eq!(decide(-0.8), CommandLabel::ActivateDampers);
        assert_eq!(decide(0.3), CommandLabel::StabilizeYaw);
        assert_eq!(decide(-0.3), CommandLabel::StabilizeYaw);
    }

    #[test]
    fn nan_reading_holds_position() {
        assert_eq!(decide(f64::NAN), CommandLabel::HoldPosition);
    }
}
