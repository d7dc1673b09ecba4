//! Sensor model parameters adjustable by the operator at runtime.
//!
//! [`SensorParams`] is the only place parameter constraints are enforced.
//! Every write goes through a validating setter, so a field never holds a
//! value that failed validation: a rejected update leaves the previous
//! value in place.

use std::fmt;

/// A tunable sensor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Sine amplitude (`amp`).
    Amplitude,
    /// Sine frequency (`freq`).
    Frequency,
    /// Gaussian noise standard deviation (`noise`).
    NoiseStd,
}

impl Param {
    /// The operator command keyword that sets this parameter.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Amplitude => "amp",
            Self::Frequency => "freq",
            Self::NoiseStd => "noise",
        }
    }

    /// Lowercase human name used in operator messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Amplitude => "amplitude",
            Self::Frequency => "frequency",
            Self::NoiseStd => "noise std",
        }
    }

    /// Capitalized human name used at the start of operator messages.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Amplitude => "Amplitude",
            Self::Frequency => "Frequency",
            Self::NoiseStd => "Noise std",
        }
    }

    /// Whether zero is an accepted value.
    const fn allows_zero(self) -> bool {
        !matches!(self, Self::Frequency)
    }

    /// The constraint phrase used in rejection messages.
    pub const fn constraint(self) -> &'static str {
        if self.allows_zero() {
            "non-negative"
        } else {
            "positive"
        }
    }

    /// Check a candidate value against this parameter's constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NotFinite`] for NaN or infinities, and
    /// [`ParamError::OutOfRange`] for negative values (or zero frequency).
    pub fn check(self, value: f64) -> Result<f64, ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite { param: self });
        }
        let in_range = if self.allows_zero() {
            value >= 0.0
        } else {
            value > 0.0
        };
        if in_range {
            Ok(value)
        } else {
            Err(ParamError::OutOfRange { param: self, value })
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter update that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// The value is negative (or zero where zero is not allowed).
    #[error("{} must be {}.", .param.title(), .param.constraint())]
    OutOfRange {
        /// The parameter that was being set.
        param: Param,
        /// The rejected value.
        value: f64,
    },

    /// The value is NaN or infinite.
    #[error("{} must be a finite number.", .param.title())]
    NotFinite {
        /// The parameter that was being set.
        param: Param,
    },
}

/// Current sensor model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorParams {
    amplitude: f64,
    frequency: f64,
    noise_std: f64,
}

impl SensorParams {
    /// Create a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] found, checking amplitude, then
    /// frequency, then noise.
    pub fn new(amplitude: f64, frequency: f64, noise_std: f64) -> Result<Self, ParamError> {
        Ok(Self {
            amplitude: Param::Amplitude.check(amplitude)?,
            frequency: Param::Frequency.check(frequency)?,
            noise_std: Param::NoiseStd.check(noise_std)?,
        })
    }

    /// Sine amplitude.
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Sine frequency in Hz.
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Noise standard deviation.
    pub const fn noise_std(&self) -> f64 {
        self.noise_std
    }

    /// Validate and store a new value. Returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] and leaves the stored value unchanged if the
    /// value fails validation.
    pub fn set(&mut self, param: Param, value: f64) -> Result<f64, ParamError> {
        let value = param.check(value)?;
        let slot = match param {
            Param::Amplitude => &mut self.amplitude,
            Param::Frequency => &mut self.frequency,
            Param::NoiseStd => &mut self.noise_std,
        };
        Ok(std::mem::replace(slot, value))
    }
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 0.5,
            noise_std: 0.1,
        }
    }
}
