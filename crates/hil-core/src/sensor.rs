//! Gyroscope sensor model.
//!
//! The reading is a sine wave plus zero-mean Gaussian noise:
//!
//! ```text
//! reading(t) = amplitude * sin(2 * pi * frequency * t) + N(0, noise_std)
//! ```
//!
//! The model holds no state. The random source is passed in by the caller so
//! runs can be seeded; exactly one Gaussian draw is taken per reading.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::params::SensorParams;

/// Noise-free component of the reading at simulated time `t`.
pub fn signal(t: f64, params: &SensorParams) -> f64 {
    params.amplitude() * (TAU * params.frequency() * t).sin()
}

/// Produce one gyro reading at simulated time `t`.
pub fn read_gyro(t: f64, params: &SensorParams, rng: &mut impl Rng) -> f64 {
    let noise: f64 = rng.sample(StandardNormal);
    signal(t, params) + noise * params.noise_std()
}
