//! Sensor model, flight computer, operator commands, and real-time tick loop
//! for the gyroscope HIL simulation.
//!
//! This crate owns the tick loop that drives the simulation: poll operator
//! input, hold while paused, sense, decide, record, and pace against the
//! wall clock.
//!
//! # Modules
//!
//! - [`command`] -- Operator command grammar and [`CommandChannel`].
//! - [`config`] -- Configuration loading from `hil-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- Threshold-based flight computer.
//! - [`input`] -- Non-blocking [`InputSource`] implementations.
//! - [`pacer`] -- Wall-clock pacing.
//! - [`params`] -- Validated [`SensorParams`].
//! - [`report`] -- Log and plot artifacts.
//! - [`runner`] -- The tick loop, [`run_simulation`].
//! - [`sensor`] -- Gyroscope signal model.
//! - [`state`] -- The [`RunState`] machine.
//!
//! [`CommandChannel`]: command::CommandChannel
//! [`InputSource`]: input::InputSource
//! [`SensorParams`]: params::SensorParams
//! [`run_simulation`]: runner::run_simulation
//! [`RunState`]: state::RunState

pub mod command;
pub mod config;
pub mod decision;
pub mod input;
pub mod pacer;
pub mod params;
pub mod report;
pub mod runner;
pub mod sensor;
pub mod state;
