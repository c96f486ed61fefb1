//! The experiment controller: run scheduling, trace persistence and
//! per-morphology report files (spec.md §4.6, §6).

#![warn(clippy::all)]

pub mod controller;
pub mod error;
pub mod persistence;
pub mod report;

pub use controller::{ExperimentController, PopulationSeed};
pub use error::{ExperimentError, Result};
