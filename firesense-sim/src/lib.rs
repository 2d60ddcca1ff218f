// FireSense Sim - Simulation driver
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # FireSense Sim
//!
//! Runs deployed FireSense sensors over a fire field and records what
//! they observed and transmitted.
//!
//! - [`deployment`]: deployment CSV loading and random placement
//! - [`driver`]: the timestep loop and its logs
//! - [`logs`]: experiment and transmission CSV rows
//! - [`sweep`]: KL threshold x error history parameter sweeps

pub mod deployment;
pub mod driver;
pub mod error;
pub mod logs;
pub mod sweep;

pub use deployment::{Deployment, DeploymentRow, PlacedSensor};
pub use driver::{parse_timestamp, RunLog, RunSummary, Simulation, TimeWindow};
pub use error::{Result, SimError};
pub use logs::{ExperimentRow, TransmissionRow};
pub use sweep::{run_sweep, SweepConfig, SweepRow};
