//! # FireSense - Adaptive sensing for wildfire sensor fields
//!
//! A per-sensor control engine deciding, every timestep, whether to sense
//! and whether to transmit, trading radio energy against information loss.
//!
//! ## Key Features
//!
//! - **Persistence prediction**: the last accepted observation predicts the next
//! - **Entropy-driven sampling**: diverse recent errors raise the sampling rate
//! - **Divergence gating**: transmit only when the Gaussian KL divergence is large
//! - **Stochastic energy model**: log-distance path loss with Gaussian shadowing
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use firesense::{
//!     AdaptiveSensor, Environment, EnvironmentalReading, Location, RunConfig,
//!     SeededRandomness, Sensor,
//! };
//!
//! // A trivial environment: the same weather everywhere
//! struct Calm;
//! impl Environment for Calm {
//!     fn lookup(
//!         &self,
//!         _location: Location,
//!         timestamp: chrono::DateTime<Utc>,
//!     ) -> Option<EnvironmentalReading> {
//!         Some(EnvironmentalReading::empty(timestamp).with_temperature(18.0))
//!     }
//! }
//!
//! let config = RunConfig::default().with_kl_threshold(0.5);
//! let mut sensor = AdaptiveSensor::new(
//!     0,
//!     Location::new(120.0, 80.0),
//!     Location::new(0.0, 0.0),
//!     &config,
//! )
//! .unwrap();
//! let mut rng = SeededRandomness::from_seed(42);
//!
//! let t0 = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap();
//! let outcome = sensor.step(&Calm, t0, &mut rng);
//!
//! // Nothing to compare against yet, so nothing is transmitted
//! assert!(outcome.transmission.is_none());
//! ```
//!
//! ## Modules
//!
//! - [`observation`]: Observations, locations and prediction errors
//! - [`prediction`]: Persistence prediction model
//! - [`gate`]: Divergence-based transmission gate
//! - [`controller`]: Error history and entropy-driven sampling control
//! - [`energy`]: Path-loss energy model
//! - [`sensor`]: Adaptive and baseline sensors, the environment seam
//! - [`config`]: Run-scoped configuration
//! - [`random`]: Seeded and scripted randomness
//! - [`metrics`]: Sensing and transmission statistics

// Modules
pub mod config;
pub mod controller;
pub mod energy;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod observation;
pub mod prediction;
pub mod random;
pub mod sensor;

// Re-exports for convenient access
pub use config::{CoarsePolicyConfig, PathLossConfig, RunConfig};
pub use controller::{ErrorHistory, SamplingConfig, SamplingController};
pub use energy::{PathLossModel, TransmissionCost};
pub use error::{ConfigError, EnergyError, FiresenseError, Result};
pub use gate::{kl_divergence_gaussian, DivergenceGate};
pub use metrics::SensorMetrics;
pub use observation::{
    EnvironmentalReading, Location, Observation, PredictionError, SensorId, Variable,
};
pub use prediction::PredictionModel;
pub use random::{Randomness, ScriptedRandomness, SeededRandomness};
pub use sensor::{
    AdaptiveSensor, BaselineSensor, Environment, Sensor, SensorKind, StepOutcome,
    TransmissionRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
