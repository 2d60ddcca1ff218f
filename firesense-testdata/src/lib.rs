// FireSense Testdata - Synthetic wildfire fields
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # FireSense Testdata
//!
//! Synthetic wildfire field generator for the FireSense ecosystem.
//!
//! A field is a regular grid of cells, each carrying temperature, wind
//! speed, relative humidity, a hotspot flag and a fire-weather index per
//! timestep. Fields implement [`firesense::Environment`], so sensors can
//! be stepped against them directly.
//!
//! ## Quick Start
//!
//! ```rust
//! use firesense::{Environment, Location};
//! use firesense_testdata::{generate_field, FireScenario, GeneratorConfig, GridSpec};
//!
//! let grid = GridSpec::new(Location::new(0.0, 0.0), 250.0, 8, 8);
//! let config = GeneratorConfig::new()
//!     .with_duration_hours(48.0)
//!     .with_seed(42);
//!
//! let field = generate_field(&grid, &FireScenario::grassland(&grid), &config).unwrap();
//!
//! let t0 = field.timestamps()[0];
//! let reading = field.lookup(Location::new(300.0, 300.0), t0).unwrap();
//! assert!(reading.temperature.is_some());
//! ```
//!
//! ## Scenarios
//!
//! - `calm`: ordinary weather, no fire
//! - `grassland`: slow grass fire lit at the grid centre
//! - `wind_driven`: fast elongated run from the upwind corner
//!
//! ## On-disk format
//!
//! [`FireField::save`] writes a directory holding `field.csv` and
//! `manifest.json`; [`FireField::load`] reads it back.

pub mod error;
pub mod field;
pub mod generator;
pub mod grid;
pub mod manifest;
pub mod scenario;

// Re-exports for convenience
pub use error::{FieldError, Result};
pub use field::{FieldRow, FireField, FIELD_FILE, MANIFEST_FILE};
pub use generator::{fire_weather_index, generate_field, GeneratorConfig};
pub use grid::GridSpec;
pub use manifest::FieldManifest;
pub use scenario::FireScenario;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
