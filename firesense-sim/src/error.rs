// FireSense Sim - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Simulation errors.

use firesense::ConfigError;
use firesense_testdata::FieldError;

/// Simulation errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Invalid deployment at row {row}: {message}")]
    Deployment { row: usize, message: String },

    #[error("Deployment has no usable sensor")]
    NoSensors,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Empty window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
