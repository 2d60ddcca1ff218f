// FireSense Testdata - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for field generation and I/O.

use thiserror::Error;

/// Field error types.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed field at record {record}: {message}")]
    Malformed { record: usize, message: String },

    #[error("Invalid generator setting {name}: {message}")]
    InvalidConfig { name: &'static str, message: String },

    #[error("Empty field")]
    Empty,
}

/// Result type for field operations.
pub type Result<T> = std::result::Result<T, FieldError>;
