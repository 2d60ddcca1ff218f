//! Error types for FireSense
//!
//! Only invalid parameters are errors. Missing data (no prediction yet,
//! no observation at a location, no shared variables) is reported through
//! `Option` results and never surfaces here.

use thiserror::Error;

/// Result type alias for FireSense operations
pub type Result<T> = std::result::Result<T, FiresenseError>;

/// Main error type for FireSense operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FiresenseError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Energy model error
    #[error("Energy model error: {0}")]
    Energy(#[from] EnergyError),

    /// Payload serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Invalid run-scoped tunables or sensor parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Divergence threshold is negative or not a number
    #[error("Invalid KL threshold: {0}")]
    InvalidThreshold(f64),

    /// Error history must hold at least one value
    #[error("Invalid error history length: {0} (must be >= 1)")]
    InvalidHistoryLength(usize),

    /// Bitrate must be strictly positive
    #[error("Invalid bitrate: {0} bps")]
    InvalidBitrate(f64),

    /// Transmit power must be non-negative
    #[error("Invalid base power: {0} W")]
    InvalidPower(f64),

    /// Probability outside [0, 1]
    #[error("Invalid probability for {name}: {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A path-loss or policy parameter is out of range
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Coordinates must be finite
    #[error("Invalid location ({x}, {y})")]
    InvalidLocation { x: f64, y: f64 },
}

/// Invalid inputs to the path-loss energy model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnergyError {
    /// Distance is negative or not a number
    #[error("Invalid distance: {0}")]
    InvalidDistance(f64),

    /// Bitrate must be strictly positive
    #[error("Invalid bitrate: {0} bps")]
    InvalidBitrate(f64),

    /// Transmit power must be non-negative
    #[error("Invalid base power: {0} W")]
    InvalidPower(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FiresenseError::Config(ConfigError::InvalidProbability {
            name: "sampling_rate",
            value: 1.5,
        });
        let msg = format!("{}", err);
        assert!(msg.contains("sampling_rate"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_error_conversion() {
        let energy_err = EnergyError::InvalidBitrate(0.0);
        let err: FiresenseError = energy_err.into();
        assert!(matches!(err, FiresenseError::Energy(_)));
    }
}
