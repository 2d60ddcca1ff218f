//! Run-scoped configuration.
//!
//! Every tunable the engine depends on lives in [`RunConfig`], which is
//! passed explicitly into gates, controllers and sensors so that a
//! parameter sweep can instantiate many independent runs side by side.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default divergence threshold (average KL, nats)
pub const DEFAULT_KL_THRESHOLD: f64 = 1.0;

/// Default length of the prediction-error sliding window
pub const DEFAULT_MAX_ERROR_HISTORY: usize = 20;

/// Default radio bitrate in bits per second
pub const DEFAULT_BITRATE_BPS: f64 = 5470.0;

/// Default transmit power before path loss, in watts
pub const DEFAULT_BASE_POWER_WATTS: f64 = 0.1;

/// Master configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Average KL divergence above which a sensor transmits.
    pub kl_threshold: f64,

    /// Maximum number of prediction errors kept for the entropy estimate.
    pub max_error_history: usize,

    /// Radio bitrate (bps).
    pub bitrate_bps: f64,

    /// Transmit power before path loss (W).
    pub base_power_watts: f64,

    /// Sampling probability of a freshly deployed adaptive sensor.
    pub initial_sampling_rate: f64,

    /// Path-loss energy model parameters.
    pub path_loss: PathLossConfig,

    /// Coarse multiplicative sampling policy.
    pub coarse: CoarsePolicyConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kl_threshold: DEFAULT_KL_THRESHOLD,
            max_error_history: DEFAULT_MAX_ERROR_HISTORY,
            bitrate_bps: DEFAULT_BITRATE_BPS,
            base_power_watts: DEFAULT_BASE_POWER_WATTS,
            initial_sampling_rate: 1.0,
            path_loss: PathLossConfig::default(),
            coarse: CoarsePolicyConfig::default(),
        }
    }
}

impl RunConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the divergence threshold
    pub fn with_kl_threshold(mut self, threshold: f64) -> Self {
        self.kl_threshold = threshold;
        self
    }

    /// Set the error history length
    pub fn with_max_error_history(mut self, len: usize) -> Self {
        self.max_error_history = len;
        self
    }

    /// Set the radio bitrate
    pub fn with_bitrate_bps(mut self, bitrate_bps: f64) -> Self {
        self.bitrate_bps = bitrate_bps;
        self
    }

    /// Set the base transmit power
    pub fn with_base_power_watts(mut self, watts: f64) -> Self {
        self.base_power_watts = watts;
        self
    }

    /// Set the initial sampling probability
    pub fn with_initial_sampling_rate(mut self, rate: f64) -> Self {
        self.initial_sampling_rate = rate;
        self
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every tunable, rejecting rather than clamping bad values
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threshold(self.kl_threshold)?;
        validate_history_length(self.max_error_history)?;
        validate_bitrate(self.bitrate_bps)?;
        validate_power(self.base_power_watts)?;
        validate_probability("initial_sampling_rate", self.initial_sampling_rate)?;
        self.path_loss.validate()?;
        self.coarse.validate()?;
        Ok(())
    }
}

/// Log-distance path-loss model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLossConfig {
    /// Path-loss exponent `n`.
    pub exponent: f64,
    /// Reference distance `d0` (m).
    pub reference_distance: f64,
    /// Standard deviation of log-normal shadowing (dB).
    pub shadowing_std_db: f64,
    /// Lower clamp of the path loss (dB).
    pub min_loss_db: f64,
    /// Upper clamp of the path loss (dB).
    pub max_loss_db: f64,
    /// Cap on the linear power multiplier.
    pub max_multiplier: f64,
    /// Distance floor to avoid log(0) (m).
    pub min_distance: f64,
}

impl Default for PathLossConfig {
    fn default() -> Self {
        Self {
            exponent: 2.0,
            reference_distance: 1.0,
            shadowing_std_db: 4.0,
            min_loss_db: 30.0,
            max_loss_db: 120.0,
            max_multiplier: 1e9,
            min_distance: 1e-3,
        }
    }
}

impl PathLossConfig {
    /// Validate model parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("path_loss.exponent", self.exponent)?;
        positive("path_loss.reference_distance", self.reference_distance)?;
        non_negative("path_loss.shadowing_std_db", self.shadowing_std_db)?;
        positive("path_loss.max_multiplier", self.max_multiplier)?;
        positive("path_loss.min_distance", self.min_distance)?;
        non_negative("path_loss.min_loss_db", self.min_loss_db)?;
        if self.max_loss_db.is_nan() || self.max_loss_db < self.min_loss_db {
            return Err(ConfigError::InvalidParameter {
                name: "path_loss.max_loss_db",
                value: self.max_loss_db,
            });
        }
        Ok(())
    }
}

/// Coarse sampling policy: grow on large error, decay otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoarsePolicyConfig {
    /// Mean absolute error (native units) above which the rate grows.
    pub error_threshold: f64,
    /// Multiplier applied on large error.
    pub increase_factor: f64,
    /// Multiplier applied otherwise.
    pub decay_factor: f64,
}

impl Default for CoarsePolicyConfig {
    fn default() -> Self {
        Self {
            error_threshold: 2.0,
            increase_factor: 1.2,
            decay_factor: 0.9,
        }
    }
}

impl CoarsePolicyConfig {
    /// Validate policy parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("coarse.error_threshold", self.error_threshold)?;
        positive("coarse.increase_factor", self.increase_factor)?;
        positive("coarse.decay_factor", self.decay_factor)?;
        Ok(())
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(ConfigError::InvalidThreshold(threshold));
    }
    Ok(())
}

pub(crate) fn validate_history_length(len: usize) -> Result<(), ConfigError> {
    if len == 0 {
        return Err(ConfigError::InvalidHistoryLength(len));
    }
    Ok(())
}

pub(crate) fn validate_bitrate(bitrate_bps: f64) -> Result<(), ConfigError> {
    if !bitrate_bps.is_finite() || bitrate_bps <= 0.0 {
        return Err(ConfigError::InvalidBitrate(bitrate_bps));
    }
    Ok(())
}

pub(crate) fn validate_power(watts: f64) -> Result<(), ConfigError> {
    if !watts.is_finite() || watts < 0.0 {
        return Err(ConfigError::InvalidPower(watts));
    }
    Ok(())
}

pub(crate) fn validate_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(())
}
