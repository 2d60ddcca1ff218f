//! Path-loss energy model
//!
//! Converts a transmitted payload into an energy cost. The transmit power
//! is scaled by a stochastic log-distance path loss:
//!
//! ```text
//! PL(d) = 10 * n * log10(d / d0) + X_sigma        (dB, clamped to [30, 120])
//! P_tx  = P_base * min(10^(PL / 10), 1e9)         (W)
//! t     = 8 * bytes / bitrate                      (s)
//! E     = P_tx * t * 1000                          (mJ)
//! ```
//!
//! `X_sigma` is zero-mean Gaussian shadowing, drawn fresh on every call.

use crate::config::PathLossConfig;
use crate::error::EnergyError;
use crate::observation::Location;
use crate::random::Randomness;

/// Cost of one transmission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionCost {
    /// Time on air (s)
    pub duration_sec: f64,
    /// Energy spent (mJ)
    pub energy_mj: f64,
    /// Path loss drawn for this transmission (dB, after clamping)
    pub path_loss_db: f64,
    /// Linear power multiplier (after capping)
    pub multiplier: f64,
}

/// Stochastic log-distance path-loss model
#[derive(Debug, Clone, Default)]
pub struct PathLossModel {
    config: PathLossConfig,
}

impl PathLossModel {
    /// Create a model with the given parameters
    pub fn new(config: PathLossConfig) -> Self {
        Self { config }
    }

    /// Model parameters
    pub fn config(&self) -> &PathLossConfig {
        &self.config
    }

    /// Draw a path loss (dB) for a sensor-to-base distance
    pub fn path_loss_db(
        &self,
        distance: f64,
        rng: &mut dyn Randomness,
    ) -> Result<f64, EnergyError> {
        if distance.is_nan() || distance < 0.0 {
            return Err(EnergyError::InvalidDistance(distance));
        }

        let d = distance.max(self.config.min_distance);
        let shadow = rng.gaussian(self.config.shadowing_std_db);
        let loss = 10.0 * self.config.exponent * (d / self.config.reference_distance).log10() + shadow;

        Ok(loss.clamp(self.config.min_loss_db, self.config.max_loss_db))
    }

    /// Linear multiplier for a path loss in dB
    pub fn multiplier(&self, path_loss_db: f64) -> f64 {
        10f64.powf(path_loss_db / 10.0).min(self.config.max_multiplier)
    }

    /// Cost a payload sent from `sensor` to `base`
    pub fn cost(
        &self,
        payload_size_bytes: usize,
        sensor: Location,
        base: Location,
        bitrate_bps: f64,
        base_power_watts: f64,
        rng: &mut dyn Randomness,
    ) -> Result<TransmissionCost, EnergyError> {
        if !bitrate_bps.is_finite() || bitrate_bps <= 0.0 {
            return Err(EnergyError::InvalidBitrate(bitrate_bps));
        }
        if !base_power_watts.is_finite() || base_power_watts < 0.0 {
            return Err(EnergyError::InvalidPower(base_power_watts));
        }

        let path_loss_db = self.path_loss_db(sensor.distance_to(&base), rng)?;
        let multiplier = self.multiplier(path_loss_db);
        let adjusted_power = base_power_watts * multiplier;

        let duration_sec = (payload_size_bytes as f64 * 8.0) / bitrate_bps;
        let energy_mj = adjusted_power * duration_sec * 1000.0;

        Ok(TransmissionCost {
            duration_sec,
            energy_mj,
            path_loss_db,
            multiplier,
        })
    }
}
