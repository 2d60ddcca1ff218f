//! Divergence-based transmission gate
//!
//! Each compared variable is modelled as a unit-variance Gaussian centred
//! on its value. The gate averages the closed-form KL divergence between
//! the predicted and observed Gaussians and transmits when the average
//! exceeds the run's threshold.

use crate::config::validate_threshold;
use crate::error::ConfigError;
use crate::observation::Observation;

/// KL(P || Q) for univariate Gaussians with a shared standard deviation.
///
/// With equal variances the log and trace terms cancel, leaving
/// `(mu_p - mu_q)^2 / (2 * sigma^2)`.
pub fn kl_divergence_gaussian(mu_p: f64, mu_q: f64, sigma: f64) -> f64 {
    (0.5 / (sigma * sigma)) * (mu_p - mu_q).powi(2)
}

/// Transmission gate with an injected threshold
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceGate {
    threshold: f64,
    sigma: f64,
}

impl DivergenceGate {
    /// Fixed standard deviation assumed for every variable
    pub const SIGMA: f64 = 1.0;

    /// Create a gate; the threshold must be a non-negative number
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            sigma: Self::SIGMA,
        })
    }

    /// Configured threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Mean KL divergence over variables present in both states.
    ///
    /// `None` if there is no prediction or no shared variable.
    pub fn average_divergence(
        &self,
        predicted: Option<&Observation>,
        observed: &Observation,
    ) -> Option<f64> {
        let predicted = predicted?;

        let (total, count) = observed
            .shared_variables(predicted)
            .map(|(_, obs, pred)| kl_divergence_gaussian(pred, obs, self.sigma))
            .fold((0.0, 0usize), |(sum, n), kl| (sum + kl, n + 1));

        if count == 0 {
            return None;
        }
        Some(total / count as f64)
    }

    /// Decide whether the observation warrants a transmission
    pub fn should_transmit(&self, predicted: Option<&Observation>, observed: &Observation) -> bool {
        match self.average_divergence(predicted, observed) {
            Some(avg) => {
                log::trace!(
                    "sensor {}: avg KL {:.3} vs threshold {:.3}",
                    observed.sensor_id,
                    avg,
                    self.threshold
                );
                avg > self.threshold
            }
            None => false,
        }
    }
}
