//! Entropy-driven sampling controller
//!
//! The controller keeps a sliding window of mean absolute prediction
//! errors and maps the Shannon entropy of that window onto the sensor's
//! sampling probability:
//!
//! ```text
//! p_i  = e_i / sum(e)
//! H    = -sum(p_i * log2(p_i + 1e-9))
//! rate = 0.2 + 0.8 * H / log2(max_error_history)
//! ```
//!
//! A diverse, unpredictable error history pushes the rate toward 1.0; a
//! stable one lets it settle toward 0.2. A coarser multiplicative policy
//! runs first on every cycle; the entropy update then overwrites it
//! whenever the window holds a non-zero error. Both policies keep the rate
//! inside [0.2, 1.0].

use crate::config::{validate_history_length, validate_probability, CoarsePolicyConfig};
use crate::error::ConfigError;
use crate::observation::{Observation, PredictionError};
use std::collections::VecDeque;

/// Lower bound of the entropy-driven sampling rate
pub const MIN_SAMPLING_RATE: f64 = 0.2;

/// Span of the entropy-driven sampling rate above its lower bound
pub const SAMPLING_RATE_SPAN: f64 = 0.8;

/// Additive epsilon inside the logarithm
pub const ENTROPY_EPSILON: f64 = 1e-9;

/// Bounded FIFO window of scalar prediction errors
#[derive(Debug, Clone)]
pub struct ErrorHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl ErrorHistory {
    /// Create an empty window holding at most `capacity` values
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        validate_history_length(capacity)?;
        Ok(Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append at the tail, evicting the oldest value when full
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Maximum number of values
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no value has been recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Shannon entropy (bits) of the normalized window.
    ///
    /// `None` when the window is empty or sums to zero.
    pub fn entropy(&self) -> Option<f64> {
        let sum: f64 = self.values.iter().sum();
        if self.values.is_empty() || sum <= 0.0 || !sum.is_finite() {
            return None;
        }

        let entropy = -self
            .values
            .iter()
            .map(|e| {
                let p = e / sum;
                p * (p + ENTROPY_EPSILON).log2()
            })
            .sum::<f64>();
        Some(entropy)
    }

    /// Entropy divided by `log2(capacity)`, clamped to [0, 1].
    ///
    /// A single-slot window has zero maximum entropy and always yields 0.
    pub fn normalized_entropy(&self) -> Option<f64> {
        let entropy = self.entropy()?;
        let max_entropy = (self.capacity as f64).log2();
        if max_entropy <= 0.0 {
            return Some(0.0);
        }
        Some((entropy / max_entropy).clamp(0.0, 1.0))
    }
}

/// Per-sensor sampling configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Probability of sensing on a given timestep
    pub sampling_rate: f64,
    /// Sensing resolution (reserved, unused by the current policies)
    pub resolution: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1.0,
            resolution: 1.0,
        }
    }
}

/// Adapts one sensor's sampling rate from its recent prediction errors
#[derive(Debug, Clone)]
pub struct SamplingController {
    history: ErrorHistory,
    config: SamplingConfig,
    coarse: CoarsePolicyConfig,
}

impl SamplingController {
    /// Create a controller with default coarse policy and full sampling
    pub fn new(max_error_history: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            history: ErrorHistory::new(max_error_history)?,
            config: SamplingConfig::default(),
            coarse: CoarsePolicyConfig::default(),
        })
    }

    /// Set the initial sampling rate
    pub fn with_sampling_rate(mut self, rate: f64) -> Result<Self, ConfigError> {
        validate_probability("sampling_rate", rate)?;
        self.config.sampling_rate = rate;
        Ok(self)
    }

    /// Replace the coarse policy parameters
    pub fn with_coarse_policy(mut self, coarse: CoarsePolicyConfig) -> Result<Self, ConfigError> {
        coarse.validate()?;
        self.coarse = coarse;
        Ok(self)
    }

    /// Current sampling probability
    pub fn sampling_rate(&self) -> f64 {
        self.config.sampling_rate
    }

    /// Sampling configuration
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Recorded error window
    pub fn history(&self) -> &ErrorHistory {
        &self.history
    }

    /// Record the mean absolute error between observation and prediction.
    ///
    /// Returns the recorded value, or `None` when either state is missing
    /// or they share no compared variable (nothing is recorded then).
    pub fn record_error(
        &mut self,
        observed: Option<&Observation>,
        predicted: Option<&Observation>,
    ) -> Option<f64> {
        let error = PredictionError::between(observed?, predicted?)?;
        self.record(&error)
    }

    /// Record an already computed error; `None` if it holds no variable.
    pub fn record(&mut self, error: &PredictionError) -> Option<f64> {
        if error.is_empty() {
            return None;
        }
        let mean = error.mean_absolute();
        self.history.push(mean);
        Some(mean)
    }

    /// Coarse policy: grow the rate on a large error, decay it otherwise.
    ///
    /// The result never drops below [`MIN_SAMPLING_RATE`].
    pub fn apply_coarse_policy(&mut self, error: &PredictionError) {
        if error.is_empty() {
            return;
        }

        let factor = if error.mean_absolute() > self.coarse.error_threshold {
            self.coarse.increase_factor
        } else {
            self.coarse.decay_factor
        };
        self.config.sampling_rate =
            (self.config.sampling_rate * factor).clamp(MIN_SAMPLING_RATE, 1.0);
    }

    /// Recompute the rate from the entropy of the error window.
    ///
    /// Leaves the rate unchanged and returns `None` if the window is empty
    /// or sums to zero.
    pub fn update_sampling_rate(&mut self) -> Option<f64> {
        let normalized = self.history.normalized_entropy()?;
        let rate = MIN_SAMPLING_RATE + SAMPLING_RATE_SPAN * normalized;
        self.config.sampling_rate = rate;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{EnvironmentalReading, Location};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn obs(temperature: f64) -> Observation {
        Observation::new(
            1,
            Location::new(0.0, 0.0),
            EnvironmentalReading::empty(Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap())
                .with_temperature(temperature),
        )
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = ErrorHistory::new(3).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(v);
            assert!(history.len() <= 3);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_history_rejects_zero_capacity() {
        assert!(matches!(
            ErrorHistory::new(0),
            Err(ConfigError::InvalidHistoryLength(0))
        ));
    }

    #[test]
    fn test_single_slot_history_gives_min_rate() {
        let mut controller = SamplingController::new(1).unwrap();
        controller.history.push(3.7);

        assert_eq!(controller.update_sampling_rate(), Some(0.2));
        assert_eq!(controller.sampling_rate(), 0.2);
    }

    #[test]
    fn test_uniform_full_history_gives_max_rate() {
        let mut controller = SamplingController::new(4).unwrap();
        for _ in 0..4 {
            controller.history.push(2.0);
        }
        let rate = controller.update_sampling_rate().unwrap();
        assert_relative_eq!(rate, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_dominated_history_stays_low() {
        let mut controller = SamplingController::new(10).unwrap();
        controller.history.push(100.0);
        for _ in 0..9 {
            controller.history.push(0.001);
        }
        let rate = controller.update_sampling_rate().unwrap();
        assert!(rate < 0.3, "rate {} should be near the floor", rate);
    }

    #[test]
    fn test_empty_or_zero_history_leaves_rate() {
        let mut controller = SamplingController::new(5)
            .unwrap()
            .with_sampling_rate(0.7)
            .unwrap();
        assert_eq!(controller.update_sampling_rate(), None);

        controller.history.push(0.0);
        controller.history.push(0.0);
        assert_eq!(controller.update_sampling_rate(), None);
        assert_eq!(controller.sampling_rate(), 0.7);
    }

    #[test]
    fn test_rate_bounds_over_random_histories() {
        let mut controller = SamplingController::new(8).unwrap();
        let mut x = 0.37_f64;
        for _ in 0..200 {
            x = (x * 7.13 + 0.11).fract();
            controller.history.push(x * 10.0);
            if let Some(rate) = controller.update_sampling_rate() {
                assert!((0.2..=1.0).contains(&rate));
            }
        }
    }

    #[test]
    fn test_record_error_requires_both_states() {
        let mut controller = SamplingController::new(5).unwrap();
        let a = obs(20.0);

        assert_eq!(controller.record_error(Some(&a), None), None);
        assert_eq!(controller.record_error(None, Some(&a)), None);
        assert!(controller.history().is_empty());

        let b = obs(23.0);
        assert_eq!(controller.record_error(Some(&b), Some(&a)), Some(3.0));
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn test_coarse_policy_grows_and_decays() {
        let mut controller = SamplingController::new(5)
            .unwrap()
            .with_sampling_rate(0.5)
            .unwrap();

        let big = PredictionError::between(&obs(30.0), &obs(20.0)).unwrap();
        controller.apply_coarse_policy(&big);
        assert_relative_eq!(controller.sampling_rate(), 0.6, epsilon = 1e-12);

        let small = PredictionError::between(&obs(21.0), &obs(20.0)).unwrap();
        controller.apply_coarse_policy(&small);
        assert_relative_eq!(controller.sampling_rate(), 0.54, epsilon = 1e-12);
    }

    #[test]
    fn test_coarse_policy_never_exceeds_one() {
        let mut controller = SamplingController::new(5).unwrap();
        let big = PredictionError::between(&obs(30.0), &obs(20.0)).unwrap();
        controller.apply_coarse_policy(&big);
        assert_eq!(controller.sampling_rate(), 1.0);
    }

    #[test]
    fn test_coarse_decay_stops_at_floor() {
        let mut controller = SamplingController::new(5).unwrap();
        let none = PredictionError::between(&obs(20.0), &obs(20.0)).unwrap();
        for _ in 0..60 {
            controller.record(&none);
            controller.apply_coarse_policy(&none);
            assert_eq!(controller.update_sampling_rate(), None);
        }
        assert_relative_eq!(controller.sampling_rate(), MIN_SAMPLING_RATE, epsilon = 1e-12);
    }

    #[test]
    fn test_record_matches_record_error() {
        let mut a = SamplingController::new(5).unwrap();
        let mut b = SamplingController::new(5).unwrap();
        let (observed, predicted) = (obs(27.5), obs(20.0));

        let error = PredictionError::between(&observed, &predicted).unwrap();
        assert_eq!(a.record(&error), b.record_error(Some(&observed), Some(&predicted)));
        assert_eq!(a.history().iter().collect::<Vec<_>>(), vec![7.5]);
    }

    #[test]
    fn test_entropy_overwrites_coarse() {
        let mut controller = SamplingController::new(1).unwrap();
        let predicted = obs(20.0);
        let observed = obs(30.0);

        let error = PredictionError::between(&observed, &predicted).unwrap();
        controller.record_error(Some(&observed), Some(&predicted));
        controller.apply_coarse_policy(&error);
        controller.update_sampling_rate();

        assert_eq!(controller.sampling_rate(), 0.2);
    }
}
