//! Persistence prediction model
//!
//! The predicted state for the next timestep is exactly the last accepted
//! observation. No averaging or history is kept beyond that one value.

use crate::observation::Observation;

/// Sensor belief about the current environmental state
#[derive(Debug, Clone, Default)]
pub struct PredictionModel {
    last_accepted: Option<Observation>,
    accepted_count: u64,
}

impl PredictionModel {
    /// Create an empty model (no prediction until the first accept)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current prediction, `None` before any observation was accepted
    pub fn predict(&self) -> Option<&Observation> {
        self.last_accepted.as_ref()
    }

    /// Replace the stored state unconditionally
    pub fn accept(&mut self, observation: Observation) {
        self.accepted_count += 1;
        self.last_accepted = Some(observation);
    }

    /// Number of observations accepted so far
    pub fn accepted_count(&self) -> u64 {
        self.accepted_count
    }

    /// True once a prediction is available
    pub fn has_prediction(&self) -> bool {
        self.last_accepted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{EnvironmentalReading, Location, Variable};
    use chrono::{TimeZone, Utc};

    fn obs(hour: u32, temperature: f64) -> Observation {
        Observation::new(
            1,
            Location::new(0.0, 0.0),
            EnvironmentalReading::empty(Utc.with_ymd_and_hms(2016, 5, 1, hour, 0, 0).unwrap())
                .with_temperature(temperature),
        )
    }

    #[test]
    fn test_no_prediction_before_accept() {
        let model = PredictionModel::new();
        assert!(model.predict().is_none());
        assert!(!model.has_prediction());
    }

    #[test]
    fn test_predict_is_idempotent() {
        let mut model = PredictionModel::new();
        model.accept(obs(0, 21.0));

        let first = model.predict().cloned();
        let second = model.predict().cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_accept_overwrites() {
        let mut model = PredictionModel::new();
        model.accept(obs(0, 21.0));
        model.accept(obs(1, 35.0));

        let predicted = model.predict().unwrap();
        assert_eq!(predicted.get(Variable::Temperature), Some(35.0));
        assert_eq!(model.accepted_count(), 2);
    }
}
