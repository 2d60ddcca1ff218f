//! Metrics collection for sensing runs
//!
//! Counters for sampling, observation and transmission activity, per
//! sensor or aggregated over a sensor population.

use crate::sensor::StepOutcome;

/// Sensing and transmission statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorMetrics {
    /// Cycles run
    pub cycles: u64,
    /// Cycles skipped by the sampling decision
    pub skipped: u64,
    /// Observations taken
    pub observations: u64,
    /// Observations that were transmitted
    pub transmissions: u64,
    /// Payload bytes sent
    pub bytes_sent: u64,
    /// Energy spent transmitting (mJ)
    pub energy_mj: f64,
    /// Sum of sampling rates reported with transmissions
    sampling_rate_sum: f64,
    /// Number of transmissions that reported a sampling rate
    sampling_rate_count: u64,
}

impl SensorMetrics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one cycle
    pub fn record(&mut self, outcome: &StepOutcome) {
        self.cycles += 1;
        if outcome.skipped {
            self.skipped += 1;
        }
        if outcome.observation.is_some() {
            self.observations += 1;
        }
        if let Some(ref tx) = outcome.transmission {
            self.transmissions += 1;
            self.bytes_sent += tx.data_sent_bytes as u64;
            self.energy_mj += tx.energy_used_mj;
            if let Some(rate) = tx.sampling_rate {
                self.sampling_rate_sum += rate;
                self.sampling_rate_count += 1;
            }
        }
    }

    /// Fold another collector into this one
    pub fn merge(&mut self, other: &SensorMetrics) {
        self.cycles += other.cycles;
        self.skipped += other.skipped;
        self.observations += other.observations;
        self.transmissions += other.transmissions;
        self.bytes_sent += other.bytes_sent;
        self.energy_mj += other.energy_mj;
        self.sampling_rate_sum += other.sampling_rate_sum;
        self.sampling_rate_count += other.sampling_rate_count;
    }

    /// Energy spent in joules
    pub fn energy_joules(&self) -> f64 {
        self.energy_mj / 1000.0
    }

    /// Mean sampling rate over transmissions that reported one
    pub fn mean_sampling_rate(&self) -> Option<f64> {
        if self.sampling_rate_count == 0 {
            return None;
        }
        Some(self.sampling_rate_sum / self.sampling_rate_count as f64)
    }

    /// Fraction of cycles that were sensed (0.0 - 1.0)
    pub fn realized_sampling_fraction(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        (self.cycles - self.skipped) as f64 / self.cycles as f64
    }

    /// Fraction of observations that were transmitted (0.0 - 1.0)
    pub fn transmission_ratio(&self) -> f64 {
        if self.observations == 0 {
            return 0.0;
        }
        self.transmissions as f64 / self.observations as f64
    }

    /// Mean energy per transmission (mJ)
    pub fn energy_per_transmission(&self) -> f64 {
        if self.transmissions == 0 {
            return 0.0;
        }
        self.energy_mj / self.transmissions as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{EnvironmentalReading, Location, Observation};
    use crate::sensor::{SensorKind, TransmissionRecord};
    use chrono::{TimeZone, Utc};

    fn transmitted(rate: Option<f64>, energy: f64) -> StepOutcome {
        let when = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap();
        StepOutcome {
            skipped: false,
            observation: Some(Observation::new(
                1,
                Location::new(0.0, 0.0),
                EnvironmentalReading::empty(when),
            )),
            prediction_error: None,
            transmission: Some(TransmissionRecord {
                sensor_id: 1,
                sensor_type: SensorKind::Adaptive,
                timestamp: when,
                data_sent_bytes: 100,
                tx_time_sec: 0.1,
                energy_used_mj: energy,
                x: 0.0,
                y: 0.0,
                sampling_rate: rate,
                temperature: None,
                wind_speed: None,
                relative_humidity: None,
                hotspot: None,
                fwi: None,
            }),
        }
    }

    #[test]
    fn test_counts() {
        let mut metrics = SensorMetrics::new();
        metrics.record(&transmitted(Some(0.4), 500.0));
        metrics.record(&transmitted(Some(0.8), 1500.0));
        metrics.record(&StepOutcome {
            skipped: true,
            ..Default::default()
        });

        assert_eq!(metrics.cycles, 3);
        assert_eq!(metrics.skipped, 1);
        assert_eq!(metrics.transmissions, 2);
        assert_eq!(metrics.bytes_sent, 200);
        assert!((metrics.energy_joules() - 2.0).abs() < 1e-12);
        assert!((metrics.mean_sampling_rate().unwrap() - 0.6).abs() < 1e-12);
        assert!((metrics.realized_sampling_fraction() - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.energy_per_transmission() - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SensorMetrics::new();
        assert_eq!(metrics.mean_sampling_rate(), None);
        assert_eq!(metrics.realized_sampling_fraction(), 0.0);
        assert_eq!(metrics.transmission_ratio(), 0.0);
        assert_eq!(metrics.energy_per_transmission(), 0.0);
    }

    #[test]
    fn test_merge() {
        let mut a = SensorMetrics::new();
        a.record(&transmitted(None, 10.0));
        let mut b = SensorMetrics::new();
        b.record(&transmitted(Some(1.0), 30.0));

        a.merge(&b);
        assert_eq!(a.transmissions, 2);
        assert_eq!(a.mean_sampling_rate(), Some(1.0));
        assert!((a.energy_per_transmission() - 20.0).abs() < 1e-12);

        let mut empty = SensorMetrics::new();
        empty.merge(&SensorMetrics::default());
        assert_eq!(empty, SensorMetrics::default());
    }
}
