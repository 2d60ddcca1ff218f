//! Sensors and the per-timestep sensing cycle
//!
//! An [`AdaptiveSensor`] runs, every timestep and in this order:
//!
//! 1. predict from the last accepted observation
//! 2. roll the sampling decision against its current rate (a skip ends the cycle)
//! 3. sense through the [`Environment`] (no data ends the cycle)
//! 4. compare against the prediction and record the error
//! 5. refresh the sampling rate (coarse policy, then entropy policy)
//! 6. accept the observation as the next prediction
//! 7. gate on divergence and, if warranted, cost the transmission
//!
//! A [`BaselineSensor`] always senses and always transmits.

use crate::config::RunConfig;
use crate::controller::SamplingController;
use crate::energy::PathLossModel;
use crate::error::{ConfigError, Result};
use crate::gate::DivergenceGate;
use crate::observation::{EnvironmentalReading, Location, Observation, PredictionError, SensorId};
use crate::prediction::PredictionModel;
use crate::random::Randomness;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External spatial/temporal lookup of simulated fire-state data
pub trait Environment {
    /// Environmental state at a location and time, if any region covers it
    fn lookup(&self, location: Location, timestamp: DateTime<Utc>)
        -> Option<EnvironmentalReading>;
}

/// Sensor variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Always-on baseline ("typical")
    #[serde(rename = "typical")]
    Baseline,
    /// Entropy-adaptive sensor ("universal")
    #[serde(rename = "universal")]
    Adaptive,
}

impl SensorKind {
    /// Label used in deployment files and logs
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Baseline => "typical",
            SensorKind::Adaptive => "universal",
        }
    }

    /// Parse a deployment label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "typical" => Some(SensorKind::Baseline),
            "universal" => Some(SensorKind::Adaptive),
            _ => None,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A costed transmission, as handed to the transmission log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRecord {
    pub sensor_id: SensorId,
    pub sensor_type: SensorKind,
    pub timestamp: DateTime<Utc>,
    pub data_sent_bytes: usize,
    pub tx_time_sec: f64,
    #[serde(rename = "energy_used_mJ")]
    pub energy_used_mj: f64,
    pub x: f64,
    pub y: f64,
    /// Sampling rate in effect (adaptive sensors only)
    pub sampling_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub hotspot: Option<bool>,
    pub fwi: Option<f64>,
}

/// Result of one sensing cycle
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    /// The sampling decision skipped this timestep
    pub skipped: bool,
    /// Observation taken this timestep
    pub observation: Option<Observation>,
    /// Signed error against the prediction, when both existed
    pub prediction_error: Option<PredictionError>,
    /// Transmission produced this timestep
    pub transmission: Option<TransmissionRecord>,
}

impl StepOutcome {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

/// Common interface of deployed sensors
pub trait Sensor {
    /// Sensor identifier
    fn id(&self) -> SensorId;

    /// Sensor variant
    fn kind(&self) -> SensorKind;

    /// Deployment location
    fn location(&self) -> Location;

    /// Current sampling probability
    fn sampling_rate(&self) -> f64;

    /// Run one timestep
    fn step(
        &mut self,
        env: &dyn Environment,
        timestamp: DateTime<Utc>,
        rng: &mut dyn Randomness,
    ) -> StepOutcome;
}

/// Radio link shared by both sensor variants
#[derive(Debug, Clone)]
struct Radio {
    base: Location,
    model: PathLossModel,
    bitrate_bps: f64,
    base_power_watts: f64,
}

impl Radio {
    fn new(base: Location, config: &RunConfig) -> Self {
        Self {
            base,
            model: PathLossModel::new(config.path_loss.clone()),
            bitrate_bps: config.bitrate_bps,
            base_power_watts: config.base_power_watts,
        }
    }

    fn transmit(
        &self,
        observation: &Observation,
        kind: SensorKind,
        sampling_rate: Option<f64>,
        rng: &mut dyn Randomness,
    ) -> Result<TransmissionRecord> {
        let payload = observation.payload()?;
        let cost = self.model.cost(
            payload.len(),
            observation.location,
            self.base,
            self.bitrate_bps,
            self.base_power_watts,
            rng,
        )?;

        let reading = &observation.reading;
        Ok(TransmissionRecord {
            sensor_id: observation.sensor_id,
            sensor_type: kind,
            timestamp: reading.datetime,
            data_sent_bytes: payload.len(),
            tx_time_sec: cost.duration_sec,
            energy_used_mj: cost.energy_mj,
            x: observation.location.x,
            y: observation.location.y,
            sampling_rate,
            temperature: reading.temperature,
            wind_speed: reading.wind_speed,
            relative_humidity: reading.relative_humidity,
            hotspot: reading.hotspot,
            fwi: reading.fwi,
        })
    }
}

fn validated_location(location: Location) -> std::result::Result<Location, ConfigError> {
    Location::checked(location.x, location.y)
}

/// Entropy-adaptive sensor with divergence-gated transmission
#[derive(Debug, Clone)]
pub struct AdaptiveSensor {
    id: SensorId,
    location: Location,
    prediction: PredictionModel,
    controller: SamplingController,
    gate: DivergenceGate,
    radio: Radio,
}

impl AdaptiveSensor {
    /// Deploy a sensor; rejects invalid locations and tunables
    pub fn new(
        id: SensorId,
        location: Location,
        base: Location,
        config: &RunConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let location = validated_location(location)?;
        let base = validated_location(base)?;

        let controller = SamplingController::new(config.max_error_history)?
            .with_sampling_rate(config.initial_sampling_rate)?
            .with_coarse_policy(config.coarse.clone())?;

        Ok(Self {
            id,
            location,
            prediction: PredictionModel::new(),
            controller,
            gate: DivergenceGate::new(config.kl_threshold)?,
            radio: Radio::new(base, config),
        })
    }

    /// Prediction model
    pub fn prediction(&self) -> &PredictionModel {
        &self.prediction
    }

    /// Sampling controller
    pub fn controller(&self) -> &SamplingController {
        &self.controller
    }

    /// Transmission gate
    pub fn gate(&self) -> &DivergenceGate {
        &self.gate
    }
}

impl Sensor for AdaptiveSensor {
    fn id(&self) -> SensorId {
        self.id
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Adaptive
    }

    fn location(&self) -> Location {
        self.location
    }

    fn sampling_rate(&self) -> f64 {
        self.controller.sampling_rate()
    }

    fn step(
        &mut self,
        env: &dyn Environment,
        timestamp: DateTime<Utc>,
        rng: &mut dyn Randomness,
    ) -> StepOutcome {
        let predicted = self.prediction.predict().cloned();

        // sense with probability `sampling_rate`; a zero rate never senses
        let draw = rng.uniform();
        if draw >= self.controller.sampling_rate() {
            log::trace!(
                "sensor {} skipped {} (draw {:.3} >= rate {:.3})",
                self.id,
                timestamp,
                draw,
                self.controller.sampling_rate()
            );
            return StepOutcome::skipped();
        }

        let reading = match env.lookup(self.location, timestamp) {
            Some(r) => r,
            None => {
                log::trace!("sensor {} has no data at {}", self.id, timestamp);
                return StepOutcome::default();
            }
        };
        let observation = Observation::new(self.id, self.location, reading);

        let prediction_error = predicted
            .as_ref()
            .and_then(|p| PredictionError::between(&observation, p));
        if let Some(ref error) = prediction_error {
            self.controller.record(error);
            self.controller.apply_coarse_policy(error);
        }
        if let Some(rate) = self.controller.update_sampling_rate() {
            log::trace!("sensor {} sampling rate -> {:.3}", self.id, rate);
        }

        self.prediction.accept(observation.clone());

        let transmission = if self.gate.should_transmit(predicted.as_ref(), &observation) {
            match self.radio.transmit(
                &observation,
                SensorKind::Adaptive,
                Some(self.controller.sampling_rate()),
                rng,
            ) {
                Ok(record) => {
                    log::debug!(
                        "sensor {} transmitted {} bytes ({:.1} mJ)",
                        self.id,
                        record.data_sent_bytes,
                        record.energy_used_mj
                    );
                    Some(record)
                }
                Err(e) => {
                    log::warn!("sensor {} transmission dropped: {}", self.id, e);
                    None
                }
            }
        } else {
            None
        };

        StepOutcome {
            skipped: false,
            observation: Some(observation),
            prediction_error,
            transmission,
        }
    }
}

/// Always-on baseline: senses and transmits on every timestep with data
#[derive(Debug, Clone)]
pub struct BaselineSensor {
    id: SensorId,
    location: Location,
    radio: Radio,
}

impl BaselineSensor {
    /// Deploy a baseline sensor
    pub fn new(
        id: SensorId,
        location: Location,
        base: Location,
        config: &RunConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            location: validated_location(location)?,
            radio: Radio::new(validated_location(base)?, config),
        })
    }
}

impl Sensor for BaselineSensor {
    fn id(&self) -> SensorId {
        self.id
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Baseline
    }

    fn location(&self) -> Location {
        self.location
    }

    fn sampling_rate(&self) -> f64 {
        1.0
    }

    fn step(
        &mut self,
        env: &dyn Environment,
        timestamp: DateTime<Utc>,
        rng: &mut dyn Randomness,
    ) -> StepOutcome {
        let reading = match env.lookup(self.location, timestamp) {
            Some(r) => r,
            None => return StepOutcome::default(),
        };
        let observation = Observation::new(self.id, self.location, reading);

        let transmission = match self
            .radio
            .transmit(&observation, SensorKind::Baseline, None, rng)
        {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("sensor {} transmission dropped: {}", self.id, e);
                None
            }
        };

        StepOutcome {
            skipped: false,
            observation: Some(observation),
            prediction_error: None,
            transmission,
        }
    }
}
