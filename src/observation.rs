//! Observation data model
//!
//! An [`Observation`] is an immutable, timestamped record of the
//! environmental variables seen by one sensor at one location.

use crate::error::{ConfigError, FiresenseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier of a deployed sensor
pub type SensorId = u32;

/// A point in the projected simulation plane (metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Create a new location
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a location, rejecting non-finite coordinates
    pub fn checked(x: f64, y: f64) -> std::result::Result<Self, ConfigError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ConfigError::InvalidLocation { x, y });
        }
        Ok(Self { x, y })
    }

    /// Euclidean distance to another location
    pub fn distance_to(&self, other: &Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Variables compared between prediction and observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Temperature,
    WindSpeed,
    RelativeHumidity,
}

impl Variable {
    /// The fixed subset used for error tracking and divergence gating
    pub const COMPARED: [Variable; 3] = [
        Variable::Temperature,
        Variable::WindSpeed,
        Variable::RelativeHumidity,
    ];

    /// Column name used in logs and payloads
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::WindSpeed => "wind_speed",
            Variable::RelativeHumidity => "relative_humidity",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Environmental state returned by the external lookup for one cell and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    /// Simulation time of the reading
    pub datetime: DateTime<Utc>,
    /// Air temperature (°C)
    pub temperature: Option<f64>,
    /// Wind speed (km/h)
    pub wind_speed: Option<f64>,
    /// Relative humidity (%)
    pub relative_humidity: Option<f64>,
    /// Active fire in the cell
    pub hotspot: Option<bool>,
    /// Fire-weather index
    pub fwi: Option<f64>,
}

impl EnvironmentalReading {
    /// Create a reading with no variables set
    pub fn empty(datetime: DateTime<Utc>) -> Self {
        Self {
            datetime,
            temperature: None,
            wind_speed: None,
            relative_humidity: None,
            hotspot: None,
            fwi: None,
        }
    }

    /// Value of a compared variable, if present and finite
    pub fn get(&self, variable: Variable) -> Option<f64> {
        let value = match variable {
            Variable::Temperature => self.temperature,
            Variable::WindSpeed => self.wind_speed,
            Variable::RelativeHumidity => self.relative_humidity,
        };
        value.filter(|v| v.is_finite())
    }

    /// Builder: set temperature
    pub fn with_temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    /// Builder: set wind speed
    pub fn with_wind_speed(mut self, value: f64) -> Self {
        self.wind_speed = Some(value);
        self
    }

    /// Builder: set relative humidity
    pub fn with_relative_humidity(mut self, value: f64) -> Self {
        self.relative_humidity = Some(value);
        self
    }

    /// Builder: set hotspot flag
    pub fn with_hotspot(mut self, hotspot: bool) -> Self {
        self.hotspot = Some(hotspot);
        self
    }

    /// Builder: set fire-weather index
    pub fn with_fwi(mut self, value: f64) -> Self {
        self.fwi = Some(value);
        self
    }
}

/// A reading taken by a specific sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub sensor_id: SensorId,
    #[serde(flatten)]
    pub location: Location,
    #[serde(flatten)]
    pub reading: EnvironmentalReading,
}

impl Observation {
    /// Create a new observation
    pub fn new(sensor_id: SensorId, location: Location, reading: EnvironmentalReading) -> Self {
        Self {
            sensor_id,
            location,
            reading,
        }
    }

    /// Value of a compared variable, if present and finite
    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.reading.get(variable)
    }

    /// Observation time
    pub fn datetime(&self) -> DateTime<Utc> {
        self.reading.datetime
    }

    /// Serialized transmission payload (JSON)
    pub fn payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| FiresenseError::Serialization(e.to_string()))
    }

    /// Pairs of (variable, observed, reference) for variables present in both
    pub fn shared_variables<'a>(
        &'a self,
        reference: &'a Observation,
    ) -> impl Iterator<Item = (Variable, f64, f64)> + 'a {
        Variable::COMPARED
            .into_iter()
            .filter_map(move |var| Some((var, self.get(var)?, reference.get(var)?)))
    }
}

/// Signed per-variable prediction error (observed - predicted)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionError {
    errors: BTreeMap<Variable, f64>,
}

impl PredictionError {
    /// Compare an observation against a prediction.
    ///
    /// Returns `None` when no compared variable is present in both.
    pub fn between(observed: &Observation, predicted: &Observation) -> Option<Self> {
        let errors: BTreeMap<Variable, f64> = observed
            .shared_variables(predicted)
            .map(|(var, obs, pred)| (var, obs - pred))
            .collect();

        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Signed error for one variable
    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.errors.get(&variable).copied()
    }

    /// Iterate over (variable, signed error)
    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.errors.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of compared variables
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True if no variable was compared
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Mean absolute error across compared variables
    pub fn mean_absolute(&self) -> f64 {
        if self.errors.is_empty() {
            return 0.0;
        }
        self.errors.values().map(|e| e.abs()).sum::<f64>() / self.errors.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 5, 1, hour, 0, 0).unwrap()
    }

    fn obs(temperature: f64, wind: f64) -> Observation {
        Observation::new(
            7,
            Location::new(10.0, 20.0),
            EnvironmentalReading::empty(at(0))
                .with_temperature(temperature)
                .with_wind_speed(wind),
        )
    }

    #[test]
    fn test_location_distance() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_location_checked_rejects_nan() {
        assert!(Location::checked(f64::NAN, 0.0).is_err());
        assert!(Location::checked(1.0, f64::INFINITY).is_err());
        assert!(Location::checked(1.0, 2.0).is_ok());
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let reading = EnvironmentalReading::empty(at(0)).with_temperature(f64::NAN);
        assert_eq!(reading.get(Variable::Temperature), None);
    }

    #[test]
    fn test_prediction_error_signed() {
        let predicted = obs(20.0, 5.0);
        let observed = obs(23.0, 4.0);
        let err = PredictionError::between(&observed, &predicted).unwrap();

        assert_eq!(err.len(), 2);
        assert!((err.get(Variable::Temperature).unwrap() - 3.0).abs() < 1e-12);
        assert!((err.get(Variable::WindSpeed).unwrap() + 1.0).abs() < 1e-12);
        assert!((err.mean_absolute() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_error_no_shared_variables() {
        let predicted = Observation::new(
            1,
            Location::new(0.0, 0.0),
            EnvironmentalReading::empty(at(0)).with_temperature(20.0),
        );
        let observed = Observation::new(
            1,
            Location::new(0.0, 0.0),
            EnvironmentalReading::empty(at(1)).with_relative_humidity(40.0),
        );
        assert!(PredictionError::between(&observed, &predicted).is_none());
    }

    #[test]
    fn test_payload_contains_fields() {
        let observation = obs(21.5, 3.0);
        let payload = observation.payload().unwrap();
        let text = String::from_utf8(payload).unwrap();

        assert!(text.contains("\"sensor_id\":7"));
        assert!(text.contains("\"temperature\":21.5"));
        assert!(text.contains("\"x\":10.0"));
        assert!(text.contains("datetime"));
    }
}
