// FireSense Sim - Run logs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Experiment and transmission logs.
//!
//! The experiment log holds one row per real observation; the
//! transmission log one row per transmission. Both are written as CSV
//! with hotspot flags encoded as 0/1.

use crate::error::Result;
use chrono::{DateTime, Utc};
use firesense::{Observation, SensorId, SensorKind, TransmissionRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the experiment log.
pub const EXPERIMENT_LOG: &str = "experiment_log.csv";

/// File name of the transmission log.
pub const TRANSMISSION_LOG: &str = "transmission_log.csv";

/// One observation taken by a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub sensor_id: SensorId,
    pub sensor_type: SensorKind,
    pub datetime: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub hotspot: Option<u8>,
    pub fwi: Option<f64>,
}

impl ExperimentRow {
    /// Row for an observation taken by a sensor of `kind`.
    pub fn new(kind: SensorKind, observation: &Observation) -> Self {
        let reading = &observation.reading;
        Self {
            sensor_id: observation.sensor_id,
            sensor_type: kind,
            datetime: reading.datetime,
            x: observation.location.x,
            y: observation.location.y,
            temperature: reading.temperature,
            wind_speed: reading.wind_speed,
            relative_humidity: reading.relative_humidity,
            hotspot: reading.hotspot.map(u8::from),
            fwi: reading.fwi,
        }
    }

    /// True if the observed cell was burning.
    pub fn is_hotspot(&self) -> bool {
        self.hotspot == Some(1)
    }
}

/// One transmission to the base station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRow {
    pub sensor_id: SensorId,
    pub timestamp: DateTime<Utc>,
    pub data_sent_bytes: usize,
    pub tx_time_sec: f64,
    #[serde(rename = "energy_used_mJ")]
    pub energy_used_mj: f64,
    pub x: f64,
    pub y: f64,
    pub sampling_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub hotspot: Option<u8>,
    pub fwi: Option<f64>,
    pub sensor_type: SensorKind,
}

impl From<&TransmissionRecord> for TransmissionRow {
    fn from(record: &TransmissionRecord) -> Self {
        Self {
            sensor_id: record.sensor_id,
            timestamp: record.timestamp,
            data_sent_bytes: record.data_sent_bytes,
            tx_time_sec: record.tx_time_sec,
            energy_used_mj: record.energy_used_mj,
            x: record.x,
            y: record.y,
            sampling_rate: record.sampling_rate,
            temperature: record.temperature,
            wind_speed: record.wind_speed,
            relative_humidity: record.relative_humidity,
            hotspot: record.hotspot.map(u8::from),
            fwi: record.fwi,
            sensor_type: record.sensor_type,
        }
    }
}

/// Write rows as CSV with a header; an empty slice writes an empty file.
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read CSV rows written by [`write_csv`].
pub fn read_csv<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<T>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use firesense::{EnvironmentalReading, Location};
    use tempfile::tempdir;

    fn observation() -> Observation {
        let ts = Utc.with_ymd_and_hms(2016, 5, 3, 14, 0, 0).unwrap();
        Observation::new(
            12,
            Location::new(10.5, -3.25),
            EnvironmentalReading::empty(ts)
                .with_temperature(71.5)
                .with_hotspot(true)
                .with_fwi(33.0),
        )
    }

    #[test]
    fn test_experiment_row() {
        let row = ExperimentRow::new(SensorKind::Adaptive, &observation());
        assert_eq!(row.sensor_id, 12);
        assert_eq!(row.hotspot, Some(1));
        assert!(row.is_hotspot());
        assert_eq!(row.wind_speed, None);
    }

    #[test]
    fn test_experiment_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(EXPERIMENT_LOG);
        let rows = vec![ExperimentRow::new(SensorKind::Baseline, &observation())];

        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("sensor_id,sensor_type,datetime,x,y,"));
        assert!(text.contains(",typical,"));

        let loaded: Vec<ExperimentRow> = read_csv(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_transmission_header_uses_millijoules() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(TRANSMISSION_LOG);
        let record = TransmissionRecord {
            sensor_id: 1,
            sensor_type: SensorKind::Adaptive,
            timestamp: Utc.with_ymd_and_hms(2016, 5, 3, 14, 0, 0).unwrap(),
            data_sent_bytes: 180,
            tx_time_sec: 0.26,
            energy_used_mj: 1234.5,
            x: 1.0,
            y: 2.0,
            sampling_rate: Some(0.4),
            temperature: Some(20.0),
            wind_speed: None,
            relative_humidity: None,
            hotspot: Some(false),
            fwi: None,
        };

        write_csv(&path, &[TransmissionRow::from(&record)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().next().unwrap().contains("energy_used_mJ"));

        let loaded: Vec<TransmissionRow> = read_csv(&path).unwrap();
        assert_eq!(loaded[0].hotspot, Some(0));
        assert_eq!(loaded[0].sampling_rate, Some(0.4));
    }
}
