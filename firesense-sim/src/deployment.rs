// FireSense Sim - Sensor deployment
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor deployment files.
//!
//! A deployment is a CSV with columns `sensor_type,x,y`. Rows labelled
//! `typical` become baseline sensors and rows labelled `universal` become
//! adaptive sensors; any other label (such as the `base_station` marker
//! row) is skipped. Sensor ids are row indices, and the base station sits
//! at the mean position of every row.

use crate::error::{Result, SimError};
use firesense::{
    AdaptiveSensor, BaselineSensor, Location, RunConfig, Sensor, SensorId, SensorKind,
};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Label of the marker row written for the base station.
pub const BASE_STATION_LABEL: &str = "base_station";

/// One deployment CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRow {
    pub sensor_type: String,
    pub x: f64,
    pub y: f64,
}

/// A sensor placed in the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedSensor {
    pub id: SensorId,
    pub kind: SensorKind,
    pub location: Location,
}

/// Parsed deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    rows: Vec<DeploymentRow>,
    sensors: Vec<PlacedSensor>,
    base: Location,
}

impl Deployment {
    /// Build from rows; fails on non-finite coordinates or no rows.
    pub fn from_rows(rows: Vec<DeploymentRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(SimError::NoSensors);
        }

        let mut sensors = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let location = Location::checked(row.x, row.y).map_err(|e| SimError::Deployment {
                row: i + 1,
                message: e.to_string(),
            })?;
            match SensorKind::from_label(&row.sensor_type) {
                Some(kind) => sensors.push(PlacedSensor {
                    id: i as SensorId,
                    kind,
                    location,
                }),
                None if row.sensor_type.trim() == BASE_STATION_LABEL => {}
                None => warn!("Skipping row {} with sensor type '{}'", i + 1, row.sensor_type),
            }
        }

        let n = rows.len() as f64;
        let base = Location::new(
            rows.iter().map(|r| r.x).sum::<f64>() / n,
            rows.iter().map(|r| r.y).sum::<f64>() / n,
        );

        Ok(Self {
            rows,
            sensors,
            base,
        })
    }

    /// Parse a deployment from CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let rows = csv
            .deserialize::<DeploymentRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Load a deployment CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Write the deployment CSV.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Scatter sensors uniformly over a disc around `center`.
    ///
    /// A base-station marker row at `center` is appended, so the loaded
    /// deployment's base stays near the centre.
    pub fn scatter(
        center: Location,
        radius_m: f64,
        typical: usize,
        universal: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut rows = Vec::with_capacity(typical + universal + 1);
        for (count, kind) in [(typical, SensorKind::Baseline), (universal, SensorKind::Adaptive)] {
            for _ in 0..count {
                let angle = rng.gen_range(0.0..2.0 * PI);
                // sqrt keeps the density uniform in area
                let r = rng.gen::<f64>().sqrt() * radius_m;
                rows.push(DeploymentRow {
                    sensor_type: kind.label().to_string(),
                    x: center.x + r * angle.cos(),
                    y: center.y + r * angle.sin(),
                });
            }
        }
        rows.push(DeploymentRow {
            sensor_type: BASE_STATION_LABEL.to_string(),
            x: center.x,
            y: center.y,
        });

        Self::from_rows(rows)
    }

    /// Placed sensors in row order.
    pub fn sensors(&self) -> &[PlacedSensor] {
        &self.sensors
    }

    /// Base station position.
    pub fn base_station(&self) -> Location {
        self.base
    }

    /// Number of sensors of a kind.
    pub fn count(&self, kind: SensorKind) -> usize {
        self.sensors.iter().filter(|s| s.kind == kind).count()
    }

    /// Instantiate every sensor with fresh state.
    pub fn build_sensors(&self, config: &RunConfig) -> Result<Vec<Box<dyn Sensor>>> {
        if self.sensors.is_empty() {
            return Err(SimError::NoSensors);
        }

        let mut built: Vec<Box<dyn Sensor>> = Vec::with_capacity(self.sensors.len());
        for placed in &self.sensors {
            let sensor: Box<dyn Sensor> = match placed.kind {
                SensorKind::Baseline => Box::new(BaselineSensor::new(
                    placed.id,
                    placed.location,
                    self.base,
                    config,
                )?),
                SensorKind::Adaptive => Box::new(AdaptiveSensor::new(
                    placed.id,
                    placed.location,
                    self.base,
                    config,
                )?),
            };
            built.push(sensor);
        }

        info!(
            "Deployed {} typical and {} universal sensors, base station at ({:.1}, {:.1})",
            self.count(SensorKind::Baseline),
            self.count(SensorKind::Adaptive),
            self.base.x,
            self.base.y
        );
        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const CSV: &str = "sensor_type,x,y\n\
                       typical,0.0,0.0\n\
                       universal,100.0,0.0\n\
                       drone,50.0,50.0\n\
                       universal,0.0,100.0\n";

    #[test]
    fn test_parse_deployment() {
        let deployment = Deployment::from_reader(CSV.as_bytes()).unwrap();

        assert_eq!(deployment.sensors().len(), 3);
        assert_eq!(deployment.count(SensorKind::Baseline), 1);
        assert_eq!(deployment.count(SensorKind::Adaptive), 2);
        // ids are row indices, skipped rows included
        let ids: Vec<_> = deployment.sensors().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }

    #[test]
    fn test_base_station_is_mean_of_all_rows() {
        let deployment = Deployment::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(deployment.base_station(), Location::new(37.5, 37.5));
    }

    #[test]
    fn test_rejects_bad_rows() {
        assert!(matches!(
            Deployment::from_reader("sensor_type,x,y\n".as_bytes()),
            Err(SimError::NoSensors)
        ));
        assert!(Deployment::from_reader("sensor_type,x,y\ntypical,abc,1.0\n".as_bytes()).is_err());
        assert!(matches!(
            Deployment::from_rows(vec![DeploymentRow {
                sensor_type: "typical".into(),
                x: f64::INFINITY,
                y: 0.0,
            }]),
            Err(SimError::Deployment { row: 1, .. })
        ));
    }

    #[test]
    fn test_build_sensors() {
        let deployment = Deployment::from_reader(CSV.as_bytes()).unwrap();
        let sensors = deployment.build_sensors(&RunConfig::default()).unwrap();
        let kinds: Vec<_> = sensors.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![SensorKind::Baseline, SensorKind::Adaptive, SensorKind::Adaptive]
        );
    }

    #[test]
    fn test_only_markers_builds_nothing() {
        let csv = "sensor_type,x,y\nbase_station,0.0,0.0\n";
        let deployment = Deployment::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            deployment.build_sensors(&RunConfig::default()),
            Err(SimError::NoSensors)
        ));
    }

    #[test]
    fn test_scatter_and_save() {
        let center = Location::new(5000.0, 5000.0);
        let deployment = Deployment::scatter(center, 1000.0, 20, 30, Some(4)).unwrap();

        assert_eq!(deployment.count(SensorKind::Baseline), 20);
        assert_eq!(deployment.count(SensorKind::Adaptive), 30);
        for s in deployment.sensors() {
            assert!(s.location.distance_to(&center) <= 1000.0 + 1e-9);
        }

        let file = NamedTempFile::new().unwrap();
        deployment.save(file.path()).unwrap();
        let loaded = Deployment::load(file.path()).unwrap();
        assert_eq!(loaded.sensors(), deployment.sensors());
        assert_eq!(loaded.base_station(), deployment.base_station());
    }
}
