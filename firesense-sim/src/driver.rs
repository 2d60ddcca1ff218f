// FireSense Sim - Simulation driver
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Outer simulation loop.
//!
//! Steps every deployed sensor once per timestamp, in strictly increasing
//! time order, restricted to an optional inclusive window.

use crate::deployment::Deployment;
use crate::error::{Result, SimError};
use crate::logs::{write_csv, ExperimentRow, TransmissionRow, EXPERIMENT_LOG, TRANSMISSION_LOG};
use chrono::{DateTime, NaiveDateTime, Utc};
use firesense::{Environment, RunConfig, SeededRandomness, Sensor, SensorKind, SensorMetrics};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Parse `YYYY-MM-DD HH:MM:SS` (taken as UTC) or RFC 3339.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| SimError::InvalidTimestamp(format!("'{}': {}", s, e)))
}

/// Inclusive time window; an open bound admits everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SimError::InvalidWindow {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Check a timestamp lies inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }

    /// Timestamps inside the window, sorted and deduplicated.
    pub fn select(&self, timestamps: &[DateTime<Utc>]) -> Vec<DateTime<Utc>> {
        let mut selected: Vec<_> = timestamps
            .iter()
            .copied()
            .filter(|ts| self.contains(*ts))
            .collect();
        selected.sort();
        selected.dedup();
        selected
    }
}

/// Headline figures for one sensor kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub transmissions: u64,
    pub energy_j: f64,
    /// Mean sampling rate over transmissions (None without any)
    pub avg_sampling_rate: Option<f64>,
    /// Transmitted hotspot observations / hotspot observations
    pub hotspot_recovery_rate: f64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub experiment: Vec<ExperimentRow>,
    pub transmissions: Vec<TransmissionRow>,
    pub metrics: BTreeMap<&'static str, SensorMetrics>,
    pub timesteps: usize,
}

impl RunLog {
    /// Metrics for one sensor kind.
    pub fn metrics_for(&self, kind: SensorKind) -> SensorMetrics {
        self.metrics.get(kind.label()).cloned().unwrap_or_default()
    }

    /// Metrics folded over every sensor kind.
    pub fn total_metrics(&self) -> SensorMetrics {
        self.metrics
            .values()
            .fold(SensorMetrics::new(), |mut total, m| {
                total.merge(m);
                total
            })
    }

    /// Fraction of hotspot observations that were transmitted.
    pub fn hotspot_recovery_rate(&self, kind: SensorKind) -> f64 {
        let sent: HashSet<_> = self
            .transmissions
            .iter()
            .filter(|t| t.sensor_type == kind)
            .map(|t| (t.sensor_id, t.timestamp))
            .collect();

        let (total, recovered) = self
            .experiment
            .iter()
            .filter(|r| r.sensor_type == kind && r.is_hotspot())
            .fold((0usize, 0usize), |(n, k), r| {
                let hit = sent.contains(&(r.sensor_id, r.datetime));
                (n + 1, k + usize::from(hit))
            });

        if total == 0 {
            return 0.0;
        }
        recovered as f64 / total as f64
    }

    /// Summary for one sensor kind.
    pub fn summary(&self, kind: SensorKind) -> RunSummary {
        let metrics = self.metrics_for(kind);
        RunSummary {
            transmissions: metrics.transmissions,
            energy_j: metrics.energy_joules(),
            avg_sampling_rate: metrics.mean_sampling_rate(),
            hotspot_recovery_rate: self.hotspot_recovery_rate(kind),
        }
    }

    /// Write both logs into `dir`, creating it.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        write_csv(dir.join(EXPERIMENT_LOG), &self.experiment)?;
        write_csv(dir.join(TRANSMISSION_LOG), &self.transmissions)?;
        info!(
            "Saved {} observations and {} transmissions to {}",
            self.experiment.len(),
            self.transmissions.len(),
            dir.display()
        );
        Ok(())
    }
}

/// A deployed sensor population ready to run.
pub struct Simulation {
    sensors: Vec<Box<dyn Sensor>>,
    rng: SeededRandomness,
    window: TimeWindow,
}

impl Simulation {
    /// Build fresh sensors from a deployment.
    pub fn new(
        deployment: &Deployment,
        config: &RunConfig,
        window: TimeWindow,
        seed: Option<u64>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sensors: deployment.build_sensors(config)?,
            rng: SeededRandomness::new(seed),
            window,
        })
    }

    /// Number of sensors.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Run over `timestamps` (filtered to the window) against `env`.
    pub fn run(&mut self, env: &dyn Environment, timestamps: &[DateTime<Utc>]) -> RunLog {
        let steps = self.window.select(timestamps);
        info!(
            "Running {} sensors over {} timesteps",
            self.sensors.len(),
            steps.len()
        );

        let mut log = RunLog {
            timesteps: steps.len(),
            ..Default::default()
        };

        for ts in steps {
            for sensor in self.sensors.iter_mut() {
                let kind = sensor.kind();
                let outcome = sensor.step(env, ts, &mut self.rng);

                log.metrics.entry(kind.label()).or_default().record(&outcome);
                if let Some(ref observation) = outcome.observation {
                    log.experiment.push(ExperimentRow::new(kind, observation));
                }
                if let Some(ref record) = outcome.transmission {
                    log.transmissions.push(TransmissionRow::from(record));
                }
            }
            debug!("Timestep {} - sensors updated", ts);
        }

        for (label, metrics) in &log.metrics {
            info!(
                "{}: {} observations ({:.1}% of cycles), {} transmissions ({:.1}% sent), {:.3} J ({:.1} mJ each)",
                label,
                metrics.observations,
                metrics.realized_sampling_fraction() * 100.0,
                metrics.transmissions,
                metrics.transmission_ratio() * 100.0,
                metrics.energy_joules(),
                metrics.energy_per_transmission()
            );
        }
        let total = log.total_metrics();
        info!(
            "Total: {} transmissions, {:.3} J",
            total.transmissions,
            total.energy_joules()
        );
        log
    }
}
