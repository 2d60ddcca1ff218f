// FireSense Sim - Parameter sweep
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sweep over KL thresholds and error-history lengths.
//!
//! Every combination runs the same deployment over the same field with
//! the same seed, and is summarised over the adaptive sensors only.

use crate::deployment::Deployment;
use crate::driver::{Simulation, TimeWindow};
use crate::error::Result;
use chrono::{DateTime, Utc};
use firesense::{Environment, RunConfig, SensorKind};
use serde::{Deserialize, Serialize};
use tracing::info;

/// File name of the sweep summary.
pub const SWEEP_SUMMARY: &str = "summary_metrics.csv";

/// Thresholds swept by default.
pub const DEFAULT_KL_THRESHOLDS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

/// History lengths swept by default.
pub const DEFAULT_ERROR_HISTORIES: [usize; 4] = [5, 10, 20, 30];

/// Sweep grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub kl_thresholds: Vec<f64>,
    pub error_histories: Vec<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            kl_thresholds: DEFAULT_KL_THRESHOLDS.to_vec(),
            error_histories: DEFAULT_ERROR_HISTORIES.to_vec(),
        }
    }
}

impl SweepConfig {
    /// Every (threshold, history) pair, thresholds outermost.
    pub fn combinations(&self) -> Vec<(f64, usize)> {
        self.kl_thresholds
            .iter()
            .flat_map(|&kl| self.error_histories.iter().map(move |&h| (kl, h)))
            .collect()
    }
}

/// One line of the sweep summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub kl_threshold: f64,
    pub error_history: usize,
    pub transmissions: u64,
    pub energy_j: f64,
    pub avg_sampling_rate: Option<f64>,
    pub hotspot_recovery_rate: f64,
}

/// Run every combination; `base` supplies all other tunables.
pub fn run_sweep(
    sweep: &SweepConfig,
    base: &RunConfig,
    deployment: &Deployment,
    env: &dyn Environment,
    timestamps: &[DateTime<Utc>],
    window: TimeWindow,
    seed: Option<u64>,
) -> Result<Vec<SweepRow>> {
    let combinations = sweep.combinations();
    let total = combinations.len();
    let mut rows = Vec::with_capacity(total);

    for (i, (kl, history)) in combinations.into_iter().enumerate() {
        info!(
            "[{}/{}] Running simulation for KL={}, history={}",
            i + 1,
            total,
            kl,
            history
        );
        let config = base
            .clone()
            .with_kl_threshold(kl)
            .with_max_error_history(history);

        let mut sim = Simulation::new(deployment, &config, window, seed)?;
        let summary = sim.run(env, timestamps).summary(SensorKind::Adaptive);

        rows.push(SweepRow {
            kl_threshold: kl,
            error_history: history,
            transmissions: summary.transmissions,
            energy_j: summary.energy_j,
            avg_sampling_rate: summary.avg_sampling_rate,
            hotspot_recovery_rate: summary.hotspot_recovery_rate,
        });
    }

    Ok(rows)
}
