// FireSense Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Synthetic field generation.
//!
//! Weather follows a daily cycle shared by every cell, perturbed by
//! per-cell Gaussian noise. Cells inside the scenario's burning band get
//! a temperature rise, drier air and gustier wind, and are flagged as
//! hotspots.

use crate::error::{FieldError, Result};
use crate::field::FireField;
use crate::grid::GridSpec;
use crate::manifest::FieldManifest;
use crate::scenario::FireScenario;
use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// First timestamp.
    pub start: DateTime<Utc>,
    /// Seconds between timesteps.
    pub interval_secs: i64,
    /// Number of timesteps to generate.
    pub num_timesteps: usize,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            // 2016-05-01 00:00 UTC, hourly for eight days
            start: Utc
                .with_ymd_and_hms(2016, 5, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            interval_secs: 3600,
            num_timesteps: 192,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set start timestamp.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Set interval in seconds.
    pub fn with_interval_secs(mut self, secs: i64) -> Self {
        self.interval_secs = secs;
        self
    }

    /// Set number of timesteps.
    pub fn with_num_timesteps(mut self, n: usize) -> Self {
        self.num_timesteps = n;
        self
    }

    /// Set duration in hours (calculates num_timesteps from interval).
    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        if self.interval_secs > 0 {
            self.num_timesteps = (hours * 3600.0 / self.interval_secs as f64).ceil() as usize;
        }
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Timestamps covered by this configuration.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        (0..self.num_timesteps)
            .map(|i| self.start + Duration::seconds(self.interval_secs * i as i64))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.interval_secs <= 0 {
            return Err(FieldError::InvalidConfig {
                name: "interval_secs",
                message: format!("must be positive, got {}", self.interval_secs),
            });
        }
        if self.num_timesteps == 0 {
            return Err(FieldError::InvalidConfig {
                name: "num_timesteps",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Simplified fire-weather index from temperature, humidity and wind.
///
/// Grows with heat and wind, shrinks with humidity; zero in saturated air.
pub fn fire_weather_index(temperature: f64, relative_humidity: f64, wind_speed: f64) -> f64 {
    let dryness = (100.0 - relative_humidity).clamp(0.0, 100.0) / 100.0;
    0.5 * temperature.max(0.0) * dryness * (1.0 + wind_speed.max(0.0) / 25.0)
}

/// Generate a field for a grid and scenario.
pub fn generate_field(
    grid: &GridSpec,
    scenario: &FireScenario,
    config: &GeneratorConfig,
) -> Result<FireField> {
    grid.validate()?;
    scenario.validate()?;
    config.validate()?;

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut noise = |scale: f64| -> f64 {
        if scenario.noise_std == 0.0 {
            return 0.0;
        }
        let z: f64 = rng.sample(StandardNormal);
        z * scenario.noise_std * scale
    };

    let manifest = FieldManifest::new(&scenario.name, *grid, scenario.clone())
        .with_timing(config.start, config.interval_secs, config.num_timesteps)
        .with_seed(config.seed);
    let mut field = FireField::new(manifest, config.timestamps());
    let timestamps = field.timestamps().to_vec();

    for (step, ts) in timestamps.iter().enumerate() {
        // warmest mid-afternoon, coolest before dawn
        let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
        let daily = (2.0 * PI * (hour - 9.0) / 24.0).sin();
        let air = scenario.ambient_temperature + scenario.diurnal_amplitude * daily;
        let humidity = scenario.ambient_humidity - 1.5 * scenario.diurnal_amplitude * daily;

        for cell in 0..grid.cell_count() {
            let center = match grid.cell_center(cell) {
                Some(c) => c,
                None => continue,
            };
            let intensity = scenario.intensity_at(center, step);

            let temperature = air + scenario.fire_temperature_rise * intensity + noise(1.0);
            let rh = (humidity - 0.4 * scenario.fire_temperature_rise * intensity + noise(2.0))
                .clamp(2.0, 100.0);
            let wind = (scenario.wind_speed * (1.0 + 0.3 * intensity) + noise(1.5)).max(0.0);

            let reading = firesense::EnvironmentalReading::empty(*ts)
                .with_temperature(temperature)
                .with_wind_speed(wind)
                .with_relative_humidity(rh)
                .with_hotspot(intensity > 0.0)
                .with_fwi(fire_weather_index(temperature, rh, wind));
            field.set(step, cell, reading);
        }
    }

    let hotspots = field.hotspot_count();
    log::debug!(
        "generated field '{}': {} timesteps x {} cells, {} hotspot entries",
        scenario.name,
        field.len(),
        grid.cell_count(),
        hotspots
    );
    Ok(field.with_hotspot_count(hotspots))
}
