// FireSense Testdata - Fire scenarios
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fire scenario definitions.
//!
//! A scenario fixes the ambient weather and, optionally, an ignition
//! whose front expands at a constant rate, stretched downwind.

use crate::error::{FieldError, Result};
use crate::grid::GridSpec;
use firesense::Location;
use serde::{Deserialize, Serialize};

/// Weather and fire-spread parameters for one synthetic field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireScenario {
    /// Scenario name.
    pub name: String,
    /// Ignition point (None = no fire).
    pub ignition: Option<Location>,
    /// Timestep at which the fire ignites.
    pub ignition_step: usize,
    /// Front advance per timestep (metres).
    pub spread_rate_m: f64,
    /// Depth of the actively burning band behind the front (metres).
    pub burn_width_m: f64,
    /// Direction the wind blows toward (degrees, counter-clockwise from +x).
    pub wind_direction_deg: f64,
    /// Downwind stretch of the front, in [0, 1).
    pub elongation: f64,
    /// Mean air temperature (°C).
    pub ambient_temperature: f64,
    /// Half amplitude of the daily temperature cycle (°C).
    pub diurnal_amplitude: f64,
    /// Temperature added at the hottest point of the burning band (°C).
    pub fire_temperature_rise: f64,
    /// Mean wind speed (km/h).
    pub wind_speed: f64,
    /// Mean relative humidity (%).
    pub ambient_humidity: f64,
    /// Standard deviation of per-cell noise.
    pub noise_std: f64,
}

impl Default for FireScenario {
    fn default() -> Self {
        Self {
            name: "calm".to_string(),
            ignition: None,
            ignition_step: 0,
            spread_rate_m: 0.0,
            burn_width_m: 0.0,
            wind_direction_deg: 0.0,
            elongation: 0.0,
            ambient_temperature: 18.0,
            diurnal_amplitude: 6.0,
            fire_temperature_rise: 0.0,
            wind_speed: 10.0,
            ambient_humidity: 45.0,
            noise_std: 0.3,
        }
    }
}

impl FireScenario {
    /// Preset names accepted by [`FireScenario::preset`].
    pub const PRESETS: [&'static str; 3] = ["calm", "grassland", "wind_driven"];

    /// Ordinary weather, no fire.
    pub fn calm() -> Self {
        Self::default()
    }

    /// Slow circular grass fire lit near the grid centre on day two.
    pub fn grassland(grid: &GridSpec) -> Self {
        Self {
            name: "grassland".to_string(),
            ignition: Some(grid.center()),
            ignition_step: 24,
            spread_rate_m: grid.cell_size * 0.25,
            burn_width_m: grid.cell_size * 2.0,
            wind_direction_deg: 45.0,
            elongation: 0.2,
            ambient_temperature: 24.0,
            diurnal_amplitude: 7.0,
            fire_temperature_rise: 60.0,
            wind_speed: 12.0,
            ambient_humidity: 30.0,
            noise_std: 0.5,
        }
    }

    /// Fast, strongly elongated run from the upwind corner.
    pub fn wind_driven(grid: &GridSpec) -> Self {
        let origin = Location::new(
            grid.origin_x + grid.cell_size,
            grid.origin_y + grid.cell_size,
        );
        Self {
            name: "wind_driven".to_string(),
            ignition: Some(origin),
            ignition_step: 12,
            spread_rate_m: grid.cell_size * 0.6,
            burn_width_m: grid.cell_size * 3.0,
            wind_direction_deg: 45.0,
            elongation: 0.6,
            ambient_temperature: 29.0,
            diurnal_amplitude: 8.0,
            fire_temperature_rise: 90.0,
            wind_speed: 35.0,
            ambient_humidity: 18.0,
            noise_std: 0.8,
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str, grid: &GridSpec) -> Option<Self> {
        match name {
            "calm" => Some(Self::calm()),
            "grassland" => Some(Self::grassland(grid)),
            "wind_driven" => Some(Self::wind_driven(grid)),
            _ => None,
        }
    }

    /// Check the parameters can drive a generator.
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64, bool); 6] = [
            ("spread_rate_m", self.spread_rate_m, self.spread_rate_m >= 0.0),
            ("burn_width_m", self.burn_width_m, self.burn_width_m >= 0.0),
            (
                "elongation",
                self.elongation,
                (0.0..1.0).contains(&self.elongation),
            ),
            ("noise_std", self.noise_std, self.noise_std >= 0.0),
            ("wind_speed", self.wind_speed, self.wind_speed >= 0.0),
            (
                "ambient_humidity",
                self.ambient_humidity,
                (0.0..=100.0).contains(&self.ambient_humidity),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(FieldError::InvalidConfig {
                    name,
                    message: format!("out of range: {}", value),
                });
            }
        }
        Ok(())
    }

    /// Burning intensity in (0, 1] at `point` on `step`, or 0 if not burning.
    ///
    /// Intensity peaks at the front and fades linearly across the band.
    pub fn intensity_at(&self, point: Location, step: usize) -> f64 {
        let ignition = match self.ignition {
            Some(p) if step >= self.ignition_step => p,
            _ => return 0.0,
        };
        if self.burn_width_m <= 0.0 {
            return 0.0;
        }

        let radius = self.spread_rate_m * (step - self.ignition_step) as f64;
        let dx = point.x - ignition.x;
        let dy = point.y - ignition.y;
        let distance = dx.hypot(dy);

        // downwind points look closer to the ignition
        let heading = self.wind_direction_deg.to_radians();
        let alignment = if distance > 0.0 {
            (dx * heading.cos() + dy * heading.sin()) / distance
        } else {
            0.0
        };
        let effective = distance * (1.0 - self.elongation * alignment);

        let behind_front = radius - effective;
        if behind_front < 0.0 || behind_front >= self.burn_width_m {
            return 0.0;
        }
        1.0 - behind_front / self.burn_width_m
    }
}
