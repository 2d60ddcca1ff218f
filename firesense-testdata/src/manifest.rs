// FireSense Testdata - Field manifest
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Manifest describing a generated field.
//!
//! Stored next to the field CSV so a loaded field knows its grid and
//! how it was produced.

use crate::error::Result;
use crate::grid::GridSpec;
use crate::scenario::FireScenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Field manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldManifest {
    /// Field name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Grid geometry.
    pub grid: GridSpec,
    /// Scenario used to generate the field.
    pub scenario: FireScenario,
    /// First timestamp.
    pub start: DateTime<Utc>,
    /// Seconds between timesteps.
    pub interval_secs: i64,
    /// Number of timesteps.
    pub timestep_count: usize,
    /// Number of (timestep, cell) entries flagged as hotspots.
    #[serde(default)]
    pub hotspot_count: usize,
    /// Random seed used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
}

impl FieldManifest {
    /// Create a manifest for a grid and scenario.
    pub fn new(name: &str, grid: GridSpec, scenario: FireScenario) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            grid,
            scenario,
            start: DateTime::<Utc>::default(),
            interval_secs: 3600,
            timestep_count: 0,
            hotspot_count: 0,
            seed: None,
            generated_at: Utc::now(),
        }
    }

    /// Set description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Set timing information.
    pub fn with_timing(mut self, start: DateTime<Utc>, interval_secs: i64, count: usize) -> Self {
        self.start = start;
        self.interval_secs = interval_secs;
        self.timestep_count = count;
        self
    }

    /// Set seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Save as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let start = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap();
        let grid = GridSpec::default();

        let manifest = FieldManifest::new("test", grid, FireScenario::grassland(&grid))
            .with_description("grass fire")
            .with_timing(start, 3600, 48)
            .with_seed(Some(42));
        manifest.save(&path).unwrap();

        let loaded = FieldManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_partial_manifest_uses_defaults() {
        let json = r#"{
            "name": "bare",
            "grid": {"origin_x": 0.0, "origin_y": 0.0, "cell_size": 100.0, "cols": 2, "rows": 2},
            "scenario": {
                "name": "calm", "ignition": null, "ignition_step": 0, "spread_rate_m": 0.0,
                "burn_width_m": 0.0, "wind_direction_deg": 0.0, "elongation": 0.0,
                "ambient_temperature": 18.0, "diurnal_amplitude": 6.0,
                "fire_temperature_rise": 0.0, "wind_speed": 10.0,
                "ambient_humidity": 45.0, "noise_std": 0.0
            },
            "start": "2016-05-01T00:00:00Z",
            "interval_secs": 3600,
            "timestep_count": 1,
            "generated_at": "2016-05-01T00:00:00Z"
        }"#;
        let manifest: FieldManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.description, "");
        assert_eq!(manifest.hotspot_count, 0);
        assert_eq!(manifest.seed, None);
    }
}
