// FireSense Testdata - Fire field
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! In-memory fire field and its on-disk form.
//!
//! A field is a dense `timestep x cell` table of environmental readings.
//! On disk it is a directory holding `field.csv` (one row per populated
//! entry) and `manifest.json`.

use crate::error::{FieldError, Result};
use crate::grid::GridSpec;
use crate::manifest::FieldManifest;
use chrono::{DateTime, Utc};
use firesense::{Environment, EnvironmentalReading, Location};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the field table inside a field directory.
pub const FIELD_FILE: &str = "field.csv";

/// File name of the manifest inside a field directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One CSV row of a field table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub datetime: DateTime<Utc>,
    pub cell_id: usize,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub relative_humidity: Option<f64>,
    /// 1 if burning, 0 otherwise
    pub hotspot: Option<u8>,
    pub fwi: Option<f64>,
}

impl FieldRow {
    fn from_reading(cell_id: usize, reading: &EnvironmentalReading) -> Self {
        Self {
            datetime: reading.datetime,
            cell_id,
            temperature: reading.temperature,
            wind_speed: reading.wind_speed,
            relative_humidity: reading.relative_humidity,
            hotspot: reading.hotspot.map(u8::from),
            fwi: reading.fwi,
        }
    }

    fn into_reading(self) -> EnvironmentalReading {
        EnvironmentalReading {
            datetime: self.datetime,
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            relative_humidity: self.relative_humidity,
            hotspot: self.hotspot.map(|h| h != 0),
            fwi: self.fwi,
        }
    }
}

/// Gridded environmental state over a sequence of timestamps.
#[derive(Debug, Clone)]
pub struct FireField {
    manifest: FieldManifest,
    timestamps: Vec<DateTime<Utc>>,
    cells: Vec<Option<EnvironmentalReading>>,
}

impl FireField {
    /// Create an empty field; timestamps are sorted and deduplicated.
    pub fn new(manifest: FieldManifest, mut timestamps: Vec<DateTime<Utc>>) -> Self {
        timestamps.sort();
        timestamps.dedup();
        let size = timestamps.len() * manifest.grid.cell_count();
        Self {
            manifest,
            timestamps,
            cells: vec![None; size],
        }
    }

    /// Field manifest.
    pub fn manifest(&self) -> &FieldManifest {
        &self.manifest
    }

    /// Grid geometry.
    pub fn grid(&self) -> &GridSpec {
        &self.manifest.grid
    }

    /// Timestamps in strictly increasing order.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the field has no timestep.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn slot(&self, step: usize, cell: usize) -> Option<usize> {
        let n = self.manifest.grid.cell_count();
        if step >= self.timestamps.len() || cell >= n {
            return None;
        }
        Some(step * n + cell)
    }

    /// Reading of a cell at a timestep index.
    pub fn reading(&self, step: usize, cell: usize) -> Option<&EnvironmentalReading> {
        self.slot(step, cell).and_then(|i| self.cells[i].as_ref())
    }

    /// Store a reading; returns false if the slot is outside the field.
    pub fn set(&mut self, step: usize, cell: usize, reading: EnvironmentalReading) -> bool {
        match self.slot(step, cell) {
            Some(i) => {
                self.cells[i] = Some(reading);
                true
            }
            None => false,
        }
    }

    /// Index of a timestamp, if the field has it.
    pub fn step_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.timestamps.binary_search(&timestamp).ok()
    }

    pub(crate) fn with_hotspot_count(mut self, count: usize) -> Self {
        self.manifest.hotspot_count = count;
        self
    }

    /// Number of populated entries flagged as hotspots.
    pub fn hotspot_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|r| r.hotspot == Some(true))
            .count()
    }

    /// Write `field.csv` and `manifest.json` into `dir`, creating it.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut writer = csv::Writer::from_path(dir.join(FIELD_FILE))?;
        let n = self.manifest.grid.cell_count();
        for (i, entry) in self.cells.iter().enumerate() {
            if let Some(reading) = entry {
                writer.serialize(FieldRow::from_reading(i % n, reading))?;
            }
        }
        writer.flush()?;

        self.manifest.save(dir.join(MANIFEST_FILE))?;
        log::debug!(
            "saved field '{}' ({} timesteps) to {}",
            self.manifest.name,
            self.timestamps.len(),
            dir.display()
        );
        Ok(())
    }

    /// Load a field directory written by [`FireField::save`].
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest = FieldManifest::load(dir.join(MANIFEST_FILE))?;
        manifest.grid.validate()?;

        let mut reader = csv::Reader::from_path(dir.join(FIELD_FILE))?;
        let mut rows = Vec::new();
        for (i, row) in reader.deserialize::<FieldRow>().enumerate() {
            let row = row?;
            if row.cell_id >= manifest.grid.cell_count() {
                return Err(FieldError::Malformed {
                    record: i + 1,
                    message: format!(
                        "cell {} outside {}-cell grid",
                        row.cell_id,
                        manifest.grid.cell_count()
                    ),
                });
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(FieldError::Empty);
        }

        let timestamps = rows.iter().map(|r| r.datetime).collect();
        let mut field = FireField::new(manifest, timestamps);
        for row in rows {
            // every row timestamp is in the index by construction
            if let Some(step) = field.step_of(row.datetime) {
                let cell = row.cell_id;
                field.set(step, cell, row.into_reading());
            }
        }
        Ok(field)
    }
}

impl Environment for FireField {
    fn lookup(&self, location: Location, timestamp: DateTime<Utc>) -> Option<EnvironmentalReading> {
        let cell = self.manifest.grid.cell_at(location)?;
        let step = self.step_of(timestamp)?;
        self.reading(step, cell).cloned()
    }
}
