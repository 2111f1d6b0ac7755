// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dataset persistence

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::Dataset;
use crate::error::SpikenetResult;

/// Receives the dataset of a finished run
pub trait DatasetSink {
    fn write(&mut self, dataset: &Dataset) -> SpikenetResult<()>;
}

/// Writes the dataset as one JSON document
#[derive(Debug, Clone)]
pub struct JsonDatasetSink {
    path: PathBuf,
}

impl JsonDatasetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a dataset written by this sink
    pub fn read(path: &Path) -> SpikenetResult<Dataset> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl DatasetSink for JsonDatasetSink {
    fn write(&mut self, dataset: &Dataset) -> SpikenetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(writer, dataset)?;
        info!(
            target: "spikenet",
            "Wrote dataset ({} spikes, {} connections) to {}",
            dataset.spikes.len(),
            dataset.connections.len(),
            self.path.display()
        );
        Ok(())
    }
}
