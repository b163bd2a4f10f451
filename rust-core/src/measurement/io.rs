//! Measurement files
//! 
//! One JSON document per file:
//! `{"name": ..., "tdx": [...], "tdy": [[re, im], ...], "target_frequency": ..., "IF_frequency": ...}`

use std::path::{Path, PathBuf};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::Measurement;
use super::MeasurementError;

/// File extension for saved measurements
pub const FILE_EXTENSION: &str = "meas";

/// Entries every measurement document carries; `name` is optional
const REQUIRED_KEYS: [&str; 4] = ["tdx", "tdy", "target_frequency", "IF_frequency"];

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File is not a valid measurement document: {0}")]
    Malformed(String),

    #[error("Measurement file is missing the '{0}' entry")]
    MissingKey(String),

    #[error("Measurement data is inconsistent: {0}")]
    Invalid(#[from] MeasurementError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serializable mirror of a measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MeasurementDocument {
    #[serde(default)]
    name: String,
    tdx: Vec<f64>,
    tdy: Vec<[f64; 2]>,
    target_frequency: f64,
    #[serde(rename = "IF_frequency")]
    if_frequency: f64,
}

impl From<&Measurement> for MeasurementDocument {
    fn from(m: &Measurement) -> Self {
        Self {
            name: m.name().to_string(),
            tdx: m.tdx().to_vec(),
            tdy: m.tdy().iter().map(|c| [c.re, c.im]).collect(),
            target_frequency: m.target_frequency(),
            if_frequency: m.if_frequency(),
        }
    }
}

impl TryFrom<MeasurementDocument> for Measurement {
    type Error = MeasurementError;

    fn try_from(doc: MeasurementDocument) -> Result<Self, Self::Error> {
        let tdy = doc
            .tdy
            .iter()
            .map(|[re, im]| Complex64::new(*re, *im))
            .collect();
        let measurement = Measurement::new(doc.tdx, tdy, doc.target_frequency, doc.if_frequency)?;
        Ok(if doc.name.is_empty() {
            measurement
        } else {
            measurement.with_name(doc.name)
        })
    }
}

impl Measurement {
    /// Serialize to a JSON document
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(&MeasurementDocument::from(self))
            .map_err(|e| PersistenceError::Malformed(e.to_string()))
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        if let Some(object) = value.as_object() {
            if let Some(key) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
                return Err(PersistenceError::MissingKey(key.to_string()));
            }
        }

        let doc: MeasurementDocument = serde_json::from_value(value)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        Ok(Measurement::try_from(doc)?)
    }
}

/// Append `extension` unless the path already ends with it (ASCII case-insensitive)
pub fn with_extension(path: &Path, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".");
            name.push(extension);
            PathBuf::from(name)
        }
    }
}

/// Write a measurement file to exactly `path`
pub fn save_measurement(measurement: &Measurement, path: &Path) -> Result<(), PersistenceError> {
    std::fs::write(path, measurement.to_json()?).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved measurement '{}' to {}", measurement.name(), path.display());
    Ok(())
}

/// Read a measurement file
pub fn load_measurement(path: &Path) -> Result<Measurement, PersistenceError> {
    let data = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PersistenceError::NotFound(path.to_path_buf())
        } else {
            PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let measurement = Measurement::from_json(&data)?;
    log::info!("Loaded measurement '{}' from {}", measurement.name(), path.display());
    Ok(measurement)
}
