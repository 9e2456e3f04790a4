//! Per-district model artifacts on disk
//!
//! Each district has one JSON file named `{district}_model.json` inside the
//! store directory. The offline fitter is the only writer and is expected to
//! finish before a dashboard session starts; no locking is done here.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the district name to form the artifact file name
pub const MODEL_FILE_SUFFIX: &str = "_model.json";

/// Suffix of the file an artifact is written to before it is renamed into place
pub const STAGING_SUFFIX: &str = ".partial";

/// A persisted fitted model with its provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact<M> {
    /// District the model was fit for
    pub district: String,
    /// Name of the estimator that produced the model
    pub model_name: String,
    /// When the model was fit
    pub fitted_at: DateTime<Utc>,
    /// The fitted model itself
    pub model: M,
}

/// Directory of per-district model artifacts
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Create a store rooted at `dir`; nothing is touched until save or load
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the artifacts
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for a district, rejecting names unsafe as file names
    pub fn path_for(&self, district: &str) -> Result<PathBuf> {
        validate_district_name(district)?;
        Ok(self.dir.join(format!("{}{}", district, MODEL_FILE_SUFFIX)))
    }

    /// Whether an artifact exists for the district
    pub fn contains(&self, district: &str) -> bool {
        self.path_for(district).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Persist a fitted model, replacing any earlier artifact.
    ///
    /// The artifact is written and flushed to a staging file first, then
    /// renamed over the old one, so a failed write leaves the previous
    /// artifact (or none) in place.
    pub fn save<M: Serialize>(
        &self,
        district: &str,
        model_name: &str,
        model: &M,
    ) -> Result<PathBuf> {
        let path = self.path_for(district)?;
        fs::create_dir_all(&self.dir)?;

        let artifact = ModelArtifact {
            district: district.to_string(),
            model_name: model_name.to_string(),
            fitted_at: Utc::now(),
            model,
        };

        let staging = self.staging_path(district);
        if let Err(e) = write_json(&staging, &artifact) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, &path)?;

        tracing::debug!(district, path = %path.display(), "saved model artifact");
        Ok(path)
    }

    /// Delete the artifact for a district; `Ok(false)` when there was none
    pub fn remove(&self, district: &str) -> Result<bool> {
        let path = self.path_for(district)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(district, path = %path.display(), "removed model artifact");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Staging file for a district, only valid after `path_for` accepted the name
    pub fn staging_path(&self, district: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", district, MODEL_FILE_SUFFIX, STAGING_SUFFIX))
    }

    /// Load the artifact for a district
    pub fn load<M: DeserializeOwned>(&self, district: &str) -> Result<ModelArtifact<M>> {
        let path = self.path_for(district)?;
        if !path.is_file() {
            return Err(ForecastError::ModelNotFound {
                district: district.to_string(),
                path: path.display().to_string(),
            });
        }

        let reader = BufReader::new(File::open(&path)?);
        let artifact = serde_json::from_reader(reader)?;
        Ok(artifact)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Reject district names that would escape or confuse the store directory
fn validate_district_name(district: &str) -> Result<()> {
    let unsafe_name = district.is_empty()
        || district == "."
        || district == ".."
        || district.contains(['/', '\\', '\0']);
    if unsafe_name {
        Err(ForecastError::InvalidDistrictName(district.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_uses_district_name() {
        let store = ModelStore::new("models");
        let path = store.path_for("Ahmednagar").unwrap();
        assert_eq!(path, PathBuf::from("models/Ahmednagar_model.json"));
    }

    #[test]
    fn test_unsafe_names_rejected() {
        let store = ModelStore::new("models");
        for name in ["", ".", "..", "../etc", "a/b", "a\\b"] {
            let err = store.path_for(name).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidDistrictName(_)), "{name}");
        }
        assert!(!store.contains("../etc"));
    }
}
