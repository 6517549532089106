//! Per-gauge persistence of trained DQM models.

use std::path::{Path, PathBuf};

use hydrobias_quantile_map::DqmModel;
use tracing::debug;

use crate::error::IoError;

/// A directory of `<gauge_id>_dqm.json` model documents.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the model of `gauge_id`.
    pub fn path_for(&self, gauge_id: u32) -> PathBuf {
        self.dir.join(format!("{gauge_id}_dqm.json"))
    }

    pub fn contains(&self, gauge_id: u32) -> bool {
        self.path_for(gauge_id).is_file()
    }

    /// Writes the model of `gauge_id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Io`] if the directory or file cannot be written.
    pub fn save(&self, gauge_id: u32, model: &DqmModel) -> Result<PathBuf, IoError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(gauge_id);
        std::fs::write(&path, model.to_json()?)?;
        debug!(gauge_id, path = %path.display(), "saved model");
        Ok(path)
    }

    /// Reads the model of `gauge_id`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if no model was saved, and
    /// [`IoError::Model`] if the document is malformed or of another format
    /// version.
    pub fn load(&self, gauge_id: u32) -> Result<DqmModel, IoError> {
        let path = self.path_for(gauge_id);
        if !path.is_file() {
            return Err(IoError::FileNotFound { path });
        }
        let json = std::fs::read_to_string(&path)?;
        let model = DqmModel::from_json(&json)?;
        debug!(gauge_id, path = %path.display(), "loaded model");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_layout() {
        let store = ModelStore::new("/models");
        assert_eq!(store.path_for(1502), PathBuf::from("/models/1502_dqm.json"));
        assert_eq!(store.dir(), Path::new("/models"));
    }
}
