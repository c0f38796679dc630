use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::durable;
use crate::models::error::StorageError;
use crate::models::state::SinkCategory;
use crate::traits::sink_notifier::SinkNotifier;

/// Persisted record of the active sink category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSettings {
    pub audio_sink: SinkCategory,
    pub updated_at: DateTime<Utc>,
}

/// Settings-store notifier: records the sink category as a JSON document
/// that other components read to learn which output is active.
pub struct JsonSettingsStore {
    path: PathBuf,
    current: Mutex<Option<SinkCategory>>,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Category most recently written through this store.
    pub fn current(&self) -> Option<SinkCategory> {
        *self.current.lock()
    }

    /// Read the settings document back; `None` if it was never written.
    pub fn load(&self) -> Result<Option<SinkSettings>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let settings = serde_json::from_str(&json)
            .map_err(|e| StorageError::Serialize(format!("failed to parse settings: {}", e)))?;
        Ok(Some(settings))
    }
}

impl SinkNotifier for JsonSettingsStore {
    fn set_audio_sink(&self, category: SinkCategory) -> Result<(), StorageError> {
        let settings = SinkSettings {
            audio_sink: category,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| StorageError::Serialize(format!("failed to serialize settings: {}", e)))?;

        let mut current = self.current.lock();
        durable::write_atomic(&self.path, json.as_bytes())?;
        *current = Some(category);
        debug!("Audio sink set to {:?}", category);
        Ok(())
    }
}
