use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;

/// Bluetooth Advanced Audio Distribution Profile, audio sink role.
pub const A2DP_SINK_UUID: &str = "0000110b-0000-1000-8000-00805f9b34fb";

/// Default location of the ALSA routing artifact.
pub const DEFAULT_ARTIFACT_PATH: &str = "/mnt/SDCARD/.userdata/tg5040/.asoundrc";

/// Default location of the persisted sink category.
pub const DEFAULT_SETTINGS_PATH: &str = "/mnt/SDCARD/.userdata/tg5040/audiomon.json";

/// Configuration for the monitoring daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// ALSA config file rewritten on every sink change.
    pub artifact_path: PathBuf,

    /// JSON file recording the active sink category.
    pub settings_path: PathBuf,

    /// Upper bound on one blocking wait; also the cancellation latency.
    pub wait_timeout: Duration,

    /// Budget for the synchronous profile query on the bus.
    pub bus_timeout: Duration,

    /// Profile identifier that marks a Bluetooth peer as an audio sink.
    pub a2dp_uuid: String,

    /// Synthesize connect events for USB cards already attached at startup.
    pub rescan_usb_on_start: bool,
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_path.file_name().is_none() {
            return Err(ConfigError::InvalidArtifactPath(self.artifact_path.clone()));
        }
        if self.wait_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("wait timeout"));
        }
        if self.bus_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("bus timeout"));
        }
        if self.a2dp_uuid.trim().is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            wait_timeout: Duration::from_secs(1),
            bus_timeout: Duration::from_millis(1000),
            a2dp_uuid: A2DP_SINK_UUID.to_string(),
            rescan_usb_on_start: true,
        }
    }
}
