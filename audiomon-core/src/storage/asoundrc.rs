//! ALSA routing artifact.
//!
//! The file's presence and content always mirror the sink state: a
//! bluealsa stanza for a Bluetooth peer, a `hw` stanza for a USB card, and
//! no file at all for the default sink.

use std::path::{Path, PathBuf};

use log::info;

use super::durable;
use crate::models::error::StorageError;
use crate::models::state::SinkState;
use crate::traits::persistence::SinkPersistence;

/// Render the artifact for `state`, or `None` when the file should be absent.
pub fn render(state: &SinkState) -> Option<String> {
    match state {
        SinkState::Default => None,
        SinkState::Bluetooth(mac) => Some(format!(
            "defaults.bluealsa.device \"{mac}\"\n\
             \n\
             pcm.!default {{\n\
             \x20   type plug\n\
             \x20   slave.pcm {{\n\
             \x20       type bluealsa\n\
             \x20       device \"{mac}\"\n\
             \x20       profile \"a2dp\"\n\
             \x20       delay 0\n\
             \x20   }}\n\
             }}\n\
             ctl.!default {{\n\
             \x20   type bluealsa\n\
             }}\n"
        )),
        SinkState::UsbAudio(card) => Some(format!(
            "pcm.!default {{\n\
             \x20   type hw\n\
             \x20   card {card}\n\
             }}\n\
             ctl.!default {{\n\
             \x20   type hw\n\
             \x20   card {card}\n\
             }}\n"
        )),
    }
}

/// Writes the `.asoundrc` consumed by the sound server.
#[derive(Debug, Clone)]
pub struct AsoundrcWriter {
    path: PathBuf,
}

impl AsoundrcWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SinkPersistence for AsoundrcWriter {
    fn apply(&self, state: &SinkState) -> Result<(), StorageError> {
        match render(state) {
            Some(contents) => {
                durable::write_atomic(&self.path, contents.as_bytes())?;
                info!("Updated {} for {}", self.path.display(), state);
            }
            None => {
                if durable::remove_durable(&self.path)? {
                    info!("Removed audio config {}", self.path.display());
                } else {
                    info!("Audio config {} not present", self.path.display());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const BLUETOOTH_STANZA: &str = r#"defaults.bluealsa.device "AA:BB:CC:DD:EE:FF"

pcm.!default {
    type plug
    slave.pcm {
        type bluealsa
        device "AA:BB:CC:DD:EE:FF"
        profile "a2dp"
        delay 0
    }
}
ctl.!default {
    type bluealsa
}
"#;

    const USB_STANZA: &str = "pcm.!default {
    type hw
    card 1
}
ctl.!default {
    type hw
    card 1
}
";

    #[test]
    fn renders_exact_stanzas() {
        assert_eq!(
            render(&SinkState::Bluetooth("AA:BB:CC:DD:EE:FF".into())).as_deref(),
            Some(BLUETOOTH_STANZA)
        );
        assert_eq!(render(&SinkState::UsbAudio("1".into())).as_deref(), Some(USB_STANZA));
        assert_eq!(render(&SinkState::Default), None);
    }

    #[test]
    fn apply_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AsoundrcWriter::new(dir.path().join(".asoundrc"));
        let state = SinkState::Bluetooth("AA:BB:CC:DD:EE:FF".into());

        writer.apply(&state).unwrap();
        let once = fs::read(writer.path()).unwrap();
        writer.apply(&state).unwrap();
        let twice = fs::read(writer.path()).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn switching_sinks_rewrites_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AsoundrcWriter::new(dir.path().join(".asoundrc"));

        writer.apply(&SinkState::Bluetooth("AA:BB:CC:DD:EE:FF".into())).unwrap();
        writer.apply(&SinkState::UsbAudio("1".into())).unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), USB_STANZA);
    }

    #[test]
    fn default_removes_and_stays_removed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AsoundrcWriter::new(dir.path().join(".asoundrc"));

        writer.apply(&SinkState::UsbAudio("2".into())).unwrap();
        writer.apply(&SinkState::Default).unwrap();
        assert!(!writer.path().exists());

        writer.apply(&SinkState::Default).unwrap();
        assert!(!writer.path().exists());
    }
}
