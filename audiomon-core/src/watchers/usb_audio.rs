//! USB sound card classification.
//!
//! Only the control node of a card (`/dev/snd/controlC<N>`) stands for the
//! whole adapter; PCM and MIDI child nodes are ignored, and so is any card
//! not enumerated under a USB bus.

use log::{debug, info, warn};

use crate::models::device::{ConnectionEvent, DeviceIdentity, DeviceKind};
use crate::models::error::SourceError;
use crate::traits::event_source::Classifier;

pub const SOUND_SUBSYSTEM: &str = "sound";

/// Device node name prefix of a card's control interface.
pub const CONTROL_NODE_MARKER: &str = "controlC";

/// Device property holding the card index when the node name does not.
pub const SOUND_CARD_PROPERTY: &str = "SOUND_CARD";

/// Snapshot of a hotplug device, decoupled from the notification library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotplugDevice {
    /// `add`, `remove`, ...; absent for enumerated devices.
    pub action: Option<String>,
    pub subsystem: Option<String>,
    /// e.g. `/dev/snd/controlC1`.
    pub devnode: Option<String>,
    /// Kernel device path, e.g. `/devices/platform/.../usb1/1-1/1-1:1.0/sound/card1/controlC1`.
    pub devpath: Option<String>,
    /// Value of the `SOUND_CARD` property, if set.
    pub sound_card: Option<String>,
}

/// One-shot listing of currently attached devices in the sound subsystem.
pub trait HotplugEnumerator {
    fn attached(&self) -> Result<Vec<HotplugDevice>, SourceError>;
}

/// Classifies sound subsystem hotplug notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsbAudioWatcher;

impl UsbAudioWatcher {
    pub fn new() -> Self {
        Self
    }

    /// Whether the device is the control node of a USB-attached card.
    pub fn is_usb_audio_device(device: &HotplugDevice) -> bool {
        if device.subsystem.as_deref() != Some(SOUND_SUBSYSTEM) {
            return false;
        }
        match device.devnode.as_deref() {
            Some(node) if node.contains(CONTROL_NODE_MARKER) => {}
            _ => return false,
        }
        device
            .devpath
            .as_deref()
            .is_some_and(|path| path.contains("usb"))
    }

    /// Card index from the node name, falling back to `SOUND_CARD`.
    pub fn card_identity(device: &HotplugDevice) -> Option<DeviceIdentity> {
        let from_node = device.devnode.as_deref().and_then(|node| {
            let start = node.find(CONTROL_NODE_MARKER)? + CONTROL_NODE_MARKER.len();
            let index = &node[start..];
            (!index.is_empty()).then(|| index.to_string())
        });
        from_node
            .or_else(|| device.sound_card.clone().filter(|card| !card.is_empty()))
            .map(DeviceIdentity::new)
    }

    pub fn classify(&self, device: &HotplugDevice) -> Option<ConnectionEvent> {
        if !Self::is_usb_audio_device(device) {
            return None;
        }
        let connected = match device.action.as_deref() {
            Some("add") => true,
            Some("remove") => false,
            _ => return None,
        };
        let Some(identity) = Self::card_identity(device) else {
            warn!("USB audio device without card index: {:?}", device.devnode);
            return None;
        };

        info!(
            "USB audio device {}: card {}",
            if connected { "connected" } else { "disconnected" },
            identity
        );
        Some(ConnectionEvent {
            identity,
            kind: DeviceKind::UsbAudio,
            connected,
        })
    }

    /// Synthesize connect events for every USB card already attached.
    pub fn scan_attached(
        &self,
        enumerator: &impl HotplugEnumerator,
    ) -> Result<Vec<ConnectionEvent>, SourceError> {
        info!("Scanning for existing USB audio devices...");
        let events: Vec<ConnectionEvent> = enumerator
            .attached()?
            .iter()
            .filter(|device| Self::is_usb_audio_device(device))
            .filter_map(Self::card_identity)
            .map(|identity| {
                debug!("Found existing USB audio card {}", identity);
                ConnectionEvent::connected(DeviceKind::UsbAudio, identity)
            })
            .collect();
        info!("Found {} existing USB audio device(s)", events.len());
        Ok(events)
    }
}

impl Classifier<HotplugDevice> for UsbAudioWatcher {
    fn classify(&mut self, raw: &HotplugDevice) -> Option<ConnectionEvent> {
        UsbAudioWatcher::classify(self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USB_PATH: &str =
        "/devices/platform/soc/5200000.usb/usb1/1-1/1-1:1.0/sound/card1/controlC1";

    fn control_node(action: &str) -> HotplugDevice {
        HotplugDevice {
            action: Some(action.into()),
            subsystem: Some(SOUND_SUBSYSTEM.into()),
            devnode: Some("/dev/snd/controlC1".into()),
            devpath: Some(USB_PATH.into()),
            sound_card: None,
        }
    }

    struct Attached(Vec<HotplugDevice>);

    impl HotplugEnumerator for Attached {
        fn attached(&self) -> Result<Vec<HotplugDevice>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn add_and_remove() {
        let watcher = UsbAudioWatcher::new();
        assert_eq!(
            watcher.classify(&control_node("add")),
            Some(ConnectionEvent::connected(DeviceKind::UsbAudio, "1"))
        );
        assert_eq!(
            watcher.classify(&control_node("remove")),
            Some(ConnectionEvent::disconnected(DeviceKind::UsbAudio, "1"))
        );
    }

    #[test]
    fn other_actions_are_ignored() {
        let watcher = UsbAudioWatcher::new();
        assert_eq!(watcher.classify(&control_node("change")), None);
        assert_eq!(
            watcher.classify(&HotplugDevice {
                action: None,
                ..control_node("add")
            }),
            None
        );
    }

    #[test]
    fn pcm_node_is_not_an_adapter() {
        let device = HotplugDevice {
            devnode: Some("/dev/snd/pcmC1D0p".into()),
            devpath: Some(USB_PATH.replace("controlC1", "pcmC1D0p")),
            ..control_node("add")
        };
        assert_eq!(UsbAudioWatcher::new().classify(&device), None);
    }

    #[test]
    fn onboard_card_is_excluded() {
        let device = HotplugDevice {
            devnode: Some("/dev/snd/controlC0".into()),
            devpath: Some("/devices/platform/soc/codec/sound/card0/controlC0".into()),
            ..control_node("add")
        };
        assert_eq!(UsbAudioWatcher::new().classify(&device), None);
    }

    #[test]
    fn other_subsystems_are_excluded() {
        let device = HotplugDevice {
            subsystem: Some("input".into()),
            ..control_node("add")
        };
        assert_eq!(UsbAudioWatcher::new().classify(&device), None);
    }

    #[test]
    fn card_property_fallback() {
        let device = HotplugDevice {
            devnode: Some("/dev/snd/controlC".into()),
            sound_card: Some("3".into()),
            ..control_node("add")
        };
        assert_eq!(
            UsbAudioWatcher::card_identity(&device),
            Some(DeviceIdentity::new("3"))
        );

        let bare = HotplugDevice {
            sound_card: None,
            ..device
        };
        assert_eq!(UsbAudioWatcher::new().classify(&bare), None);
    }

    #[test]
    fn scan_reports_only_usb_control_nodes() {
        let onboard = HotplugDevice {
            action: None,
            devnode: Some("/dev/snd/controlC0".into()),
            devpath: Some("/devices/platform/soc/codec/sound/card0/controlC0".into()),
            ..control_node("add")
        };
        let usb = HotplugDevice {
            action: None,
            ..control_node("add")
        };
        let card_dir = HotplugDevice {
            action: None,
            devnode: None,
            devpath: Some("/devices/platform/soc/5200000.usb/usb1/1-1/1-1:1.0/sound/card1".into()),
            ..control_node("add")
        };

        let events = UsbAudioWatcher::new()
            .scan_attached(&Attached(vec![onboard, card_dir, usb]))
            .unwrap();
        assert_eq!(events, vec![ConnectionEvent::connected(DeviceKind::UsbAudio, "1")]);
    }
}
