use std::fmt;

use serde::{Deserialize, Serialize};

use super::device::{DeviceIdentity, DeviceKind};

/// The currently authoritative audio sink.
///
/// State transitions (last-connected-wins, no fallback stack):
/// ```text
///            connect(bt)            connect(usb)
/// default ─────────────→ bluetooth ←────────────→ usb audio
///    ↑                      │          connect        │
///    └──── disconnect(active) ───────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SinkState {
    #[default]
    Default,
    Bluetooth(DeviceIdentity),
    UsbAudio(DeviceIdentity),
}

impl SinkState {
    pub fn for_device(kind: DeviceKind, identity: DeviceIdentity) -> Self {
        match kind {
            DeviceKind::Bluetooth => Self::Bluetooth(identity),
            DeviceKind::UsbAudio => Self::UsbAudio(identity),
        }
    }

    /// Whether the active sink is exactly the given device.
    pub fn is_active(&self, kind: DeviceKind, identity: &DeviceIdentity) -> bool {
        match self {
            Self::Bluetooth(id) => kind == DeviceKind::Bluetooth && id == identity,
            Self::UsbAudio(id) => kind == DeviceKind::UsbAudio && id == identity,
            Self::Default => false,
        }
    }

    pub fn category(&self) -> SinkCategory {
        match self {
            Self::Default => SinkCategory::Default,
            Self::Bluetooth(_) => SinkCategory::Bluetooth,
            Self::UsbAudio(_) => SinkCategory::UsbDac,
        }
    }
}

impl fmt::Display for SinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Bluetooth(id) => write!(f, "bluetooth {}", id),
            Self::UsbAudio(id) => write!(f, "usb audio card {}", id),
        }
    }
}

/// Sink category reported to the rest of the system. Carries no device payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkCategory {
    Default,
    Bluetooth,
    UsbDac,
}
