use std::fmt;

use serde::{Deserialize, Serialize};

/// Source-specific key for a physical audio endpoint.
///
/// A normalized hardware address (`AA:BB:CC:DD:EE:FF`) for Bluetooth peers,
/// a decimal card index (`"1"`) for USB audio adapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceIdentity {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceIdentity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which watcher produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Bluetooth,
    UsbAudio,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bluetooth => f.write_str("bluetooth"),
            Self::UsbAudio => f.write_str("usb audio"),
        }
    }
}

/// A normalized attach/detach notification for an audio-capable endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub identity: DeviceIdentity,
    pub kind: DeviceKind,
    pub connected: bool,
}

impl ConnectionEvent {
    pub fn connected(kind: DeviceKind, identity: impl Into<DeviceIdentity>) -> Self {
        Self {
            identity: identity.into(),
            kind,
            connected: true,
        }
    }

    pub fn disconnected(kind: DeviceKind, identity: impl Into<DeviceIdentity>) -> Self {
        Self {
            identity: identity.into(),
            kind,
            connected: false,
        }
    }
}
