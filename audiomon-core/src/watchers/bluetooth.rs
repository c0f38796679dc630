//! Bluetooth peer classification.
//!
//! Works on decoded `PropertiesChanged` notifications for BlueZ device
//! objects. A peer is arbitrated only when its `Connected` property flips
//! and it advertises the audio sink profile.

use log::{debug, info, warn};

use crate::models::config::A2DP_SINK_UUID;
use crate::models::device::{ConnectionEvent, DeviceIdentity, DeviceKind};
use crate::traits::event_source::Classifier;
use crate::traits::profile_query::ProfileQuery;

/// Path component that introduces a peer device, e.g. `/org/bluez/hci0/dev_AA_BB_...`.
pub const DEVICE_PATH_MARKER: &str = "dev_";

/// BlueZ interface carrying the `Connected` and `UUIDs` properties.
pub const DEVICE_INTERFACE: &str = "org.bluez.Device1";

/// A property change on a bus object, reduced to what arbitration needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    /// Object path the signal was emitted on.
    pub path: String,
    /// Interface whose properties changed.
    pub interface: String,
    /// New value of `Connected`, if it was part of the change set.
    pub connected: Option<bool>,
}

/// Derive the peer address from a device object path.
///
/// `/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF` becomes `AA:BB:CC:DD:EE:FF`.
/// Returns `None` when the path does not name a peer.
pub fn identity_from_path(path: &str) -> Option<DeviceIdentity> {
    let start = path.find(DEVICE_PATH_MARKER)? + DEVICE_PATH_MARKER.len();
    let encoded = path[start..].split('/').next().unwrap_or_default();
    if encoded.is_empty() {
        return None;
    }
    Some(DeviceIdentity::new(encoded.replace('_', ":")))
}

/// Classifies BlueZ device property changes.
pub struct BluetoothWatcher<Q: ProfileQuery> {
    query: Q,
    profile: String,
}

impl<Q: ProfileQuery> BluetoothWatcher<Q> {
    /// Watch for peers advertising the A2DP sink profile.
    pub fn new(query: Q) -> Self {
        Self::with_profile(query, A2DP_SINK_UUID)
    }

    pub fn with_profile(query: Q, profile: impl Into<String>) -> Self {
        Self {
            query,
            profile: profile.into(),
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn classify(&self, change: &PropertyChange) -> Option<ConnectionEvent> {
        if change.interface != DEVICE_INTERFACE {
            return None;
        }
        let identity = identity_from_path(&change.path)?;
        let connected = change.connected?;

        let profiles = match self.query.profiles(&change.path) {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Dropping {} event for {}: {}", connection_word(connected), identity, e);
                return None;
            }
        };

        if !profiles.iter().any(|p| p.eq_ignore_ascii_case(&self.profile)) {
            info!("Non-audio device {}: {}", connection_word(connected), identity);
            return None;
        }

        debug!("Audio device {}: {}", connection_word(connected), identity);
        Some(ConnectionEvent {
            identity,
            kind: DeviceKind::Bluetooth,
            connected,
        })
    }
}

impl<Q: ProfileQuery> Classifier<PropertyChange> for BluetoothWatcher<Q> {
    fn classify(&mut self, raw: &PropertyChange) -> Option<ConnectionEvent> {
        BluetoothWatcher::classify(self, raw)
    }
}

fn connection_word(connected: bool) -> &'static str {
    if connected {
        "connected"
    } else {
        "disconnected"
    }
}
