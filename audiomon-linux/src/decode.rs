//! Typed decoding of BlueZ property-change signals.

use dbus::arg::{prop_cast, PropMap};
use dbus::message::MessageType;
use dbus::Message;
use thiserror::Error;

use audiomon_core::watchers::bluetooth::PropertyChange;

pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";
pub const PROPERTIES_CHANGED: &str = "PropertiesChanged";

/// Match rule for every `PropertiesChanged` signal on the bus.
pub const PROPERTIES_CHANGED_RULE: &str =
    "type='signal',interface='org.freedesktop.DBus.Properties',member='PropertiesChanged'";

const CONNECTED: &str = "Connected";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("signal has no object path")]
    MissingPath,

    #[error("unexpected signal arguments: {0}")]
    Arguments(String),

    #[error("property {0} has an unexpected type")]
    PropertyType(&'static str),
}

/// Decode a `PropertiesChanged` signal.
///
/// Returns `Ok(None)` for any other message; the signal body is
/// `(s interface, a{sv} changed, as invalidated)`.
pub fn properties_changed(msg: &Message) -> Result<Option<PropertyChange>, DecodeError> {
    if msg.msg_type() != MessageType::Signal
        || msg.interface().as_deref() != Some(PROPERTIES_INTERFACE)
        || msg.member().as_deref() != Some(PROPERTIES_CHANGED)
    {
        return Ok(None);
    }

    let path = msg.path().ok_or(DecodeError::MissingPath)?;
    let path = String::from(&*path);
    let (interface, changed) = msg
        .read2::<String, PropMap>()
        .map_err(|e| DecodeError::Arguments(e.to_string()))?;

    let connected = match changed.get(CONNECTED) {
        None => None,
        Some(_) => Some(
            *prop_cast::<bool>(&changed, CONNECTED).ok_or(DecodeError::PropertyType(CONNECTED))?,
        ),
    };

    Ok(Some(PropertyChange {
        path,
        interface,
        connected,
    }))
}
