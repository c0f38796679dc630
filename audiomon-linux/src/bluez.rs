//! BlueZ event source on the system bus.
//!
//! One connection is shared between the signal stream and the per-event
//! `UUIDs` query, so the query runs on the event loop thread and is bounded
//! by its own timeout.

use std::collections::VecDeque;
use std::os::fd::{AsRawFd, RawFd};
use std::rc::Rc;
use std::time::Duration;

use dbus::blocking::stdintf::org_freedesktop_dbus::Properties;
use dbus::blocking::Connection;
use dbus::Message;

use audiomon_core::models::device::ConnectionEvent;
use audiomon_core::models::error::{QueryError, SourceError};
use audiomon_core::traits::event_source::{Classifier, EventSource};
use audiomon_core::traits::profile_query::ProfileQuery;
use audiomon_core::watchers::bluetooth::{BluetoothWatcher, DEVICE_INTERFACE};

use crate::decode::{self, PROPERTIES_CHANGED_RULE};

pub const BLUEZ_SERVICE: &str = "org.bluez";

const UUIDS: &str = "UUIDs";

/// `PropertiesChanged` signals from the system bus.
pub struct BluezSource {
    conn: Rc<Connection>,
    backlog: VecDeque<Message>,
}

impl BluezSource {
    /// Connect to the system bus and subscribe to property changes.
    pub fn connect_system() -> Result<Self, SourceError> {
        let conn = Connection::new_system()
            .map_err(|e| SourceError::Unavailable(format!("failed to connect to system D-Bus: {}", e)))?;
        conn.add_match_no_cb(PROPERTIES_CHANGED_RULE)
            .map_err(|e| SourceError::Unavailable(format!("failed to add match rule: {}", e)))?;
        log::info!("Connected to system D-Bus");
        Ok(Self {
            conn: Rc::new(conn),
            backlog: VecDeque::new(),
        })
    }

    /// A profile query that shares this source's connection.
    pub fn profile_query(&self, timeout: Duration) -> BluezProfileQuery {
        BluezProfileQuery {
            conn: Rc::clone(&self.conn),
            timeout,
        }
    }

    fn drain_queued(&mut self) {
        while let Some(msg) = self.conn.channel().pop_message() {
            self.backlog.push_back(msg);
        }
    }
}

impl AsRawFd for BluezSource {
    fn as_raw_fd(&self) -> RawFd {
        self.conn.channel().watch().fd
    }
}

impl EventSource for BluezSource {
    type Event = Message;

    fn name(&self) -> &str {
        "bluez"
    }

    fn receive(&mut self) -> Result<Option<Message>, SourceError> {
        if let Some(msg) = self.backlog.pop_front() {
            return Ok(Some(msg));
        }
        self.conn
            .channel()
            .read_write(Some(Duration::ZERO))
            .map_err(|()| SourceError::Receive("system D-Bus connection lost".into()))?;
        self.drain_queued();
        Ok(self.backlog.pop_front())
    }

    // Replies to the blocking UUIDs query can leave signals queued inside
    // libdbus without the socket becoming readable again.
    fn has_buffered(&mut self) -> bool {
        self.drain_queued();
        !self.backlog.is_empty()
    }
}

/// `org.freedesktop.DBus.Properties.Get(org.bluez.Device1, UUIDs)`.
pub struct BluezProfileQuery {
    conn: Rc<Connection>,
    timeout: Duration,
}

impl ProfileQuery for BluezProfileQuery {
    fn profiles(&self, device_path: &str) -> Result<Vec<String>, QueryError> {
        let path = dbus::Path::new(device_path)
            .map_err(|e| QueryError::Failed(format!("invalid object path: {}", e)))?;
        let proxy = self.conn.with_proxy(BLUEZ_SERVICE, path, self.timeout);
        proxy
            .get::<Vec<String>>(DEVICE_INTERFACE, UUIDS)
            .map_err(|e| query_error(e.name(), e.message()))
    }
}

/// Map a D-Bus error reply onto the query taxonomy.
fn query_error(name: Option<&str>, message: Option<&str>) -> QueryError {
    let detail = message.unwrap_or("no message").to_string();
    match name {
        Some("org.freedesktop.DBus.Error.NoReply") | Some("org.freedesktop.DBus.Error.Timeout") => {
            QueryError::Timeout
        }
        Some("org.freedesktop.DBus.Error.InvalidArgs") => QueryError::Malformed(detail),
        Some(name) => QueryError::Failed(format!("{}: {}", name, detail)),
        None => QueryError::Failed(detail),
    }
}

/// Decodes bus messages and hands device property changes to the
/// Bluetooth watcher.
pub struct BluezClassifier<Q: ProfileQuery> {
    watcher: BluetoothWatcher<Q>,
}

impl<Q: ProfileQuery> BluezClassifier<Q> {
    pub fn new(watcher: BluetoothWatcher<Q>) -> Self {
        Self { watcher }
    }
}

impl<Q: ProfileQuery> Classifier<Message> for BluezClassifier<Q> {
    fn classify(&mut self, raw: &Message) -> Option<ConnectionEvent> {
        match decode::properties_changed(raw) {
            Ok(Some(change)) => self.watcher.classify(&change),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Ignoring malformed bus message: {}", e);
                None
            }
        }
    }
}
