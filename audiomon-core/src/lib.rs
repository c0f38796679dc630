//! # audiomon-core
//!
//! Platform-agnostic audio sink arbitration core.
//!
//! Classifies Bluetooth and USB audio hotplug events, decides which device is
//! the default audio sink, and persists that decision as an `.asoundrc` plus a
//! settings record. Platform backends (the Linux D-Bus and udev sources in
//! `audiomon-linux`) implement `EventSource` and plug into the generic
//! `EventLoop`.
//!
//! ## Architecture
//!
//! ```text
//! audiomon-core (this crate)
//! ├── traits/    ← EventSource, Classifier, Channel, ProfileQuery, SinkPersistence, SinkNotifier
//! ├── models/    ← ConnectionEvent, SinkState, DaemonConfig, errors
//! ├── watchers/  ← BluetoothWatcher, UsbAudioWatcher (classification)
//! ├── session/   ← SinkArbiter, Poller, EventLoop, CancellationToken
//! └── storage/   ← AsoundrcWriter, JsonSettingsStore, durable file ops
//! ```

pub mod models;
pub mod session;
pub mod storage;
pub mod traits;
pub mod watchers;

// Re-export key types at crate root for convenience.
pub use models::config::{DaemonConfig, A2DP_SINK_UUID};
pub use models::device::{ConnectionEvent, DeviceIdentity, DeviceKind};
pub use models::error::{ConfigError, QueryError, SourceError, StorageError};
pub use models::state::{SinkCategory, SinkState};
pub use session::arbiter::{SinkArbiter, Transition};
pub use session::cancel::CancellationToken;
pub use session::event_loop::EventLoop;
pub use session::poller::{Poller, Readiness};
pub use storage::asoundrc::AsoundrcWriter;
pub use storage::settings::{JsonSettingsStore, SinkSettings};
pub use traits::event_source::{Channel, Classifier, EventSource, Route};
pub use traits::persistence::SinkPersistence;
pub use traits::profile_query::ProfileQuery;
pub use traits::sink_notifier::SinkNotifier;
pub use watchers::bluetooth::{BluetoothWatcher, PropertyChange};
pub use watchers::usb_audio::{HotplugDevice, HotplugEnumerator, UsbAudioWatcher};
