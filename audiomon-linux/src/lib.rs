//! # audiomon-linux
//!
//! Linux backends for audiomon.
//!
//! Provides:
//! - `BluezSource` — `PropertiesChanged` signals from the system D-Bus
//! - `BluezProfileQuery` — synchronous `UUIDs` lookup on a peer device
//! - `BluezClassifier` — decodes bus messages for the Bluetooth watcher
//! - `UdevSource` / `UdevEnumerator` — sound subsystem hotplug and startup scan
//!
//! ## Platform Requirements
//! - libdbus-1 and libudev at build and run time
//! - BlueZ 5 (`org.bluez.Device1`) on the system bus
//!
//! ## Usage
//! ```ignore
//! use audiomon_core::{BluetoothWatcher, Route, UsbAudioWatcher};
//! use audiomon_linux::{BluezClassifier, BluezSource, UdevSource};
//!
//! let bus = BluezSource::connect_system()?;
//! let query = bus.profile_query(std::time::Duration::from_secs(1));
//! let bluetooth = Route::new(bus, BluezClassifier::new(BluetoothWatcher::new(query)));
//! let usb = Route::new(UdevSource::open()?, UsbAudioWatcher::new());
//! ```

#[cfg(target_os = "linux")]
pub mod bluez;
#[cfg(target_os = "linux")]
pub mod decode;
#[cfg(target_os = "linux")]
pub mod udev_source;

#[cfg(target_os = "linux")]
pub use bluez::{BluezClassifier, BluezProfileQuery, BluezSource};
#[cfg(target_os = "linux")]
pub use decode::DecodeError;
#[cfg(target_os = "linux")]
pub use udev_source::{UdevEnumerator, UdevSource};
