//! udev hotplug source for the sound subsystem.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::os::fd::{AsRawFd, RawFd};

use audiomon_core::models::error::SourceError;
use audiomon_core::traits::event_source::EventSource;
use audiomon_core::watchers::usb_audio::{
    HotplugDevice, HotplugEnumerator, SOUND_CARD_PROPERTY, SOUND_SUBSYSTEM,
};

/// Netlink group a monitor listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NetlinkGroup {
    /// Raw uevents straight from the kernel; needs no udev daemon.
    Kernel,
    /// Events rebroadcast by udevd after rule processing.
    Udev,
}

impl fmt::Display for NetlinkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kernel => f.write_str("kernel"),
            Self::Udev => f.write_str("udev"),
        }
    }
}

/// Sound subsystem add/remove notifications from a udev monitor.
pub struct UdevSource {
    socket: udev::MonitorSocket,
}

impl UdevSource {
    /// Listen on the kernel group, falling back to the udev group when the
    /// kernel monitor cannot be created.
    pub fn open() -> Result<Self, SourceError> {
        let (socket, group) = open_with_fallback(
            || listen(udev::MonitorBuilder::new_kernel()),
            || listen(udev::MonitorBuilder::new()),
        )?;
        log::info!(
            "Listening for {} hotplug events on the {} netlink group",
            SOUND_SUBSYSTEM,
            group
        );
        Ok(Self { socket })
    }
}

fn listen(builder: io::Result<udev::MonitorBuilder>) -> io::Result<udev::MonitorSocket> {
    builder
        .and_then(|builder| builder.match_subsystem(SOUND_SUBSYSTEM))
        .and_then(|builder| builder.listen())
}

fn open_with_fallback<T>(
    kernel: impl FnOnce() -> io::Result<T>,
    udev: impl FnOnce() -> io::Result<T>,
) -> Result<(T, NetlinkGroup), SourceError> {
    match kernel() {
        Ok(socket) => Ok((socket, NetlinkGroup::Kernel)),
        Err(e) => {
            log::warn!("Kernel uevent monitor unavailable ({}), trying udev", e);
            udev()
                .map(|socket| (socket, NetlinkGroup::Udev))
                .map_err(|e| unavailable("failed to create udev monitor", e))
        }
    }
}

impl AsRawFd for UdevSource {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

impl EventSource for UdevSource {
    type Event = HotplugDevice;

    fn name(&self) -> &str {
        "udev"
    }

    fn receive(&mut self) -> Result<Option<HotplugDevice>, SourceError> {
        Ok(self.socket.iter().next().map(|event| snapshot(&event.device())))
    }
}

/// One-shot enumeration of the sound subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdevEnumerator;

impl HotplugEnumerator for UdevEnumerator {
    fn attached(&self) -> Result<Vec<HotplugDevice>, SourceError> {
        let mut enumerator =
            udev::Enumerator::new().map_err(|e| unavailable("failed to create udev enumerator", e))?;
        enumerator
            .match_subsystem(SOUND_SUBSYSTEM)
            .map_err(|e| unavailable("failed to filter udev enumerator", e))?;
        let devices = enumerator
            .scan_devices()
            .map_err(|e| unavailable("failed to scan devices", e))?;
        Ok(devices.map(|device| snapshot(&device)).collect())
    }
}

fn snapshot(device: &udev::Device) -> HotplugDevice {
    HotplugDevice {
        action: device.action().map(lossy),
        subsystem: device.subsystem().map(lossy),
        devnode: device.devnode().map(|node| node.to_string_lossy().into_owned()),
        devpath: Some(lossy(device.devpath())),
        sound_card: device.property_value(SOUND_CARD_PROPERTY).map(lossy),
    }
}

fn lossy(value: &OsStr) -> String {
    value.to_string_lossy().into_owned()
}

fn unavailable(context: &str, e: io::Error) -> SourceError {
    SourceError::Unavailable(format!("{}: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_kernel_group() {
        let (socket, group) = open_with_fallback(|| Ok("kernel"), || Ok("udev")).unwrap();
        assert_eq!((socket, group), ("kernel", NetlinkGroup::Kernel));
    }

    #[test]
    fn falls_back_to_the_udev_group() {
        let (socket, group) = open_with_fallback(
            || Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            || Ok("udev"),
        )
        .unwrap();
        assert_eq!((socket, group), ("udev", NetlinkGroup::Udev));
    }

    #[test]
    fn fails_when_neither_group_opens() {
        let result: Result<((), NetlinkGroup), _> = open_with_fallback(
            || Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            || Err(io::Error::from(io::ErrorKind::NotFound)),
        );
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
