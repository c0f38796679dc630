use std::io;

use log::{info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use thiserror::Error;

use audiomon_core::{
    AsoundrcWriter, BluetoothWatcher, CancellationToken, Channel, ConfigError, DaemonConfig,
    EventLoop, JsonSettingsStore, Route, SinkArbiter, SourceError, UsbAudioWatcher,
};
use audiomon_linux::{BluezClassifier, BluezSource, UdevEnumerator, UdevSource};

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to install signal handler: {0}")]
    Signal(io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Wire the sources to the arbiter and run until SIGINT/SIGTERM.
pub fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    config.validate()?;

    let cancel = CancellationToken::new();
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, cancel.flag()).map_err(DaemonError::Signal)?;
    }

    let mut arbiter = SinkArbiter::new(
        AsoundrcWriter::new(&config.artifact_path),
        JsonSettingsStore::new(&config.settings_path),
    );
    // updated as soon as something connects
    arbiter.announce_default();

    let bus = BluezSource::connect_system()?;
    let query = bus.profile_query(config.bus_timeout);
    let bluetooth = Route::new(
        bus,
        BluezClassifier::new(BluetoothWatcher::with_profile(query, &config.a2dp_uuid)),
    );

    // Monitor first, then scan, so a card plugged in between is not missed.
    let hotplug = UdevSource::open()?;
    let usb = UsbAudioWatcher::new();
    if config.rescan_usb_on_start {
        match usb.scan_attached(&UdevEnumerator) {
            Ok(events) => {
                for event in &events {
                    arbiter.handle(event);
                }
            }
            Err(e) => warn!("Startup USB audio scan failed: {}", e),
        }
    }

    let channels: Vec<Box<dyn Channel>> = vec![Box::new(bluetooth), Box::new(Route::new(hotplug, usb))];
    info!("Monitoring for Bluetooth and USB audio device events");

    let mut event_loop = EventLoop::new(channels, arbiter, config.wait_timeout, cancel);
    event_loop.run()?;
    Ok(())
}
