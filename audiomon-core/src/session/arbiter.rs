use log::{error, info};

use crate::models::device::ConnectionEvent;
use crate::models::state::{SinkCategory, SinkState};
use crate::traits::persistence::SinkPersistence;
use crate::traits::sink_notifier::SinkNotifier;

/// Outcome of feeding one event to the arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The active sink changed and was persisted.
    Changed { from: SinkState, to: SinkState },
    /// A connect for the sink that was already active; re-persisted.
    Reasserted(SinkState),
    /// A disconnect for a device that was not the active sink.
    Ignored,
}

/// Decides which sink is authoritative.
///
/// Policy:
/// - a connect always wins, whatever was active before;
/// - a disconnect falls back to `Default` only when it names the active sink.
///
/// Persistence and notification failures are logged; the in-memory state
/// reflects the decision regardless and the next accepted event retries.
pub struct SinkArbiter<P: SinkPersistence, N: SinkNotifier> {
    state: SinkState,
    persistence: P,
    notifier: N,
}

impl<P: SinkPersistence, N: SinkNotifier> SinkArbiter<P, N> {
    pub fn new(persistence: P, notifier: N) -> Self {
        Self {
            state: SinkState::Default,
            persistence,
            notifier,
        }
    }

    pub fn state(&self) -> &SinkState {
        &self.state
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Announce the default sink before any device has been seen.
    ///
    /// The artifact is left untouched: it is the only record of the last
    /// routing, and the startup scan overwrites it if a card is present.
    pub fn announce_default(&self) {
        self.notify(SinkCategory::Default);
    }

    pub fn handle(&mut self, event: &ConnectionEvent) -> Transition {
        if event.connected {
            let next = SinkState::for_device(event.kind, event.identity.clone());
            if next == self.state {
                info!("Audio sink {} reasserted", next);
                self.commit();
                return Transition::Reasserted(next);
            }
            let from = std::mem::replace(&mut self.state, next);
            info!("Audio sink changed: {} -> {}", from, self.state);
            self.commit();
            return Transition::Changed {
                from,
                to: self.state.clone(),
            };
        }

        if !self.state.is_active(event.kind, &event.identity) {
            info!(
                "Ignoring disconnect of inactive {} device {} (active: {})",
                event.kind, event.identity, self.state
            );
            return Transition::Ignored;
        }

        let from = std::mem::take(&mut self.state);
        info!("Audio sink {} disconnected, falling back to default", from);
        self.commit();
        Transition::Changed {
            from,
            to: SinkState::Default,
        }
    }

    fn commit(&self) {
        if let Err(e) = self.persistence.apply(&self.state) {
            error!("Failed to persist audio sink {}: {}", self.state, e);
        }
        self.notify(self.state.category());
    }

    fn notify(&self, category: SinkCategory) {
        if let Err(e) = self.notifier.set_audio_sink(category) {
            error!("Failed to publish audio sink {:?}: {}", category, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    use parking_lot::Mutex;

    use super::*;
    use crate::models::device::DeviceKind;
    use crate::models::error::StorageError;

    #[derive(Default)]
    struct MemoryArtifact {
        applied: RefCell<Vec<SinkState>>,
        fail: bool,
    }

    impl SinkPersistence for MemoryArtifact {
        fn apply(&self, state: &SinkState) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Write {
                    path: PathBuf::from("/read-only/.asoundrc"),
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                });
            }
            self.applied.borrow_mut().push(state.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<SinkCategory>>,
    }

    impl SinkNotifier for RecordingNotifier {
        fn set_audio_sink(&self, category: SinkCategory) -> Result<(), StorageError> {
            self.calls.lock().push(category);
            Ok(())
        }
    }

    fn arbiter() -> SinkArbiter<MemoryArtifact, RecordingNotifier> {
        SinkArbiter::new(MemoryArtifact::default(), RecordingNotifier::default())
    }

    fn bt(mac: &str, connected: bool) -> ConnectionEvent {
        ConnectionEvent {
            identity: mac.into(),
            kind: DeviceKind::Bluetooth,
            connected,
        }
    }

    fn usb(card: &str, connected: bool) -> ConnectionEvent {
        ConnectionEvent {
            identity: card.into(),
            kind: DeviceKind::UsbAudio,
            connected,
        }
    }

    #[test]
    fn starts_at_default() {
        let arbiter = arbiter();
        assert_eq!(arbiter.state(), &SinkState::Default);
        arbiter.announce_default();
        assert_eq!(*arbiter.notifier().calls.lock(), vec![SinkCategory::Default]);
        assert!(arbiter.persistence().applied.borrow().is_empty());
    }

    #[test]
    fn last_connect_wins() {
        let mut arbiter = arbiter();
        let sequence = [
            usb("1", true),
            bt("AA:BB:CC:DD:EE:FF", true),
            usb("2", true),
            bt("11:22:33:44:55:66", true),
        ];
        for event in &sequence {
            arbiter.handle(event);
        }
        assert_eq!(arbiter.state(), &SinkState::Bluetooth("11:22:33:44:55:66".into()));
        assert_eq!(arbiter.persistence().applied.borrow().len(), sequence.len());
    }

    #[test]
    fn disconnect_of_inactive_device_is_noop() {
        let mut arbiter = arbiter();
        arbiter.handle(&bt("AA:BB:CC:DD:EE:FF", true));

        assert_eq!(arbiter.handle(&usb("1", false)), Transition::Ignored);
        assert_eq!(arbiter.handle(&bt("11:22:33:44:55:66", false)), Transition::Ignored);
        // same identity string, different kind
        assert_eq!(arbiter.handle(&usb("AA:BB:CC:DD:EE:FF", false)), Transition::Ignored);

        assert_eq!(arbiter.state(), &SinkState::Bluetooth("AA:BB:CC:DD:EE:FF".into()));
        assert_eq!(arbiter.persistence().applied.borrow().len(), 1);
        assert_eq!(arbiter.notifier().calls.lock().len(), 1);
    }

    #[test]
    fn disconnect_of_active_device_falls_back_to_default() {
        let mut arbiter = arbiter();
        arbiter.handle(&usb("1", true));
        arbiter.handle(&bt("AA:BB:CC:DD:EE:FF", true));

        let transition = arbiter.handle(&bt("AA:BB:CC:DD:EE:FF", false));
        assert_eq!(
            transition,
            Transition::Changed {
                from: SinkState::Bluetooth("AA:BB:CC:DD:EE:FF".into()),
                to: SinkState::Default,
            }
        );
        // no fallback to the still-attached USB card
        assert_eq!(arbiter.state(), &SinkState::Default);
        assert_eq!(
            *arbiter.notifier().calls.lock(),
            vec![SinkCategory::UsbDac, SinkCategory::Bluetooth, SinkCategory::Default]
        );
    }

    #[test]
    fn duplicate_connect_is_reasserted() {
        let mut arbiter = arbiter();
        arbiter.handle(&usb("1", true));
        assert_eq!(
            arbiter.handle(&usb("1", true)),
            Transition::Reasserted(SinkState::UsbAudio("1".into()))
        );
        assert_eq!(arbiter.persistence().applied.borrow().len(), 2);
    }

    #[test]
    fn persistence_failure_still_updates_state() {
        let mut arbiter = SinkArbiter::new(
            MemoryArtifact {
                fail: true,
                ..Default::default()
            },
            RecordingNotifier::default(),
        );

        arbiter.handle(&usb("1", true));
        assert_eq!(arbiter.state(), &SinkState::UsbAudio("1".into()));
        assert_eq!(*arbiter.notifier().calls.lock(), vec![SinkCategory::UsbDac]);
    }
}
