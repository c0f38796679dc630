use std::os::fd::{AsRawFd, RawFd};

use crate::models::device::ConnectionEvent;
use crate::models::error::SourceError;

/// A waitable hotplug or bus channel.
///
/// The raw descriptor is handed to the poller; once it reports readiness,
/// `receive` returns the next event without blocking, or `None` if the
/// wakeup was spurious. Each call drains at most one event.
pub trait EventSource: AsRawFd {
    /// Raw notification type delivered by this source.
    type Event;

    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn receive(&mut self) -> Result<Option<Self::Event>, SourceError>;

    /// Whether events are already buffered in user space, where the
    /// descriptor will not signal them.
    fn has_buffered(&mut self) -> bool {
        false
    }
}

/// Maps a source's raw notification onto a normalized connection event.
///
/// Irrelevant or malformed input yields `None`; classification never fails
/// the caller.
pub trait Classifier<E> {
    fn classify(&mut self, raw: &E) -> Option<ConnectionEvent>;
}

/// Object-safe view of a source paired with its classifier, so sources with
/// different raw event types can share one wait.
pub trait Channel {
    fn name(&self) -> &str;

    fn raw_fd(&self) -> RawFd;

    fn has_buffered(&mut self) -> bool;

    /// Receive one raw event and classify it.
    fn dispatch(&mut self) -> Result<Option<ConnectionEvent>, SourceError>;
}

/// A source routed to the classifier that owns its events.
pub struct Route<S, C> {
    source: S,
    classifier: C,
}

impl<S, C> Route<S, C>
where
    S: EventSource,
    C: Classifier<S::Event>,
{
    pub fn new(source: S, classifier: C) -> Self {
        Self { source, classifier }
    }
}

impl<S, C> Channel for Route<S, C>
where
    S: EventSource,
    C: Classifier<S::Event>,
{
    fn name(&self) -> &str {
        self.source.name()
    }

    fn raw_fd(&self) -> RawFd {
        self.source.as_raw_fd()
    }

    fn has_buffered(&mut self) -> bool {
        self.source.has_buffered()
    }

    fn dispatch(&mut self) -> Result<Option<ConnectionEvent>, SourceError> {
        match self.source.receive()? {
            Some(raw) => Ok(self.classifier.classify(&raw)),
            None => Ok(None),
        }
    }
}
