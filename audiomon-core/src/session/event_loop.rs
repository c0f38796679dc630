use std::time::Duration;

use log::{debug, error, info};

use super::arbiter::{SinkArbiter, Transition};
use super::cancel::CancellationToken;
use super::poller::{Poller, Readiness};
use crate::models::error::SourceError;
use crate::traits::event_source::Channel;
use crate::traits::persistence::SinkPersistence;
use crate::traits::sink_notifier::SinkNotifier;

/// Single-threaded driver: waits on every channel at once, then handles at
/// most one event per ready channel, in registration order, before waiting
/// again.
///
/// ```text
/// [Bus Source]    → [Bluetooth Classifier] ─┐
///                                            ├→ [SinkArbiter] → [.asoundrc] + [notifier]
/// [Hotplug Source] → [USB Classifier] ──────┘
/// ```
pub struct EventLoop<P: SinkPersistence, N: SinkNotifier> {
    channels: Vec<Box<dyn Channel>>,
    poller: Poller,
    arbiter: SinkArbiter<P, N>,
    wait_timeout: Duration,
    cancel: CancellationToken,
}

impl<P: SinkPersistence, N: SinkNotifier> EventLoop<P, N> {
    pub fn new(
        channels: Vec<Box<dyn Channel>>,
        arbiter: SinkArbiter<P, N>,
        wait_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let poller = Poller::new(channels.iter().map(|c| c.raw_fd()));
        Self {
            channels,
            poller,
            arbiter,
            wait_timeout,
            cancel,
        }
    }

    pub fn arbiter(&self) -> &SinkArbiter<P, N> {
        &self.arbiter
    }

    /// Run until cancelled.
    ///
    /// Returns an error only when the wait itself fails or a source is lost;
    /// per-event problems are logged and skipped inside the classifiers.
    pub fn run(&mut self) -> Result<(), SourceError> {
        info!("Monitoring {} event source(s)", self.channels.len());
        while !self.cancel.is_cancelled() {
            self.run_once()?;
        }
        info!("Cancellation requested, stopping event loop");
        Ok(())
    }

    /// One wait plus dispatch. Returns the arbiter transitions it produced.
    pub fn run_once(&mut self) -> Result<Vec<Transition>, SourceError> {
        let buffered: Vec<usize> = self
            .channels
            .iter_mut()
            .enumerate()
            .filter_map(|(i, c)| c.has_buffered().then_some(i))
            .collect();
        let timeout = if buffered.is_empty() {
            self.wait_timeout
        } else {
            Duration::ZERO
        };

        let mut ready = self.poller.wait(timeout)?;
        for index in buffered {
            if !ready.iter().any(|(i, _)| *i == index) {
                ready.push((index, Readiness::Readable));
            }
        }
        ready.sort_by_key(|(i, _)| *i);
        let mut transitions = Vec::new();

        for (index, readiness) in ready {
            let channel = &mut self.channels[index];
            if readiness == Readiness::Closed {
                error!("Event source {} closed", channel.name());
                return Err(SourceError::Unavailable(channel.name().to_string()));
            }

            match channel.dispatch() {
                Ok(Some(event)) => {
                    debug!("{} event: {:?}", channel.name(), event);
                    transitions.push(self.arbiter.handle(&event));
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Event source {} failed: {}", channel.name(), e);
                    return Err(e);
                }
            }
        }
        Ok(transitions)
    }
}
