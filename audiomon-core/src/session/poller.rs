//! Level-triggered readiness wait over a set of descriptors.
//!
//! Level triggering matters: the event loop drains a single event per ready
//! source per iteration, so anything left queued must wake the next wait.

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// Readiness reported for one registered descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Readable,
    /// Peer hung up or the descriptor is no longer valid.
    Closed,
}

pub struct Poller {
    fds: Vec<libc::pollfd>,
}

impl Poller {
    pub fn new(fds: impl IntoIterator<Item = RawFd>) -> Self {
        Self {
            fds: fds
                .into_iter()
                .map(|fd| libc::pollfd {
                    fd,
                    events: libc::POLLIN,
                    revents: 0,
                })
                .collect(),
        }
    }

    /// Block until a descriptor is ready or `timeout` elapses.
    ///
    /// Returns `(index, readiness)` pairs in registration order; empty on
    /// timeout or when the wait was interrupted by a signal.
    pub fn wait(&mut self, timeout: Duration) -> io::Result<Vec<(usize, Readiness)>> {
        for pfd in &mut self.fds {
            pfd.revents = 0;
        }
        let timeout_ms = timeout_millis(timeout);

        // SAFETY: `fds` is a live, correctly sized array of pollfd for the
        // duration of the call.
        let rc = unsafe {
            libc::poll(
                self.fds.as_mut_ptr(),
                self.fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(err);
        }

        Ok(self
            .fds
            .iter()
            .enumerate()
            .filter_map(|(i, pfd)| {
                if pfd.revents & libc::POLLIN != 0 {
                    Some((i, Readiness::Readable))
                } else if pfd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
                    Some((i, Readiness::Closed))
                } else {
                    None
                }
            })
            .collect())
    }
}

/// Whole milliseconds for `poll(2)`, rounded up so a sub-millisecond wait
/// still blocks instead of returning immediately.
fn timeout_millis(timeout: Duration) -> libc::c_int {
    let mut ms = timeout.as_millis();
    if timeout.subsec_nanos() % 1_000_000 != 0 {
        ms += 1;
    }
    ms.min(libc::c_int::MAX as u128) as libc::c_int
}
