use crate::models::error::QueryError;

/// Synchronous lookup of the service profiles a Bluetooth peer advertises.
///
/// Implemented over the system bus by `audiomon-linux`. Calls block the
/// event loop, so implementations must enforce their own timeout.
pub trait ProfileQuery {
    /// Profile UUIDs advertised by the peer at `device_path`.
    fn profiles(&self, device_path: &str) -> Result<Vec<String>, QueryError>;
}
