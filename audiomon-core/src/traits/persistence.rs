use crate::models::error::StorageError;
use crate::models::state::SinkState;

/// Durable projection of the sink state.
///
/// `apply` must be idempotent and must not report success until the result
/// survives a crash.
pub trait SinkPersistence {
    fn apply(&self, state: &SinkState) -> Result<(), StorageError>;
}
