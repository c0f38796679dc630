use std::sync::Arc;

use crate::models::error::StorageError;
use crate::models::state::SinkCategory;

/// Tells the rest of the system which sink category is active.
///
/// Called from the event loop thread after every accepted transition.
pub trait SinkNotifier: Send + Sync {
    fn set_audio_sink(&self, category: SinkCategory) -> Result<(), StorageError>;
}

impl<T: SinkNotifier + ?Sized> SinkNotifier for Arc<T> {
    fn set_audio_sink(&self, category: SinkCategory) -> Result<(), StorageError> {
        (**self).set_audio_sink(category)
    }
}
