pub mod event_source;
pub mod persistence;
pub mod profile_query;
pub mod sink_notifier;
