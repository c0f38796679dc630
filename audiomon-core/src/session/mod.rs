pub mod arbiter;
pub mod cancel;
pub mod event_loop;
pub mod poller;
