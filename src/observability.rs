use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminius.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("geminius.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("geminius.client.request_duration_seconds");

pub(crate) static SESSIONS_CREATED: Counter = Counter::new("geminius.session.created");
pub(crate) static SESSION_LINES: Counter = Counter::new("geminius.session.lines");
pub(crate) static SESSION_DROPPED_DISPATCHES: Counter =
    Counter::new("geminius.session.dropped_dispatches");
pub(crate) static SESSION_DUPLICATE_RESPONSES: Counter =
    Counter::new("geminius.session.duplicate_responses");
pub(crate) static SESSION_ORPHANED_RESPONSES: Counter =
    Counter::new("geminius.session.orphaned_responses");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSIONS_CREATED);
    collector.register_counter(&SESSION_LINES);
    collector.register_counter(&SESSION_DROPPED_DISPATCHES);
    collector.register_counter(&SESSION_DUPLICATE_RESPONSES);
    collector.register_counter(&SESSION_ORPHANED_RESPONSES);
}
