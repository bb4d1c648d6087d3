use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("anura.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("anura.client.request_errors");
pub(crate) static CLIENT_STATUS_ERRORS: Counter = Counter::new("anura.client.status_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("anura.client.request_duration_seconds");

pub(crate) static STREAM_LINES: Counter = Counter::new("anura.stream.lines");
pub(crate) static STREAM_EVENTS: Counter = Counter::new("anura.stream.events");
pub(crate) static STREAM_CHUNKS: Counter = Counter::new("anura.stream.chunks");
pub(crate) static STREAM_JOB_IDS: Counter = Counter::new("anura.stream.job_ids");
pub(crate) static STREAM_SKIPPED_LINES: Counter = Counter::new("anura.stream.skipped_lines");
pub(crate) static STREAM_READ_ERRORS: Counter = Counter::new("anura.stream.read_errors");
pub(crate) static STREAM_DURATION: Moments = Moments::new("anura.stream.duration_seconds");

pub(crate) static MODELS_LISTED: Counter = Counter::new("anura.models.listed");
pub(crate) static MODELS_DECODE_ERRORS: Counter = Counter::new("anura.models.decode_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_STATUS_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_LINES);
    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_JOB_IDS);
    collector.register_counter(&STREAM_SKIPPED_LINES);
    collector.register_counter(&STREAM_READ_ERRORS);
    collector.register_moments(&STREAM_DURATION);

    collector.register_counter(&MODELS_LISTED);
    collector.register_counter(&MODELS_DECODE_ERRORS);
}
