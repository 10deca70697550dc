//! Metrics declaration and recording.

use lazy_static::lazy_static;

lazy_static! {
    /// Track number of request bodies buffered for form or JSON arguments.
    pub static ref BODY_READS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "reqargs_body_reads_total",
            "Total number of request bodies buffered for argument parsing."
        );
        "reqargs_body_reads_total"
    };
    /// Histogram of buffered body sizes.
    pub static ref BODY_SIZE_BYTES: &'static str = {
        metrics::describe_histogram!(
            "reqargs_body_size_bytes",
            metrics::Unit::Bytes,
            "Size of request bodies buffered for argument parsing."
        );
        "reqargs_body_size_bytes"
    };
    /// Track number of validation error responses, by status.
    pub static ref VALIDATION_ERRORS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "reqargs_validation_errors_total",
            "Total number of validation error responses."
        );
        "reqargs_validation_errors_total"
    };
}

pub(crate) fn record_body_read(len: usize) {
    metrics::counter!(*BODY_READS_TOTAL).increment(1);
    metrics::histogram!(*BODY_SIZE_BYTES).record(len as f64);
}

pub(crate) fn record_validation_error(status: u16) {
    metrics::counter!(*VALIDATION_ERRORS_TOTAL, "status" => status.to_string()).increment(1);
}
