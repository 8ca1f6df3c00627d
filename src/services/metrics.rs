use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};

lazy_static! {
    pub static ref SHIFT_SERIES_COUNTER: CounterVec = register_counter_vec!(
        "api_shift_series_created_total",
        "Shift patterns expanded and persisted, by recurrence frequency",
        &["frequency"]
    ).unwrap();

    pub static ref SHIFT_OCCURRENCES_COUNTER: Counter = register_counter!(
        "api_shift_occurrences_created_total",
        "Shift occurrences persisted"
    ).unwrap();

    pub static ref SHIFT_REJECTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_shift_rejections_total",
        "Shift creations rejected before persistence, by reason",
        &["reason"]
    ).unwrap();

    pub static ref SHIFT_DELETIONS_COUNTER: Counter = register_counter!(
        "api_shift_deletions_total",
        "Shift occurrences deleted"
    ).unwrap();

    pub static ref STORE_FAILURES_COUNTER: CounterVec = register_counter_vec!(
        "api_shift_store_failures_total",
        "Failed calls to the shift store, by operation",
        &["operation"]
    ).unwrap();
}
