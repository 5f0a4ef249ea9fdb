//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sift_schema::Predicate;

/// Install a test-writer subscriber once per binary. Set `RUST_LOG=sift=trace`
/// (or `debug`) to see rule compilation and per-property outcomes.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A predicate that returns `result` and counts its invocations.
pub fn stub(result: bool) -> (Predicate, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let predicate = Predicate::new(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        result
    });
    (predicate, calls)
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
