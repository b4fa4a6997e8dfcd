use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use crate::reporter::ErrorReporter;
use crate::Error;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Reporter that keeps every report for later assertions.
#[derive(Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<(String, &'static str)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(context, error kind)` pairs in report order
    pub fn reports(&self) -> Vec<(String, &'static str)> {
        self.reports.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(
        &self,
        context: &str,
        err: &Error,
    ) {
        self.reports.lock().push((context.to_string(), err.kind()));
    }
}
