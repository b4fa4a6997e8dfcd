//! Error-observation sink for failed passes and dropped notifications.
//!
//! Nothing reported here is fatal; operators watch this stream and the
//! converging operator config to judge health.

#[cfg(test)]
use mockall::automock;
use tracing::error;

use crate::Error;

#[cfg_attr(test, automock)]
pub trait ErrorReporter: Send + Sync {
    fn report(
        &self,
        context: &str,
        err: &Error,
    );
}

/// Default sink: logs every report at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(
        &self,
        context: &str,
        err: &Error,
    ) {
        error!(kind = err.kind(), "{} failed with : {}", context, err);
    }
}
