//! Instrumentation hooks
//!
//! Evaluation itself never logs. Callers that want visibility pass an
//! `EvalObserver` and report each outcome to it.

use ovalscan_core::Result;
use tracing::{debug, warn};

/// Receives the outcome of evaluating one test against one subject
pub trait EvalObserver: Send + Sync {
    /// Called once per evaluation
    /// `subject` names the record that was evaluated (package or OS)
    fn on_outcome(&self, test_id: &str, subject: &str, outcome: &Result<bool>);
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EvalObserver for NoopObserver {
    fn on_outcome(&self, _test_id: &str, _subject: &str, _outcome: &Result<bool>) {}
}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EvalObserver for TracingObserver {
    fn on_outcome(&self, test_id: &str, subject: &str, outcome: &Result<bool>) {
        match outcome {
            Ok(matched) => debug!(test_id, subject, matched, "test evaluated"),
            Err(e) => warn!(
                test_id,
                subject,
                code = e.code(),
                error = %e,
                "test evaluation failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovalscan_core::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, Option<bool>)>>,
    }

    impl EvalObserver for Recorder {
        fn on_outcome(&self, test_id: &str, _subject: &str, outcome: &Result<bool>) {
            let value = outcome.as_ref().ok().copied();
            self.seen.lock().unwrap().push((test_id.to_string(), value));
        }
    }

    #[test]
    fn test_observer_receives_outcomes() {
        let recorder = Recorder::default();
        let observers: [&dyn EvalObserver; 3] = [&NoopObserver, &TracingObserver, &recorder];

        for observer in observers {
            observer.on_outcome("oval:test:1", "openssl-1.1.1", &Ok(true));
            observer.on_outcome("oval:test:2", "openssl-1.1.1", &Err(Error::EmptyState));
        }

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("oval:test:1".to_string(), Some(true)),
                ("oval:test:2".to_string(), None)
            ]
        );
    }
}
