use tracing::{error, info, warn};

/// Sink for the progress and per-file messages produced while building a dataset.
pub trait Reporter {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards everything to the global `tracing` subscriber installed in `main`.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

#[cfg(test)]
pub mod testing {
    use super::Reporter;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Level {
        Info,
        Warn,
        Error,
    }

    /// Keeps every reported line in memory so tests can assert on them.
    #[derive(Default)]
    pub struct RecordingReporter {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl RecordingReporter {
        pub fn lines(&self) -> Vec<(Level, String)> {
            self.lines.lock().unwrap().clone()
        }

        pub fn count(&self, level: Level) -> usize {
            self.lines().iter().filter(|(l, _)| *l == level).count()
        }

        fn push(&self, level: Level, message: &str) {
            self.lines.lock().unwrap().push((level, message.to_string()));
        }
    }

    impl Reporter for RecordingReporter {
        fn info(&self, message: &str) {
            self.push(Level::Info, message);
        }

        fn warn(&self, message: &str) {
            self.push(Level::Warn, message);
        }

        fn error(&self, message: &str) {
            self.push(Level::Error, message);
        }
    }
}
