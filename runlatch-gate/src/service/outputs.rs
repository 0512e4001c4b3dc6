//! Step output service
//!
//! The gate reports its outcome to later steps of the job through named
//! outputs. On the platform these are `name=value` lines appended to the file
//! named by `GITHUB_OUTPUT`; outside of it they are printed to stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Set when a continue-after threshold cut the wait short
pub const FORCE_CONTINUED: &str = "force_continued";

/// Seconds spent waiting
pub const WAITED_SECONDS: &str = "waited_seconds";

/// Receives the gate's named outputs
pub trait OutputSink: Send + Sync {
    /// Sets an output, replacing any earlier value for the same name
    fn set_output(&self, name: &str, value: &str) -> io::Result<()>;
}

/// Writes outputs the way the platform's runner reads them
#[derive(Debug, Clone)]
pub struct ActionOutputs {
    path: Option<PathBuf>,
}

impl ActionOutputs {
    /// Creates a sink appending to `path`, or printing to stdout when `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl OutputSink for ActionOutputs {
    fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        debug!("Setting output {}={:?}", name, value);

        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}={}", name, value)
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}={}", name, value)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_are_appended_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        let sink = ActionOutputs::new(Some(path.clone()));
        sink.set_output(FORCE_CONTINUED, "true").unwrap();
        sink.set_output(WAITED_SECONDS, "120").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "earlier=1\nforce_continued=true\nwaited_seconds=120\n");
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh");

        ActionOutputs::new(Some(path.clone()))
            .set_output(FORCE_CONTINUED, "")
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "force_continued=\n");
    }

    #[test]
    fn test_stdout_sink() {
        assert!(ActionOutputs::new(None).set_output(WAITED_SECONDS, "0").is_ok());
    }
}
