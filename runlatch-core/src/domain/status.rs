//! Status and conclusion values shared by runs, jobs and steps

use serde::{Deserialize, Serialize};

/// Lifecycle status of a run, job or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Requested,
    Queued,
    Pending,
    Waiting,
    InProgress,
    Completed,
    ActionRequired,

    /// Any value this crate does not know about yet
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// The statuses of runs that may still hold the queue.
    ///
    /// These are the subsets the run listing is fanned out over.
    pub const ACTIVE: [RunStatus; 3] = [Self::InProgress, Self::Queued, Self::Waiting];

    /// Query-string form used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Requested => "requested",
            RunStatus::Queued => "queued",
            RunStatus::Pending => "pending",
            RunStatus::Waiting => "waiting",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::ActionRequired => "action_required",
            RunStatus::Unknown => "unknown",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a completed run, job or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Neutral,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,

    #[serde(other)]
    Unknown,
}
