//! Workflow run DTOs

use serde::{Deserialize, Serialize};

use super::Page;
use crate::domain::run::Run;

/// Response of `GET /repos/{owner}/{repo}/actions/workflows/{workflow}/runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunsPage {
    pub total_count: u64,
    pub workflow_runs: Vec<Run>,
}

impl Page for WorkflowRunsPage {
    type Item = Run;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<Run> {
        self.workflow_runs
    }
}
