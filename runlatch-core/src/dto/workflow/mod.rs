//! Workflow DTOs

use serde::{Deserialize, Serialize};

use super::Page;

/// A workflow definition in a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub state: String,
}

/// Response of `GET /repos/{owner}/{repo}/actions/workflows`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowsPage {
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

impl Page for WorkflowsPage {
    type Item = Workflow;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<Workflow> {
        self.workflows
    }
}
