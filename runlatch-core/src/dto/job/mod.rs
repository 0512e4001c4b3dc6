//! Job DTOs

use serde::{Deserialize, Serialize};

use super::Page;
use crate::domain::job::Job;

/// Response of `GET /repos/{owner}/{repo}/actions/runs/{run_id}/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsPage {
    pub total_count: u64,
    pub jobs: Vec<Job>,
}

impl Page for JobsPage {
    type Item = Job;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<Job> {
        self.jobs
    }
}
