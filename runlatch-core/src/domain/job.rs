//! Job and step domain types

use serde::{Deserialize, Serialize};

use super::status::{Conclusion, RunStatus};

/// A named unit of work within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub run_id: u64,
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Job {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// An ordered sub-unit of work within a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub number: u32,

    /// Parent job. Not part of the step payload; filled in by whoever fetched it.
    #[serde(default)]
    pub job_id: u64,
}

impl Step {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_job_with_steps() {
        let json = r#"{
            "id": 399444496,
            "run_id": 29679449,
            "name": "build",
            "status": "in_progress",
            "conclusion": null,
            "html_url": "https://github.com/octo-org/octo-repo/runs/399444496",
            "steps": [
                {"name": "Set up job", "status": "completed", "conclusion": "success", "number": 1},
                {"name": "Run tests", "status": "in_progress", "conclusion": null, "number": 2}
            ]
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, 399444496);
        assert_eq!(job.run_id, 29679449);
        assert!(!job.is_completed());
        assert_eq!(job.steps.len(), 2);
        assert!(job.steps[0].is_completed());
        assert_eq!(job.steps[0].conclusion, Some(Conclusion::Success));
        assert!(!job.steps[1].is_completed());
        assert_eq!(job.steps[1].job_id, 0);
    }
}
