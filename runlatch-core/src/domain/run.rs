//! Workflow run domain type

use serde::{Deserialize, Serialize};

use super::status::{Conclusion, RunStatus};

/// One execution of a workflow
///
/// `id` is assigned by the platform and grows monotonically, so it is the
/// only key used for "earlier than" comparisons; timestamps may arrive out
/// of order in listings and are not read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    pub status: Option<RunStatus>,
    pub conclusion: Option<Conclusion>,
    #[serde(rename = "head_branch")]
    pub branch: Option<String>,
    #[serde(default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
}

impl Run {
    /// Whether the display title or the workflow name contains `needle`
    ///
    /// Case-sensitive and unanchored.
    pub fn matches_queue(&self, needle: &str) -> bool {
        let contains =
            |field: &Option<String>| field.as_deref().is_some_and(|v| v.contains(needle));
        contains(&self.display_title) || contains(&self.name)
    }

    pub fn succeeded(&self) -> bool {
        self.conclusion == Some(Conclusion::Success)
    }

    /// Status for log lines, `unknown` when the listing omitted it
    pub fn status_label(&self) -> &'static str {
        self.status.map(|s| s.as_str()).unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(display_title: Option<&str>, name: Option<&str>) -> Run {
        Run {
            id: 1,
            status: Some(RunStatus::Queued),
            conclusion: None,
            branch: Some("main".to_string()),
            display_title: display_title.map(str::to_string),
            name: name.map(str::to_string),
            html_url: "https://github.com/o/r/actions/runs/1".to_string(),
        }
    }

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"{
            "id": 30433642,
            "name": "Build",
            "head_branch": "main",
            "display_title": "Update README.md",
            "status": "queued",
            "conclusion": null,
            "html_url": "https://github.com/octo-org/octo-repo/actions/runs/30433642",
            "created_at": "2020-01-22T19:33:08Z",
            "run_number": 562
        }"#;

        let run: Run = serde_json::from_str(json).unwrap();
        assert_eq!(run.id, 30433642);
        assert_eq!(run.status, Some(RunStatus::Queued));
        assert_eq!(run.conclusion, None);
        assert_eq!(run.branch.as_deref(), Some("main"));
        assert_eq!(run.display_title.as_deref(), Some("Update README.md"));
    }

    #[test]
    fn test_matches_queue_checks_title_and_name() {
        assert!(run(Some("deploy [prod]"), None).matches_queue("[prod]"));
        assert!(run(None, Some("prod-deploy")).matches_queue("prod"));
        assert!(!run(Some("deploy"), Some("Deploy")).matches_queue("DEPLOY"));
        assert!(!run(None, None).matches_queue("anything"));
    }

    #[test]
    fn test_succeeded() {
        let mut r = run(None, None);
        assert!(!r.succeeded());
        r.conclusion = Some(Conclusion::Failure);
        assert!(!r.succeeded());
        r.conclusion = Some(Conclusion::Success);
        assert!(r.succeeded());
    }
}
