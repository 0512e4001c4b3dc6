//! Workflow lookup
//!
//! A running job only knows its workflow by display name, while the run
//! listing endpoint wants an id or file name in the path.

use runlatch_core::dto::workflow::WorkflowsPage;

use crate::ActionsClient;
use crate::error::{ClientError, Result};

/// How a workflow was identified on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowRef {
    /// Numeric workflow id
    Id(u64),
    /// Workflow file name, e.g. `ci.yml`
    File(String),
    /// Display name, resolved through the workflow listing
    Name(String),
}

impl WorkflowRef {
    /// Parse a workflow identifier
    ///
    /// Digits are an id, `*.yml`/`*.yaml` a file name, anything else a name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Ok(id) = input.parse::<u64>() {
            WorkflowRef::Id(id)
        } else if input.ends_with(".yml") || input.ends_with(".yaml") {
            WorkflowRef::File(input.to_string())
        } else {
            WorkflowRef::Name(input.to_string())
        }
    }
}

impl std::fmt::Display for WorkflowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowRef::Id(id) => write!(f, "{}", id),
            WorkflowRef::File(file) => write!(f, "{}", file),
            WorkflowRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl ActionsClient {
    /// Resolve a workflow reference to the path segment the run listing takes
    ///
    /// Ids and file names are used as-is; names are looked up by exact match.
    pub async fn resolve_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow: &WorkflowRef,
    ) -> Result<String> {
        let name = match workflow {
            WorkflowRef::Id(id) => return Ok(id.to_string()),
            WorkflowRef::File(file) => return Ok(file.clone()),
            WorkflowRef::Name(name) => name,
        };

        let url = format!("{}/workflows", self.repo_url(owner, repo));
        let workflows = self.paginate::<WorkflowsPage>(&url, &[]).await?;

        workflows
            .into_iter()
            .find(|w| w.name == *name)
            .map(|w| w.id.to_string())
            .ok_or_else(|| {
                ClientError::NotFound(format!("workflow '{}' in {}/{}", name, owner, repo))
            })
    }
}
