//! Workflows API.

use crate::client::{DigdagClient, RequestOptions};
use crate::error::Result;
use crate::types::{ListWorkflowsResponse, Workflow};

use super::require_non_empty;

/// Workflows API client.
pub struct WorkflowsApi {
    client: DigdagClient,
}

impl WorkflowsApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List workflows of all projects.
    pub async fn list(&self) -> Result<Vec<Workflow>> {
        let response: ListWorkflowsResponse = self.client.get("/api/workflows").await?;
        Ok(response.workflows)
    }

    /// Get a workflow by name within a project.
    pub async fn get(&self, project_id: &str, name: &str) -> Result<Workflow> {
        let response: ListWorkflowsResponse = self
            .client
            .get_with_query(
                &format!("/api/projects/{}/workflows", project_id),
                RequestOptions::new().param("name", name),
            )
            .await?;

        let mut workflows =
            require_non_empty(response.workflows, || format!("workflow `{}` not found", name))?;
        Ok(workflows.swap_remove(0))
    }
}
