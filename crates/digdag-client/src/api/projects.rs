//! Projects API.

use crate::client::{DigdagClient, RequestOptions};
use crate::error::Result;
use crate::types::{ListProjectsResponse, Project};

use super::require_non_empty;

/// Projects API client.
pub struct ProjectsApi {
    client: DigdagClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List all projects. An empty server is not an error.
    pub async fn list(&self) -> Result<Vec<Project>> {
        let response: ListProjectsResponse = self.client.get("/api/projects").await?;
        Ok(response.projects)
    }

    /// Get a project by name.
    ///
    /// Fails with `NotFound` when the server has no project of that name.
    pub async fn get_by_name(&self, name: &str) -> Result<Project> {
        let response: ListProjectsResponse = self
            .client
            .get_with_query("/api/projects", RequestOptions::new().param("name", name))
            .await?;

        let mut projects =
            require_non_empty(response.projects, || format!("project `{}` not found", name))?;
        Ok(projects.swap_remove(0))
    }

    /// Resolve a project name to its ID.
    pub async fn id_by_name(&self, name: &str) -> Result<String> {
        Ok(self.get_by_name(name).await?.id)
    }
}
