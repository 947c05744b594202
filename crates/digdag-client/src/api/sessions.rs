//! Sessions API.

use crate::client::{DigdagClient, RequestOptions};
use crate::error::Result;
use crate::types::{Attempt, ListAttemptsResponse, ListSessionsResponse, Session};

use super::require_non_empty;

/// Sessions API client.
pub struct SessionsApi {
    client: DigdagClient,
}

impl SessionsApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List all sessions.
    pub async fn list(&self) -> Result<Vec<Session>> {
        let response: ListSessionsResponse = self.client.get("/api/sessions").await?;
        Ok(response.sessions)
    }

    /// List the sessions of one workflow in a project.
    ///
    /// A workflow with no sessions is reported as `NotFound`.
    pub async fn for_workflow(&self, project_id: &str, workflow: &str) -> Result<Vec<Session>> {
        let response: ListSessionsResponse = self
            .client
            .get_with_query(
                &format!("/api/projects/{}/sessions", project_id),
                RequestOptions::new().param("workflow", workflow),
            )
            .await?;

        require_non_empty(response.sessions, || {
            format!("sessions of workflow `{}` not found", workflow)
        })
    }

    /// Get a session by ID.
    pub async fn get(&self, id: &str) -> Result<Session> {
        self.client.get(&format!("/api/sessions/{}", id)).await
    }

    /// List every attempt made for a session, retries included.
    pub async fn attempts(&self, id: &str) -> Result<Vec<Attempt>> {
        let response: ListAttemptsResponse = self
            .client
            .get(&format!("/api/sessions/{}/attempts", id))
            .await?;
        Ok(response.attempts)
    }
}
