//! Attempts API.

use std::collections::BTreeMap;

use tracing::debug;
use uuid::Uuid;

use crate::client::{DigdagClient, RequestOptions};
use crate::error::Result;
use crate::types::{Attempt, AttemptCreation, CreateAttemptRequest, ListAttemptsResponse};

use super::require_non_empty;

/// Query parameters for listing attempts.
#[derive(Debug, Clone, Default)]
pub struct ListAttemptsQuery {
    /// Filter by project name.
    pub project: Option<String>,
    /// Filter by workflow name (needs `project`).
    pub workflow: Option<String>,
    /// Include attempts that were superseded by a retry.
    pub include_retried: bool,
}

impl ListAttemptsQuery {
    /// Attempts of one workflow.
    pub fn for_workflow(project: impl Into<String>, workflow: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            workflow: Some(workflow.into()),
            include_retried: false,
        }
    }

    /// Also return retried attempts.
    pub fn include_retried(mut self, include: bool) -> Self {
        self.include_retried = include;
        self
    }

    fn to_options(&self) -> RequestOptions {
        let mut options =
            RequestOptions::new().param("include_retried", self.include_retried.to_string());
        if let Some(project) = &self.project {
            options = options.param("project", project.as_str());
        }
        if let Some(workflow) = &self.workflow {
            options = options.param("workflow", workflow.as_str());
        }
        options
    }

    fn describe(&self) -> String {
        format!(
            "project={} workflow={}",
            self.project.as_deref().unwrap_or(""),
            self.workflow.as_deref().unwrap_or("")
        )
    }
}

/// Parse `KEY=VALUE` strings into a parameter map.
///
/// The first `=` separates key from value, so values may contain `=`.
/// Entries without any `=` are skipped.
pub fn parse_params<I, S>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            entry
                .as_ref()
                .split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Attempts API client.
pub struct AttemptsApi {
    client: DigdagClient,
}

impl AttemptsApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List attempts matching a filter.
    ///
    /// Unlike the plain project/workflow/session listings, an empty result
    /// here is reported as `NotFound`.
    pub async fn list(&self, query: &ListAttemptsQuery) -> Result<Vec<Attempt>> {
        let response: ListAttemptsResponse = self
            .client
            .get_with_query("/api/attempts", query.to_options())
            .await?;

        require_non_empty(response.attempts, || {
            format!("attempts do not exist. {}", query.describe())
        })
    }

    /// IDs of every attempt (retries included) whose session time is
    /// exactly `session_time`, in server order.
    pub async fn ids_by_session_time(
        &self,
        project: &str,
        workflow: &str,
        session_time: &str,
    ) -> Result<Vec<String>> {
        let query = ListAttemptsQuery::for_workflow(project, workflow).include_retried(true);
        let attempts = self.list(&query).await?;

        let ids = attempts
            .into_iter()
            .filter(|attempt| attempt.session_time == session_time)
            .map(|attempt| attempt.id)
            .collect();

        require_non_empty(ids, || {
            format!(
                "attempts do not exist. {} sessionTime={}",
                query.describe(),
                session_time
            )
        })
    }

    /// Get an attempt by ID.
    pub async fn get(&self, id: &str) -> Result<Attempt> {
        self.client.get(&format!("/api/attempts/{}", id)).await
    }

    /// Request that a running attempt be killed.
    pub async fn kill(&self, id: &str) -> Result<()> {
        self.client
            .post_no_content(&format!("/api/attempts/{}/kill", id), &serde_json::json!({}))
            .await
    }

    /// Start a workflow for a session time.
    ///
    /// `params` are `KEY=VALUE` strings (see [`parse_params`]). With `retry`
    /// set, the attempt gets a fresh retry name so an existing session runs
    /// again. A 409 from the server means the session already has an attempt
    /// and is reported as [`AttemptCreation::AlreadyDone`], not as an error.
    pub async fn create<S: AsRef<str>>(
        &self,
        workflow_id: &str,
        session_time: &str,
        params: &[S],
        retry: bool,
    ) -> Result<AttemptCreation> {
        let request = CreateAttemptRequest {
            workflow_id: workflow_id.to_string(),
            session_time: session_time.to_string(),
            retry_attempt_name: retry.then(|| Uuid::new_v4().to_string()),
            params: parse_params(params),
        };

        match self.client.put::<Attempt, _>("/api/attempts", &request).await {
            Ok(attempt) => Ok(AttemptCreation::Created(attempt)),
            Err(e) if e.is_conflict() => {
                debug!(workflow_id, session_time, "session already has an attempt");
                Ok(AttemptCreation::AlreadyDone)
            }
            Err(e) => Err(e),
        }
    }
}
