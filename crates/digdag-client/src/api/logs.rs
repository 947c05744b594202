//! Logs API.

use reqwest::Method;

use crate::client::{DigdagClient, RequestOptions};
use crate::error::{Error, Result};
use crate::types::{ListLogFilesResponse, LogFile};

use super::require_non_empty;

/// Logs API client.
pub struct LogsApi {
    client: DigdagClient,
}

impl LogsApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List the log files of an attempt.
    ///
    /// An attempt without log files is reported as `NotFound`.
    pub async fn files(&self, attempt_id: &str) -> Result<Vec<LogFile>> {
        let response: ListLogFilesResponse = self
            .client
            .get(&format!("/api/logs/{}/files", attempt_id))
            .await?;

        require_non_empty(response.files, || {
            format!("task log of attempt {} not found", attempt_id)
        })
    }

    /// First log file written by `task_name`.
    pub async fn file_for_task(&self, attempt_id: &str, task_name: &str) -> Result<LogFile> {
        self.files(attempt_id)
            .await?
            .into_iter()
            .find(|file| file.task_name == task_name)
            .ok_or_else(|| Error::NotFound(format!("task log `{}` not found", task_name)))
    }

    /// Download a log file and return its decompressed text.
    pub async fn text(&self, attempt_id: &str, file_name: &str) -> Result<String> {
        self.client
            .request(
                Method::GET,
                &format!("/api/logs/{}/files/{}", attempt_id, file_name),
                RequestOptions::new(),
            )
            .await?
            .gunzip_text()
    }
}
