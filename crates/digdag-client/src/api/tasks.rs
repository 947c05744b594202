//! Tasks API.

use crate::client::DigdagClient;
use crate::error::{Error, Result};
use crate::types::{ListTasksResponse, Task};

/// Tasks API client.
pub struct TasksApi {
    client: DigdagClient,
}

impl TasksApi {
    pub(crate) fn new(client: DigdagClient) -> Self {
        Self { client }
    }

    /// List the tasks of an attempt. An attempt may have none yet.
    pub async fn list(&self, attempt_id: &str) -> Result<Vec<Task>> {
        let response: ListTasksResponse = self
            .client
            .get(&format!("/api/attempts/{}/tasks", attempt_id))
            .await?;
        Ok(response.tasks)
    }

    /// Find a task by full name and return it if it succeeded.
    ///
    /// Attempts are searched in the given order, one request each, and the
    /// search stops at the first task with a matching name. That task decides
    /// the outcome: `success` returns it, any other state is an
    /// [`Error::TaskState`].
    pub async fn result<S: AsRef<str>>(
        &self,
        attempt_ids: &[S],
        task_name: &str,
    ) -> Result<Task> {
        if !task_name.starts_with('+') {
            return Err(Error::Validation(format!("task `{}` is invalid task name", task_name)));
        }

        for attempt_id in attempt_ids {
            let tasks = self.list(attempt_id.as_ref()).await?;

            if let Some(task) = tasks.into_iter().find(|t| t.full_name == task_name) {
                if task.is_success() {
                    return Ok(task);
                }
                return Err(Error::TaskState {
                    task: task.full_name,
                    state: task.state,
                });
            }
        }

        Err(Error::NotFound(format!("task `{}` result not found", task_name)))
    }
}
