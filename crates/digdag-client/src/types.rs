//! Request and response types for the Digdag API.
//!
//! These types mirror the server's JSON shapes. Timestamps are typed per
//! field the way the server reports them: session listings carry parsed
//! timestamps, attempt and task listings carry the raw strings.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Free-form JSON object, as used for task configs and parameters.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

/// A project: the namespace holding a set of workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Revision of the latest upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Response for list projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    /// List of projects.
    pub projects: Vec<Project>,
}

/// Project snapshot embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project ID.
    pub id: String,
    /// Project name.
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflows
// ─────────────────────────────────────────────────────────────────────────────

/// A workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Workflow ID.
    pub id: String,
    /// Workflow name.
    pub name: String,
    /// Owning project.
    pub project: ProjectRef,
    /// Project revision the definition belongs to.
    #[serde(default)]
    pub revision: String,
    /// Timezone used for session times.
    #[serde(default)]
    pub timezone: String,
}

/// Response for list workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWorkflowsResponse {
    /// List of workflows.
    pub workflows: Vec<Workflow>,
}

/// Workflow snapshot embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRef {
    /// Workflow ID.
    #[serde(default)]
    pub id: String,
    /// Workflow name.
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// A session: one workflow at one session time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ID.
    pub id: String,
    /// Owning project.
    pub project: ProjectRef,
    /// Workflow the session runs.
    pub workflow: WorkflowRef,
    /// Session UUID.
    pub session_uuid: String,
    /// Logical session time.
    pub session_time: DateTime<FixedOffset>,
    /// Most recent attempt, if any ran.
    #[serde(default)]
    pub last_attempt: Option<SessionAttempt>,
}

/// Last-attempt snapshot inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttempt {
    /// Attempt ID.
    pub id: String,
    /// Retry name, set on retried attempts.
    #[serde(default)]
    pub retry_attempt_name: Option<String>,
    /// Whether the attempt finished.
    pub done: bool,
    /// Whether it finished successfully.
    pub success: bool,
    /// Whether a kill was requested.
    #[serde(default)]
    pub cancel_requested: bool,
    /// Attempt parameters.
    #[serde(default)]
    pub params: JsonObject,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Finish time; absent while running.
    #[serde(default)]
    pub finished_at: Option<DateTime<FixedOffset>>,
}

/// Response for list sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    /// List of sessions.
    pub sessions: Vec<Session>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Attempts
// ─────────────────────────────────────────────────────────────────────────────

/// One execution of a workflow at a session time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Attempt ID.
    pub id: String,
    /// Attempt number within the session.
    #[serde(default)]
    pub index: u32,
    /// Owning project.
    pub project: ProjectRef,
    /// Workflow being run.
    pub workflow: WorkflowRef,
    /// Session ID.
    pub session_id: String,
    /// Session UUID.
    #[serde(default)]
    pub session_uuid: String,
    /// Session time exactly as the server formats it.
    pub session_time: String,
    /// Retry name, set on retried attempts.
    #[serde(default)]
    pub retry_attempt_name: Option<String>,
    /// Whether the attempt finished.
    pub done: bool,
    /// Whether it finished successfully.
    pub success: bool,
    /// Whether a kill was requested.
    #[serde(default)]
    pub cancel_requested: bool,
    /// Attempt parameters.
    #[serde(default)]
    pub params: JsonObject,
    /// Creation time.
    pub created_at: String,
    /// Finish time; absent while running.
    #[serde(default)]
    pub finished_at: Option<String>,
}

/// Response for list attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAttemptsResponse {
    /// List of attempts.
    pub attempts: Vec<Attempt>,
}

/// Body of `PUT /api/attempts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttemptRequest {
    /// Workflow to start.
    pub workflow_id: String,
    /// Session time to start it for.
    pub session_time: String,
    /// Set to a fresh name to retry an existing session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempt_name: Option<String>,
    /// Workflow parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Result of starting an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptCreation {
    /// The server started a new attempt.
    Created(Attempt),
    /// The session already has an attempt (server answered 409).
    AlreadyDone,
}

impl AttemptCreation {
    /// True when the session already existed and nothing was started.
    pub fn is_done(&self) -> bool {
        matches!(self, AttemptCreation::AlreadyDone)
    }

    /// The new attempt, if one was started.
    pub fn attempt(&self) -> Option<&Attempt> {
        match self {
            AttemptCreation::Created(attempt) => Some(attempt),
            AttemptCreation::AlreadyDone => None,
        }
    }

    /// Consume into the new attempt, if one was started.
    pub fn into_attempt(self) -> Option<Attempt> {
        match self {
            AttemptCreation::Created(attempt) => Some(attempt),
            AttemptCreation::AlreadyDone => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// State reported for a task that finished successfully.
pub const TASK_STATE_SUCCESS: &str = "success";

/// One node of an attempt's task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID.
    pub id: String,
    /// Hierarchical name, e.g. `+main+step1`.
    pub full_name: String,
    /// Parent task ID; none for the root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Task config.
    #[serde(default)]
    pub config: JsonObject,
    /// IDs of tasks that must finish first.
    #[serde(default)]
    pub upstreams: Vec<String>,
    /// Current state (`blocked`, `running`, `success`, `error`, `group_error`, ...).
    pub state: String,
    /// Parameters exported to children.
    #[serde(default)]
    pub export_params: JsonObject,
    /// Parameters stored for later tasks.
    #[serde(default)]
    pub store_params: JsonObject,
    /// Operator state.
    #[serde(default)]
    pub state_params: JsonObject,
    /// Last update time.
    pub updated_at: String,
    /// Next retry time.
    #[serde(default)]
    pub retry_at: Option<String>,
    /// Start time.
    #[serde(default)]
    pub started_at: Option<String>,
    /// Whether this is a group of child tasks.
    #[serde(default)]
    pub is_group: bool,
}

impl Task {
    /// Whether the task finished successfully.
    pub fn is_success(&self) -> bool {
        self.state == TASK_STATE_SUCCESS
    }
}

/// Response for list tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTasksResponse {
    /// List of tasks.
    pub tasks: Vec<Task>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Logs
// ─────────────────────────────────────────────────────────────────────────────

/// A log file written by one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFile {
    /// File name, used to fetch the content.
    pub file_name: String,
    /// Compressed size in bytes.
    pub file_size: u64,
    /// Task that wrote the file.
    pub task_name: String,
    /// Time the file was written.
    pub file_time: String,
    /// Agent that ran the task.
    #[serde(default)]
    pub agent_id: String,
    /// Direct download URL, when the log server provides one.
    #[serde(default)]
    pub direct: Option<String>,
}

/// Response for list log files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLogFilesResponse {
    /// List of files.
    pub files: Vec<LogFile>,
}
