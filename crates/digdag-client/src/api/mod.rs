//! API endpoint implementations.
//!
//! Each endpoint applies its own not-found policy: plain listings accept an
//! empty result, lookups that name a specific resource reject it.

mod attempts;
mod logs;
mod projects;
mod sessions;
mod tasks;
mod workflows;

pub use attempts::{parse_params, AttemptsApi, ListAttemptsQuery};
pub use logs::LogsApi;
pub use projects::ProjectsApi;
pub use sessions::SessionsApi;
pub use tasks::TasksApi;
pub use workflows::WorkflowsApi;

use crate::error::{Error, Result};

/// Turn an empty result into [`Error::NotFound`].
fn require_non_empty<T>(items: Vec<T>, message: impl FnOnce() -> String) -> Result<Vec<T>> {
    if items.is_empty() {
        let message = message();
        tracing::debug!(reason = %message, "empty result treated as not found");
        return Err(Error::NotFound(message));
    }
    Ok(items)
}
