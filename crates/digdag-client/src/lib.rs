//! HTTP client SDK for the Digdag workflow server.
//!
//! This crate provides a typed client for the Digdag REST API.
//!
//! # Example
//!
//! ```no_run
//! use digdag_client::{DigdagClient, Result};
//!
//! # async fn example() -> Result<()> {
//! // Create a client (an empty URL means http://localhost:65432)
//! let client = DigdagClient::builder()
//!     .base_url("http://localhost:65432")
//!     .header("Authorization", "Bearer secret")
//!     .build()?;
//!
//! // Find the workflow to run
//! let project_id = client.projects().id_by_name("reports").await?;
//! let workflow = client.workflows().get(&project_id, "daily").await?;
//!
//! // Start it for a session time
//! let created = client
//!     .attempts()
//!     .create(&workflow.id, "2017-06-24T00:00:00+00:00", &["env=prod"], false)
//!     .await?;
//! if created.is_done() {
//!     println!("Session already ran");
//! }
//!
//! // Check a task and read its log
//! let ids = client
//!     .attempts()
//!     .ids_by_session_time("reports", "daily", "2017-06-24T00:00:00+00:00")
//!     .await?;
//! let task = client.tasks().result(&ids, "+daily+export").await?;
//! println!("{} finished at {}", task.full_name, task.updated_at);
//!
//! let file = client.logs().file_for_task(&ids[0], "+daily+export").await?;
//! let text = client.logs().text(&ids[0], &file.file_name).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Projects**: list, look up by name
//! - **Workflows**: list, look up by project and name
//! - **Sessions**: list, list per workflow, get, list attempts
//! - **Attempts**: list, resolve by session time, get, start/retry, kill
//! - **Tasks**: list, resolve a task's result
//! - **Logs**: list files, find a task's file, download text
//!
//! Listings that name a specific resource treat an empty answer as
//! [`Error::NotFound`]; plain listings return an empty `Vec`.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod types;

pub use client::{ClientBuilder, DigdagClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use response::ApiResponse;
pub use types::*;

// Re-export API helpers that are commonly used with query methods
pub use api::{parse_params, ListAttemptsQuery};
