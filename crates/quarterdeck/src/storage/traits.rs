//! Storage trait definitions.

use async_trait::async_trait;

use crate::entities::{Task, TaskDraft, TaskUpdate};
use crate::errors::QuarterdeckResult;

/// A parsed task list together with the raw file content it came from.
#[derive(Debug, Clone)]
pub struct TaskListing {
    pub tasks: Vec<Task>,
    pub raw_content: String,
}

/// Storage interface for per-user task tables
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Parse the user's task table. Never creates the backing file.
    async fn list_tasks(&self, user_name: &str) -> QuarterdeckResult<TaskListing>;

    /// Append a new task under the next free id and return it.
    async fn append_task(&self, user_name: &str, draft: TaskDraft) -> QuarterdeckResult<Task>;

    /// Apply a partial update to the task with the given id and return the
    /// updated task.
    async fn update_task(
        &self,
        user_name: &str,
        task_id: u32,
        updates: TaskUpdate,
    ) -> QuarterdeckResult<Task>;

    /// Remove the task with the given id.
    async fn delete_task(&self, user_name: &str, task_id: u32) -> QuarterdeckResult<()>;
}
