use std::error::Error;

use async_trait::async_trait;

use crate::{NewTask, Task};

/// A source of tasks, usually a remote server
///
/// Results must be `Send` because calls are executed in background tokio tasks
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Returns every task this source contains.
    /// This is a complete snapshot, previous results should be discarded
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>>;

    /// Create a task, and return it as it has been stored (i.e. with its new ID)
    async fn add_task(&self, new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>>;
}
