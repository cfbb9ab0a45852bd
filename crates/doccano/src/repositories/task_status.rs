use std::time::Duration;

use crate::error::{DoccanoError, Result};
use crate::models::TaskStatus;
use crate::session::ApiClient;

/// Status of asynchronous import and export jobs.
#[derive(Debug, Clone)]
pub struct TaskStatusRepository {
    client: ApiClient,
}

impl TaskStatusRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, task_id: &str) -> Result<TaskStatus> {
        self.client.get(&format!("tasks/status/{task_id}")).await
    }

    async fn poll_until_ready(&self, task_id: &str, interval: Duration) -> Result<TaskStatus> {
        let mut polls = 0u32;
        loop {
            polls += 1;
            let status = self.get(task_id).await?;
            if status.ready {
                tracing::info!("Task {} ready after {} polls", task_id, polls);
                return Ok(status);
            }
            tracing::debug!("Task {} not ready (poll {})", task_id, polls);
            tokio::time::sleep(interval).await;
        }
    }

    /// Poll every `interval` until the task is ready.
    ///
    /// Returns [`DoccanoError::Timeout`] if it is still pending after
    /// `timeout`. Request errors end the wait immediately.
    pub async fn wait(
        &self,
        task_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<TaskStatus> {
        match tokio::time::timeout(timeout, self.poll_until_ready(task_id, interval)).await {
            Ok(result) => result,
            Err(_) => Err(DoccanoError::Timeout {
                task_id: task_id.to_string(),
                waited: timeout,
            }),
        }
    }
}
