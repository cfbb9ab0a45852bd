use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DoccanoError, Result};
use crate::http::{HttpBody, HttpMethod, MultipartForm};
use crate::models::{ColumnMapping, ImportOption, Task};
use crate::session::ApiClient;

use super::label_type::file_name_of;

/// Staged file uploads and dataset import.
#[derive(Debug, Clone)]
pub struct DataUploadRepository {
    client: ApiClient,
}

#[derive(Serialize)]
struct IngestRequest<'a> {
    #[serde(rename = "uploadIds")]
    upload_ids: &'a [String],
    task: Task,
    format: &'a str,
    column_data: &'a str,
    column_label: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TaskCreated {
    pub task_id: String,
}

impl DataUploadRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Import formats the project accepts.
    pub async fn list_options(&self, project_id: i64) -> Result<Vec<ImportOption>> {
        self.client
            .get(&format!("projects/{project_id}/catalog"))
            .await
    }

    /// Stage one file and return its upload id.
    pub async fn upload(&self, file_path: &Path) -> Result<String> {
        let data = tokio::fs::read(file_path).await?;
        let form = MultipartForm::new().file("filepond", file_name_of(file_path), None, data);
        let response = self
            .client
            .send_accepting(
                HttpMethod::Post,
                "fp/process/",
                HttpBody::Multipart(form),
                "*/*",
            )
            .await?;

        let upload_id = response.text().trim().to_string();
        if upload_id.is_empty() {
            return Err(DoccanoError::validation(format!(
                "server returned no upload id for {}",
                file_path.display()
            )));
        }
        tracing::debug!("Staged {} as {}", file_path.display(), upload_id);
        Ok(upload_id)
    }

    /// Revert a staged upload.
    pub async fn delete(&self, upload_id: &str) -> Result<()> {
        self.client
            .send_accepting(
                HttpMethod::Delete,
                "fp/revert/",
                HttpBody::Text(upload_id.to_string()),
                "*/*",
            )
            .await
            .map(|_| ())
    }

    /// Import staged files into the project; returns the server task id.
    pub async fn ingest(
        &self,
        project_id: i64,
        upload_ids: &[String],
        task: Task,
        format: &str,
        columns: &ColumnMapping,
    ) -> Result<String> {
        let request = IngestRequest {
            upload_ids,
            task,
            format,
            column_data: &columns.column_data,
            column_label: &columns.column_label,
        };
        let created: TaskCreated = self
            .client
            .post(&format!("projects/{project_id}/upload"), &request)
            .await?;
        Ok(created.task_id)
    }
}
