use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DoccanoError, Result};
use crate::models::ExportOption;
use crate::session::{ApiClient, with_query};

use super::data_upload::TaskCreated;

/// Dataset export.
#[derive(Debug, Clone)]
pub struct DataDownloadRepository {
    client: ApiClient,
}

#[derive(Serialize)]
struct ScheduleRequest<'a> {
    format: &'a str,
    #[serde(rename = "exportApproved")]
    export_approved: bool,
}

impl DataDownloadRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_options(&self, project_id: i64) -> Result<Vec<ExportOption>> {
        self.client
            .get(&format!("projects/{project_id}/download-format"))
            .await
    }

    pub async fn find_option_by_name(&self, project_id: i64, name: &str) -> Result<ExportOption> {
        self.list_options(project_id)
            .await?
            .into_iter()
            .find(|o| o.name == name)
            .ok_or_else(|| DoccanoError::not_found("download option", name))
    }

    /// Start an export job; returns the server task id.
    pub async fn schedule_download(
        &self,
        project_id: i64,
        option: &ExportOption,
        only_approved: bool,
    ) -> Result<String> {
        let request = ScheduleRequest {
            format: &option.name,
            export_approved: only_approved,
        };
        let created: TaskCreated = self
            .client
            .post(&format!("projects/{project_id}/download"), &request)
            .await?;
        Ok(created.task_id)
    }

    /// Fetch a finished export into `dir`, creating it if needed.
    pub async fn download(&self, project_id: i64, task_id: &str, dir: &Path) -> Result<PathBuf> {
        let resource = with_query(
            &format!("projects/{project_id}/download"),
            &[("taskId", task_id.to_string())],
        );
        let response = self.client.get_raw(&resource).await?;

        let file_name = response
            .header("content-disposition")
            .and_then(attachment_file_name)
            .unwrap_or_else(|| format!("{task_id}.zip"));

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &response.body).await?;
        tracing::info!("Saved export {} to {}", task_id, path.display());
        Ok(path)
    }
}

/// File name from a `Content-Disposition` header, without any directory part.
fn attachment_file_name(header: &str) -> Option<String> {
    let (_, rest) = header.split_once("filename=")?;
    let value = rest.split(';').next()?.trim().trim_matches('"');
    let name = Path::new(value).file_name()?.to_string_lossy().into_owned();
    if name.is_empty() { None } else { Some(name) }
}
