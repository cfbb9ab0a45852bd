use std::path::{Path, PathBuf};

use crate::config::TaskConfig;
use crate::error::Result;
use crate::models::ExportOption;
use crate::repositories::{DataDownloadRepository, TaskStatusRepository};

/// Dataset export: schedule the job, wait for it, save the archive.
#[derive(Debug, Clone)]
pub struct DataDownloadUseCase {
    downloads: DataDownloadRepository,
    tasks: TaskStatusRepository,
    task_config: TaskConfig,
    default_dir: PathBuf,
}

impl DataDownloadUseCase {
    /// Archives land in `default_dir` unless a directory is passed to [`Self::download`].
    pub fn new(
        downloads: DataDownloadRepository,
        tasks: TaskStatusRepository,
        task_config: TaskConfig,
        default_dir: PathBuf,
    ) -> Self {
        Self {
            downloads,
            tasks,
            task_config,
            default_dir,
        }
    }

    pub async fn list_options(&self, project_id: i64) -> Result<Vec<ExportOption>> {
        self.downloads.list_options(project_id).await
    }

    /// Export a project in `format` and return the path of the saved file.
    pub async fn download(
        &self,
        project_id: i64,
        format: &str,
        only_approved: bool,
        dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let option = self.downloads.find_option_by_name(project_id, format).await?;
        let task_id = self
            .downloads
            .schedule_download(project_id, &option, only_approved)
            .await?;
        tracing::info!("Exporting project {} as {} (task {})", project_id, format, task_id);

        self.tasks
            .wait(
                &task_id,
                self.task_config.poll_interval(),
                self.task_config.timeout(),
            )
            .await?;

        let dir = dir.unwrap_or(&self.default_dir);
        self.downloads.download(project_id, &task_id, dir).await
    }
}
