use std::path::Path;

use crate::config::TaskConfig;
use crate::error::Result;
use crate::models::{ColumnMapping, ImportOption, Task, TaskStatus};
use crate::repositories::{DataUploadRepository, TaskStatusRepository};

/// Dataset import: stage files, start the import job, wait for it.
#[derive(Debug, Clone)]
pub struct DataUploadUseCase {
    uploads: DataUploadRepository,
    tasks: TaskStatusRepository,
    task_config: TaskConfig,
}

impl DataUploadUseCase {
    pub fn new(
        uploads: DataUploadRepository,
        tasks: TaskStatusRepository,
        task_config: TaskConfig,
    ) -> Self {
        Self {
            uploads,
            tasks,
            task_config,
        }
    }

    pub async fn list_options(&self, project_id: i64) -> Result<Vec<ImportOption>> {
        self.uploads.list_options(project_id).await
    }

    /// Import `file_paths` into a project and return the finished task status.
    ///
    /// If staging or starting the import fails, every file staged so far is
    /// reverted before the error is returned.
    pub async fn upload<P: AsRef<Path>>(
        &self,
        project_id: i64,
        file_paths: &[P],
        task: Task,
        format: &str,
        columns: &ColumnMapping,
    ) -> Result<TaskStatus> {
        let mut upload_ids = Vec::with_capacity(file_paths.len());
        for path in file_paths {
            match self.uploads.upload(path.as_ref()).await {
                Ok(id) => upload_ids.push(id),
                Err(err) => {
                    self.revert(&upload_ids).await;
                    return Err(err);
                }
            }
        }

        let task_id = match self
            .uploads
            .ingest(project_id, &upload_ids, task, format, columns)
            .await
        {
            Ok(task_id) => task_id,
            Err(err) => {
                self.revert(&upload_ids).await;
                return Err(err);
            }
        };
        tracing::info!(
            "Importing {} file(s) into project {} as task {}",
            upload_ids.len(),
            project_id,
            task_id
        );

        self.tasks
            .wait(
                &task_id,
                self.task_config.poll_interval(),
                self.task_config.timeout(),
            )
            .await
    }

    async fn revert(&self, upload_ids: &[String]) {
        for id in upload_ids {
            if let Err(e) = self.uploads.delete(id).await {
                tracing::warn!("Failed to revert staged upload {}: {}", id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpBody, HttpMethod, HttpResponse, MockTransport, json_response};
    use crate::session::{api, mock_client};
    use serde_json::json;
    use std::io::Write;

    fn text_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn usecase(transport: &MockTransport) -> DataUploadUseCase {
        let client = mock_client(transport);
        DataUploadUseCase::new(
            DataUploadRepository::new(client.clone()),
            TaskStatusRepository::new(client),
            TaskConfig::default(),
        )
    }

    fn files(n: usize) -> Vec<tempfile::NamedTempFile> {
        (0..n)
            .map(|i| {
                let mut file = tempfile::NamedTempFile::new().expect("tempfile");
                writeln!(file, "{{\"text\": \"doc {i}\"}}").expect("write");
                file
            })
            .collect()
    }

    #[tokio::test]
    async fn failed_push_reverts_earlier_uploads() {
        let transport = MockTransport::new();
        let process = api("fp/process/");
        transport.push_response(HttpMethod::Post, &process, text_response(200, "first"));
        transport.push_response(HttpMethod::Post, &process, text_response(500, "boom"));
        transport.push_response(HttpMethod::Delete, api("fp/revert/"), text_response(200, ""));

        let files = files(3);
        let paths: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();
        let err = usecase(&transport)
            .upload(1, &paths, Task::DocumentClassification, "JSONL", &ColumnMapping::default())
            .await
            .expect_err("second push fails");
        assert_eq!(err.status(), Some(500));

        let requests = transport.requests();
        assert_eq!(requests.len(), 3, "third file is never pushed");
        assert_eq!(requests[2].method, HttpMethod::Delete);
        assert_eq!(requests[2].body, HttpBody::Text("first".to_string()));
    }

    #[tokio::test]
    async fn failed_ingest_reverts_every_upload() {
        let transport = MockTransport::new();
        let process = api("fp/process/");
        transport.push_response(HttpMethod::Post, &process, text_response(200, "a"));
        transport.push_response(HttpMethod::Post, &process, text_response(200, "b"));
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/upload"),
            json_response(400, json!({"detail": "bad format"})),
        );
        transport.always_respond(HttpMethod::Delete, api("fp/revert/"), text_response(200, ""));

        let files = files(2);
        let paths: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();
        let err = usecase(&transport)
            .upload(1, &paths, Task::DocumentClassification, "CSV", &ColumnMapping::default())
            .await
            .expect_err("ingest fails");
        assert_eq!(err.status(), Some(400));

        let reverted: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.method == HttpMethod::Delete)
            .map(|r| r.body)
            .collect();
        assert_eq!(
            reverted,
            vec![HttpBody::Text("a".into()), HttpBody::Text("b".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn successful_import_waits_for_task() {
        let transport = MockTransport::new();
        transport.push_response(HttpMethod::Post, api("fp/process/"), text_response(200, "a"));
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/upload"),
            json_response(202, json!({"task_id": "t-9"})),
        );
        let status = api("tasks/status/t-9");
        transport.push_response(
            HttpMethod::Get,
            &status,
            json_response(200, json!({"ready": false})),
        );
        transport.push_response(
            HttpMethod::Get,
            &status,
            json_response(200, json!({"ready": true, "result": {"error": []}})),
        );

        let files = files(1);
        let done = usecase(&transport)
            .upload(
                1,
                &[files[0].path()],
                Task::SequenceLabeling,
                "JSONL",
                &ColumnMapping::default(),
            )
            .await
            .expect("upload");
        assert!(done.ready);
        assert!(
            transport
                .requests()
                .iter()
                .all(|r| r.method != HttpMethod::Delete)
        );
    }
}
