use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::Example;
use crate::pagination::Paginator;
use crate::repositories::ExampleRepository;

/// Score given to examples created without one.
pub const DEFAULT_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct ExamplePatch {
    pub text: Option<String>,
    pub score: Option<f64>,
    pub meta: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct ExampleUseCase {
    repository: ExampleRepository,
}

impl ExampleUseCase {
    pub fn new(repository: ExampleRepository) -> Self {
        Self { repository }
    }

    pub async fn find_by_id(&self, project_id: i64, example_id: i64) -> Result<Example> {
        self.repository.find_by_id(project_id, example_id).await
    }

    pub async fn count(&self, project_id: i64) -> Result<u64> {
        self.repository.count(project_id).await
    }

    pub fn list(&self, project_id: i64, is_confirmed: Option<bool>) -> Paginator<Example> {
        self.repository.list(project_id, is_confirmed)
    }

    pub async fn create(
        &self,
        project_id: i64,
        text: impl Into<String>,
        score: Option<f64>,
        meta: Map<String, Value>,
    ) -> Result<Example> {
        let mut example = Example::with_text(text).meta(meta);
        example.score = Some(score.unwrap_or(DEFAULT_SCORE));
        self.repository.create(project_id, &example).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        patch: ExamplePatch,
    ) -> Result<Example> {
        let current = self.repository.find_by_id(project_id, example_id).await?;
        let example = Example {
            id: Some(example_id),
            text: patch.text.or(current.text),
            score: patch.score.or(current.score),
            meta: patch.meta.unwrap_or(current.meta),
            ..Example::default()
        };
        self.repository.update(project_id, &example).await
    }

    pub async fn delete(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.repository.delete(project_id, example_id).await
    }

    pub async fn bulk_delete(&self, project_id: i64, example_ids: &[i64]) -> Result<()> {
        self.repository.bulk_delete(project_id, example_ids).await
    }

    pub async fn delete_all(&self, project_id: i64) -> Result<()> {
        self.repository.delete_all(project_id).await
    }

    pub async fn update_state(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.repository.update_state(project_id, example_id).await
    }
}
