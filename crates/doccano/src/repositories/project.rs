use crate::error::Result;
use crate::models::Project;
use crate::pagination::Paginator;
use crate::session::ApiClient;

use super::{IntoId, require_id};

/// Projects the current user is a member of.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    client: ApiClient,
}

impl ProjectRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn find_by_id(&self, project_id: i64) -> Result<Project> {
        self.client.get(&format!("projects/{project_id}")).await
    }

    pub fn list(&self) -> Paginator<Project> {
        Paginator::new(self.client.clone(), "projects")
    }

    pub async fn create(&self, project: &Project) -> Result<Project> {
        let mut payload = project.clone();
        payload.normalize()?;
        payload.id = None;
        self.client.post("projects", &payload).await
    }

    pub async fn update(&self, project: &Project) -> Result<Project> {
        let id = require_id(project.id, "project")?;
        let mut payload = project.clone();
        payload.normalize()?;
        self.client.put(&format!("projects/{id}"), &payload).await
    }

    pub async fn delete(&self, project: impl IntoId) -> Result<()> {
        let id = project.into_id()?;
        self.client.delete(&format!("projects/{id}")).await
    }
}
