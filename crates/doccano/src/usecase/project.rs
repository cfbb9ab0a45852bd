use crate::error::Result;
use crate::models::{Project, ProjectType};
use crate::pagination::Paginator;
use crate::repositories::ProjectRepository;

/// Fields to change on an existing project. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub guideline: Option<String>,
    pub project_type: Option<ProjectType>,
    pub random_order: Option<bool>,
    pub collaborative_annotation: Option<bool>,
    pub single_class_classification: Option<bool>,
    pub allow_overlapping: Option<bool>,
    pub grapheme_mode: Option<bool>,
    pub use_relation: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ProjectPatch {
    fn apply(self, project: &mut Project) {
        if let Some(v) = self.name {
            project.name = v;
        }
        if let Some(v) = self.description {
            project.description = v;
        }
        if let Some(v) = self.guideline {
            project.guideline = v;
        }
        if let Some(v) = self.project_type {
            project.project_type = v;
        }
        if let Some(v) = self.random_order {
            project.random_order = v;
        }
        if let Some(v) = self.collaborative_annotation {
            project.collaborative_annotation = v;
        }
        if let Some(v) = self.single_class_classification {
            project.single_class_classification = v;
        }
        if let Some(v) = self.allow_overlapping {
            project.allow_overlapping = v;
        }
        if let Some(v) = self.grapheme_mode {
            project.grapheme_mode = v;
        }
        if let Some(v) = self.use_relation {
            project.use_relation = v;
        }
        if let Some(v) = self.tags {
            project.tags = v;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectUseCase {
    repository: ProjectRepository,
}

impl ProjectUseCase {
    pub fn new(repository: ProjectRepository) -> Self {
        Self { repository }
    }

    pub async fn find_by_id(&self, project_id: i64) -> Result<Project> {
        self.repository.find_by_id(project_id).await
    }

    pub fn list(&self) -> Paginator<Project> {
        self.repository.list()
    }

    pub async fn create(&self, project: &Project) -> Result<Project> {
        self.repository.create(project).await
    }

    pub async fn update(&self, project_id: i64, patch: ProjectPatch) -> Result<Project> {
        let mut project = self.repository.find_by_id(project_id).await?;
        project.id = Some(project_id);
        patch.apply(&mut project);
        self.repository.update(&project).await
    }

    pub async fn delete(&self, project_id: i64) -> Result<()> {
        self.repository.delete(project_id).await
    }
}
