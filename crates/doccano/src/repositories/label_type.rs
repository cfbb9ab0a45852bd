use std::path::Path;

use crate::error::{DoccanoError, Result};
use crate::http::MultipartForm;
use crate::models::{LabelType, LabelTypeKind};
use crate::session::ApiClient;

use super::{Ids, IntoId, require_id};

/// Category, span or relation types of a project, selected by `kind`.
#[derive(Debug, Clone)]
pub struct LabelTypeRepository {
    client: ApiClient,
    kind: LabelTypeKind,
}

impl LabelTypeRepository {
    pub fn new(client: ApiClient, kind: LabelTypeKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> LabelTypeKind {
        self.kind
    }

    pub async fn find_by_id(&self, project_id: i64, label_type_id: i64) -> Result<LabelType> {
        self.client
            .get(&self.kind.item_resource(project_id, label_type_id))
            .await
    }

    /// First label type whose text equals `name`.
    pub async fn find_by_name(&self, project_id: i64, name: &str) -> Result<LabelType> {
        self.list(project_id)
            .await?
            .into_iter()
            .find(|lt| lt.text == name)
            .ok_or_else(|| DoccanoError::not_found(self.kind.as_str(), name))
    }

    pub async fn list(&self, project_id: i64) -> Result<Vec<LabelType>> {
        self.client.get(&self.kind.list_resource(project_id)).await
    }

    pub async fn create(&self, project_id: i64, label_type: &LabelType) -> Result<LabelType> {
        let mut payload = label_type.clone();
        payload.normalize()?;
        payload.id = None;
        self.client
            .post(&self.kind.list_resource(project_id), &payload)
            .await
    }

    pub async fn update(&self, project_id: i64, label_type: &LabelType) -> Result<LabelType> {
        let id = require_id(label_type.id, "label type")?;
        let mut payload = label_type.clone();
        payload.normalize()?;
        self.client
            .put(&self.kind.item_resource(project_id, id), &payload)
            .await
    }

    pub async fn delete(&self, project_id: i64, label_type: impl IntoId) -> Result<()> {
        let id = label_type.into_id()?;
        self.client
            .delete(&self.kind.item_resource(project_id, id))
            .await
    }

    pub async fn bulk_delete<I, T>(&self, project_id: i64, label_types: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoId,
    {
        let ids = Ids::collect(label_types)?;
        self.client
            .delete_with(&self.kind.list_resource(project_id), &ids)
            .await
    }

    /// Upload a JSON file of label types.
    pub async fn upload(&self, project_id: i64, file_path: &Path) -> Result<()> {
        let data = tokio::fs::read(file_path).await?;
        let file_name = file_name_of(file_path);
        let form = MultipartForm::new().file("file", file_name, Some("application/json"), data);
        self.client
            .post_multipart(&self.kind.upload_resource(project_id), form)
            .await
            .map(|_| ())
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
