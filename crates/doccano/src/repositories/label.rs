use std::marker::PhantomData;

use crate::error::Result;
use crate::models::LabelVariant;
use crate::session::ApiClient;

use super::{IntoId, require_id};

/// Labels of one variant on one example.
///
/// The URL segment (`categories`, `spans`, ...) comes from `T::KIND`.
#[derive(Debug, Clone)]
pub struct LabelRepository<T> {
    client: ApiClient,
    _label: PhantomData<fn() -> T>,
}

impl<T: LabelVariant> LabelRepository<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _label: PhantomData,
        }
    }

    fn base(project_id: i64, example_id: i64) -> String {
        format!(
            "projects/{project_id}/examples/{example_id}/{}",
            T::KIND.segment()
        )
    }

    pub async fn find_by_id(&self, project_id: i64, example_id: i64, label_id: i64) -> Result<T> {
        self.client
            .get(&format!("{}/{label_id}", Self::base(project_id, example_id)))
            .await
    }

    pub async fn list(&self, project_id: i64, example_id: i64) -> Result<Vec<T>> {
        self.client.get(&Self::base(project_id, example_id)).await
    }

    /// Validate locally, then create.
    pub async fn create(&self, project_id: i64, label: &T) -> Result<T> {
        label.validate()?;
        let mut payload = label.clone();
        payload.meta_mut().id = None;
        let resource = Self::base(project_id, payload.meta().example);
        self.client.post(&resource, &payload).await
    }

    pub async fn update(&self, project_id: i64, label: &T) -> Result<T> {
        let id = require_id(label.meta().id, "label")?;
        label.validate()?;
        let resource = format!("{}/{id}", Self::base(project_id, label.meta().example));
        self.client.put(&resource, label).await
    }

    pub async fn delete(&self, project_id: i64, label: &T) -> Result<()> {
        let id = require_id(label.meta().id, "label")?;
        let resource = format!("{}/{id}", Self::base(project_id, label.meta().example));
        self.client.delete(&resource).await
    }

    /// Delete a label by id when the record is not at hand.
    pub async fn delete_by_id(
        &self,
        project_id: i64,
        example_id: i64,
        label: impl IntoId,
    ) -> Result<()> {
        let id = label.into_id()?;
        self.client
            .delete(&format!("{}/{id}", Self::base(project_id, example_id)))
            .await
    }

    /// Delete every label of this variant on the example.
    pub async fn delete_all(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.client.delete(&Self::base(project_id, example_id)).await
    }
}
