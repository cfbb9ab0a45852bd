use crate::error::{DoccanoError, Result};
use crate::models::Role;
use crate::session::ApiClient;

#[derive(Debug, Clone)]
pub struct RoleRepository {
    client: ApiClient,
}

impl RoleRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Role>> {
        self.client.get("roles").await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Role> {
        self.list()
            .await?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| DoccanoError::not_found("role", name))
    }
}
