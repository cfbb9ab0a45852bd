use crate::error::{DoccanoError, Result};
use crate::models::User;
use crate::session::{ApiClient, with_query};

#[derive(Debug, Clone)]
pub struct UserRepository {
    client: ApiClient,
}

impl UserRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The logged-in user.
    pub async fn get_profile(&self) -> Result<User> {
        self.client.get("me").await
    }

    /// Users whose name matches the server-side search `name`.
    pub async fn list(&self, name: &str) -> Result<Vec<User>> {
        self.client
            .get(&with_query("users", &[("q", name.to_string())]))
            .await
    }

    /// The user whose username equals `username` exactly.
    pub async fn find_by_name(&self, username: &str) -> Result<User> {
        self.list(username)
            .await?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| DoccanoError::not_found("user", username))
    }
}
