use crate::error::Result;
use crate::models::{PasswordChange, PasswordUpdated, UserDetails};
use crate::session::ApiClient;

/// Account details of the logged-in user.
#[derive(Debug, Clone)]
pub struct UserDetailsRepository {
    client: ApiClient,
}

impl UserDetailsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_current_user_details(&self) -> Result<UserDetails> {
        self.client.get("auth/user/").await
    }

    pub async fn update_current_user_details(&self, details: &UserDetails) -> Result<UserDetails> {
        self.client.put("auth/user/", details).await
    }

    pub async fn change_current_user_password(
        &self,
        change: &PasswordChange,
    ) -> Result<PasswordUpdated> {
        self.client.post("auth/password/change/", change).await
    }
}
