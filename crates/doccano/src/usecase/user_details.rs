use crate::error::{Result, ValidationError};
use crate::models::{PasswordChange, PasswordUpdated, UserDetails};
use crate::repositories::UserDetailsRepository;

#[derive(Debug, Clone, Default)]
pub struct UserDetailsPatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The logged-in account's profile and password.
#[derive(Debug, Clone)]
pub struct UserDetailsUseCase {
    repository: UserDetailsRepository,
}

impl UserDetailsUseCase {
    pub fn new(repository: UserDetailsRepository) -> Self {
        Self { repository }
    }

    pub async fn get(&self) -> Result<UserDetails> {
        self.repository.get_current_user_details().await
    }

    pub async fn update(&self, patch: UserDetailsPatch) -> Result<UserDetails> {
        let mut details = self.repository.get_current_user_details().await?;
        if let Some(username) = patch.username {
            details.username = username;
        }
        if let Some(first_name) = patch.first_name {
            details.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            details.last_name = last_name;
        }
        self.repository.update_current_user_details(&details).await
    }

    /// Change the password; both entries must match.
    pub async fn change_password(&self, password: &str, confirm: &str) -> Result<PasswordUpdated> {
        if password != confirm {
            return Err(ValidationError::PasswordMismatch.into());
        }
        let change = PasswordChange {
            new_password1: password.to_string(),
            new_password2: confirm.to_string(),
        };
        self.repository.change_current_user_password(&change).await
    }
}
