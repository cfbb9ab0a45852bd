use serde::{Deserialize, Serialize};

/// Profile of the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body of a password change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub new_password1: String,
    pub new_password2: String,
}

/// Server acknowledgement of a password change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordUpdated {
    pub detail: String,
}
