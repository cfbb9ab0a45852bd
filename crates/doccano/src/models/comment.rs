use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discussion comment on an example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub text: String,
    pub example: i64,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(example: i64, text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            example,
            user: None,
            username: None,
            created_at: None,
        }
    }
}
