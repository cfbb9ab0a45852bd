use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single document, image or audio clip to annotate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub annotation_approver: Option<String>,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub upload_name: String,
    /// Model confidence, when the example was pre-annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Example {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }
}
