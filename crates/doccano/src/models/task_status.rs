use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State of a server-side import or export job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl TaskStatus {
    /// Ready and without an error payload.
    pub fn succeeded(&self) -> bool {
        self.ready && self.error.as_ref().is_none_or(Value::is_null)
    }
}
