use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An export format offered by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOption {
    pub name: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}
