use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::project::ProjectType;

/// Task name sent with an import, selecting how the server parses files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    DocumentClassification,
    SequenceLabeling,
    Seq2seq,
    Speech2text,
    ImageClassification,
    BoundingBox,
    Segmentation,
    ImageCaptioning,
    IntentDetectionAndSlotFilling,
    RelationExtraction,
}

impl From<ProjectType> for Task {
    fn from(project_type: ProjectType) -> Self {
        match project_type {
            ProjectType::DocumentClassification => Task::DocumentClassification,
            ProjectType::SequenceLabeling => Task::SequenceLabeling,
            ProjectType::Seq2seq => Task::Seq2seq,
            ProjectType::Speech2text => Task::Speech2text,
            ProjectType::ImageClassification => Task::ImageClassification,
            ProjectType::BoundingBox => Task::BoundingBox,
            ProjectType::Segmentation => Task::Segmentation,
            ProjectType::ImageCaptioning => Task::ImageCaptioning,
            ProjectType::IntentDetectionAndSlotFilling => Task::IntentDetectionAndSlotFilling,
        }
    }
}

/// An import format offered by the project catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOption {
    #[serde(default)]
    pub task_id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub accept_types: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Column names for tabular formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column_data: String,
    pub column_label: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            column_data: "text".to_string(),
            column_label: "label".to_string(),
        }
    }
}
