//! Project model.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

pub const DEFAULT_GUIDELINE: &str = "Please write annotation guideline.";

/// Kind of annotation work a project holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    DocumentClassification,
    SequenceLabeling,
    Seq2seq,
    Speech2text,
    ImageClassification,
    BoundingBox,
    Segmentation,
    ImageCaptioning,
    IntentDetectionAndSlotFilling,
}

impl ProjectType {
    pub const ALL: [ProjectType; 9] = [
        ProjectType::DocumentClassification,
        ProjectType::SequenceLabeling,
        ProjectType::Seq2seq,
        ProjectType::Speech2text,
        ProjectType::ImageClassification,
        ProjectType::BoundingBox,
        ProjectType::Segmentation,
        ProjectType::ImageCaptioning,
        ProjectType::IntentDetectionAndSlotFilling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::DocumentClassification => "DocumentClassification",
            ProjectType::SequenceLabeling => "SequenceLabeling",
            ProjectType::Seq2seq => "Seq2seq",
            ProjectType::Speech2text => "Speech2text",
            ProjectType::ImageClassification => "ImageClassification",
            ProjectType::BoundingBox => "BoundingBox",
            ProjectType::Segmentation => "Segmentation",
            ProjectType::ImageCaptioning => "ImageCaptioning",
            ProjectType::IntentDetectionAndSlotFilling => "IntentDetectionAndSlotFilling",
        }
    }

    /// Polymorphic model name the server expects as `resourcetype`.
    pub fn resource_type(self) -> &'static str {
        match self {
            ProjectType::DocumentClassification => "TextClassificationProject",
            ProjectType::SequenceLabeling => "SequenceLabelingProject",
            ProjectType::Seq2seq => "Seq2seqProject",
            ProjectType::Speech2text => "Speech2textProject",
            ProjectType::ImageClassification => "ImageClassificationProject",
            ProjectType::BoundingBox => "BoundingBoxProject",
            ProjectType::Segmentation => "SegmentationProject",
            ProjectType::ImageCaptioning => "ImageCaptioningProject",
            ProjectType::IntentDetectionAndSlotFilling => "IntentDetectionAndSlotFillingProject",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::Other(format!("unknown project type {s:?}")))
    }
}

/// An annotation project.
///
/// Serializing a project always adds the `resourcetype` derived from
/// [`Project::project_type`]; it is not a field callers can set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    #[serde(default = "default_guideline")]
    pub guideline: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub random_order: bool,
    #[serde(default)]
    pub collaborative_annotation: bool,
    #[serde(default)]
    pub single_class_classification: bool,
    #[serde(default)]
    pub allow_overlapping: bool,
    #[serde(default)]
    pub grapheme_mode: bool,
    #[serde(default)]
    pub use_relation: bool,
    #[serde(default, deserialize_with = "tags_from_wire")]
    pub tags: Vec<String>,
}

fn default_guideline() -> String {
    DEFAULT_GUIDELINE.to_string()
}

#[derive(Serialize, Deserialize)]
struct WireTag {
    text: String,
}

fn tags_from_wire<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<WireTag>>::deserialize(deserializer)?;
    Ok(tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.text)
        .collect())
}

#[derive(Serialize)]
struct ProjectPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    name: &'a str,
    description: &'a str,
    guideline: &'a str,
    project_type: ProjectType,
    resourcetype: &'static str,
    random_order: bool,
    collaborative_annotation: bool,
    single_class_classification: bool,
    allow_overlapping: bool,
    grapheme_mode: bool,
    use_relation: bool,
    tags: Vec<WireTag>,
}

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProjectPayload {
            id: self.id,
            name: &self.name,
            description: &self.description,
            guideline: &self.guideline,
            project_type: self.project_type,
            resourcetype: self.resource_type(),
            random_order: self.random_order,
            collaborative_annotation: self.collaborative_annotation,
            single_class_classification: self.single_class_classification,
            allow_overlapping: self.allow_overlapping,
            grapheme_mode: self.grapheme_mode,
            use_relation: self.use_relation,
            tags: self
                .tags
                .iter()
                .map(|t| WireTag { text: t.clone() })
                .collect(),
        }
        .serialize(serializer)
    }
}

impl Project {
    /// A new, unsaved project with default flags.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        project_type: ProjectType,
    ) -> Result<Self, ValidationError> {
        let mut project = Self {
            id: None,
            name: name.into(),
            description: description.into(),
            guideline: default_guideline(),
            project_type,
            random_order: false,
            collaborative_annotation: false,
            single_class_classification: false,
            allow_overlapping: false,
            grapheme_mode: false,
            use_relation: false,
            tags: Vec::new(),
        };
        project.normalize()?;
        Ok(project)
    }

    pub fn resource_type(&self) -> &'static str {
        self.project_type.resource_type()
    }

    /// Trim `name` and `description` and check their lengths.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();

        let name_len = self.name.chars().count();
        if !(1..=100).contains(&name_len) {
            return Err(ValidationError::Length {
                field: "name",
                min: 1,
                max: 100,
            });
        }
        if self.description.is_empty() {
            return Err(ValidationError::Length {
                field: "description",
                min: 1,
                max: usize::MAX,
            });
        }
        Ok(())
    }
}
