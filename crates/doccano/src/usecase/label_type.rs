use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::models::{LabelType, LabelTypeKind, PrefixKey, SuffixKey};
use crate::repositories::LabelTypeRepository;
use crate::services::LabelTypeService;

/// Input for a new label type.
#[derive(Debug, Clone, Default)]
pub struct NewLabelType {
    pub text: String,
    pub prefix_key: Option<PrefixKey>,
    pub suffix_key: Option<SuffixKey>,
    /// Random when unset.
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

impl NewLabelType {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Fields to change on a label type.
///
/// The shortcut keys are doubly optional: `Some(None)` clears a key.
#[derive(Debug, Clone, Default)]
pub struct LabelTypePatch {
    pub text: Option<String>,
    pub prefix_key: Option<Option<PrefixKey>>,
    pub suffix_key: Option<Option<SuffixKey>>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

/// Label-type management for one family, with duplicate checks.
#[derive(Debug, Clone)]
pub struct LabelTypeUseCase {
    repository: LabelTypeRepository,
    service: LabelTypeService,
}

impl LabelTypeUseCase {
    pub fn new(repository: LabelTypeRepository) -> Self {
        let service = LabelTypeService::new(repository.clone());
        Self {
            repository,
            service,
        }
    }

    pub fn kind(&self) -> LabelTypeKind {
        self.repository.kind()
    }

    pub async fn find_by_id(&self, project_id: i64, label_type_id: i64) -> Result<LabelType> {
        self.repository.find_by_id(project_id, label_type_id).await
    }

    pub async fn find_by_name(&self, project_id: i64, name: &str) -> Result<LabelType> {
        self.repository.find_by_name(project_id, name).await
    }

    pub async fn list(&self, project_id: i64) -> Result<Vec<LabelType>> {
        self.repository.list(project_id).await
    }

    /// Create a label type unless its text or shortcut is already taken.
    pub async fn create(&self, project_id: i64, input: NewLabelType) -> Result<LabelType> {
        let mut label_type =
            LabelType::new(input.text)?.shortcut(input.prefix_key, input.suffix_key);
        if let Some(color) = input.background_color {
            label_type = label_type.background_color(color);
        }
        if let Some(color) = input.text_color {
            label_type = label_type.text_color(color);
        }
        label_type.normalize()?;

        self.ensure_unique(project_id, &label_type).await?;
        self.repository.create(project_id, &label_type).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        label_type_id: i64,
        patch: LabelTypePatch,
    ) -> Result<LabelType> {
        let mut label_type = self.repository.find_by_id(project_id, label_type_id).await?;
        label_type.id = Some(label_type_id);
        if let Some(text) = patch.text {
            label_type.text = text;
        }
        if let Some(prefix_key) = patch.prefix_key {
            label_type.prefix_key = prefix_key;
        }
        if let Some(suffix_key) = patch.suffix_key {
            label_type.suffix_key = suffix_key;
        }
        if let Some(color) = patch.background_color {
            label_type.background_color = color;
        }
        if let Some(color) = patch.text_color {
            label_type.text_color = color;
        }
        label_type.normalize()?;

        self.ensure_unique(project_id, &label_type).await?;
        self.repository.update(project_id, &label_type).await
    }

    pub async fn delete(&self, project_id: i64, label_type_id: i64) -> Result<()> {
        self.repository.delete(project_id, label_type_id).await
    }

    pub async fn bulk_delete(&self, project_id: i64, label_type_ids: &[i64]) -> Result<()> {
        self.repository.bulk_delete(project_id, label_type_ids).await
    }

    /// Import label types from a JSON file.
    pub async fn upload(&self, project_id: i64, file_path: &Path) -> Result<()> {
        self.repository.upload(project_id, file_path).await
    }

    async fn ensure_unique(&self, project_id: i64, label_type: &LabelType) -> Result<()> {
        if self.service.exists(project_id, label_type).await? {
            tracing::debug!(
                "Rejecting duplicate {} {:?} in project {}",
                self.kind(),
                label_type.text,
                project_id
            );
            return Err(ValidationError::DuplicateLabelType(label_type.text.clone()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DoccanoError;
    use crate::http::{HttpMethod, MockTransport, json_response};
    use crate::session::{api, mock_client};
    use serde_json::json;

    fn usecase(transport: &MockTransport) -> LabelTypeUseCase {
        LabelTypeUseCase::new(LabelTypeRepository::new(
            mock_client(transport),
            LabelTypeKind::Span,
        ))
    }

    fn stored() -> serde_json::Value {
        json!([
            {"id": 1, "text": "PER", "prefix_key": "ctrl", "suffix_key": "p",
             "background_color": "#ff0000", "text_color": "#ffffff"},
            {"id": 2, "text": "ORG", "background_color": "#00ff00", "text_color": "#ffffff"}
        ])
    }

    #[tokio::test]
    async fn create_rejects_duplicate_text_without_posting() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types"),
            json_response(200, stored()),
        );

        let err = usecase(&transport)
            .create(1, NewLabelType::new("PER"))
            .await
            .expect_err("duplicate");
        assert!(matches!(
            err,
            DoccanoError::Validation(ValidationError::DuplicateLabelType(ref t)) if t == "PER"
        ));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_prefix_without_suffix_before_any_request() {
        let transport = MockTransport::new();
        let input = NewLabelType {
            prefix_key: Some(PrefixKey::Shift),
            ..NewLabelType::new("LOC")
        };
        let err = usecase(&transport).create(1, input).await.expect_err("invalid");
        assert!(matches!(
            err,
            DoccanoError::Validation(ValidationError::PrefixWithoutSuffix)
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn create_posts_new_label_type() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types"),
            json_response(200, stored()),
        );
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/span-types"),
            json_response(201, json!({"id": 3, "text": "LOC", "background_color": "#0000ff"})),
        );

        let input = NewLabelType {
            suffix_key: Some(SuffixKey::try_from('l').expect("key")),
            background_color: Some("#0000ff".into()),
            ..NewLabelType::new("LOC")
        };
        let created = usecase(&transport).create(1, input).await.expect("create");
        assert_eq!(created.id, Some(3));

        let body = transport.requests()[1].json_body().expect("body");
        assert_eq!(body["suffix_key"], "l");
        assert_eq!(body["background_color"], "#0000ff");
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn update_may_keep_own_text_and_clear_shortcut() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types/1"),
            json_response(200, stored()[0].clone()),
        );
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types"),
            json_response(200, stored()),
        );
        transport.push_response(
            HttpMethod::Put,
            api("projects/1/span-types/1"),
            json_response(200, json!({"id": 1, "text": "PER"})),
        );

        let patch = LabelTypePatch {
            prefix_key: Some(None),
            suffix_key: Some(None),
            ..LabelTypePatch::default()
        };
        usecase(&transport).update(1, 1, patch).await.expect("update");

        let body = transport.requests()[2].json_body().expect("body");
        assert_eq!(body["text"], "PER");
        assert_eq!(body["prefix_key"], serde_json::Value::Null);
        assert_eq!(body["suffix_key"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn update_rejects_text_of_another_type() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types/2"),
            json_response(200, stored()[1].clone()),
        );
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types"),
            json_response(200, stored()),
        );

        let patch = LabelTypePatch {
            text: Some("PER".into()),
            ..LabelTypePatch::default()
        };
        let err = usecase(&transport).update(1, 2, patch).await.expect_err("dup");
        assert!(matches!(
            err,
            DoccanoError::Validation(ValidationError::DuplicateLabelType(_))
        ));
    }
}
