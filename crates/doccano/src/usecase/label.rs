//! Creating and editing annotations.
//!
//! Label types may be given by id or by name. Names are looked up in the
//! label-type family that matches the variant (categories, segments and
//! bounding boxes use category types). Local shape checks always run before
//! the name lookup.

use crate::error::{DoccanoError, Result};
use crate::models::{
    BoundingBox, Category, LabelMeta, LabelVariant, Relation, Segment, Span, Text,
};
use crate::repositories::{LabelRepository, LabelTypeRepository, require_id};

use super::LabelTypeRef;

/// Flags recorded alongside a new label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelOptions {
    pub manual: bool,
    pub prob: f64,
}

impl LabelOptions {
    fn apply(self, meta: &mut LabelMeta) {
        meta.manual = self.manual;
        meta.prob = self.prob;
    }
}

fn patch_meta(meta: &mut LabelMeta, manual: Option<bool>, prob: Option<f64>) {
    if let Some(manual) = manual {
        meta.manual = manual;
    }
    if let Some(prob) = prob {
        meta.prob = prob;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub label: Option<LabelTypeRef>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SpanPatch {
    pub label: Option<LabelTypeRef>,
    pub start_offset: Option<usize>,
    pub end_offset: Option<usize>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct RelationPatch {
    pub from_id: Option<i64>,
    pub to_id: Option<i64>,
    pub relation_type: Option<LabelTypeRef>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TextPatch {
    pub text: Option<String>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SegmentPatch {
    pub label: Option<LabelTypeRef>,
    pub points: Option<Vec<f64>>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct BoundingBoxPatch {
    pub label: Option<LabelTypeRef>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub manual: Option<bool>,
    pub prob: Option<f64>,
}

/// Labels of one variant.
#[derive(Debug, Clone)]
pub struct LabelUseCase<T> {
    repository: LabelRepository<T>,
    label_types: Option<LabelTypeRepository>,
}

impl<T: LabelVariant> LabelUseCase<T> {
    /// `label_types` resolves names; pass `None` for variants without label types.
    pub fn new(repository: LabelRepository<T>, label_types: Option<LabelTypeRepository>) -> Self {
        Self {
            repository,
            label_types,
        }
    }

    pub async fn find_by_id(&self, project_id: i64, example_id: i64, label_id: i64) -> Result<T> {
        self.repository
            .find_by_id(project_id, example_id, label_id)
            .await
    }

    pub async fn list(&self, project_id: i64, example_id: i64) -> Result<Vec<T>> {
        self.repository.list(project_id, example_id).await
    }

    /// Fetch the label, then delete it.
    pub async fn delete(&self, project_id: i64, example_id: i64, label_id: i64) -> Result<()> {
        self.repository
            .delete_by_id(project_id, example_id, label_id)
            .await
    }

    pub async fn delete_all(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.repository.delete_all(project_id, example_id).await
    }

    async fn resolve(&self, project_id: i64, label: LabelTypeRef) -> Result<i64> {
        match label {
            LabelTypeRef::Id(id) => Ok(id),
            LabelTypeRef::Name(name) => {
                let repository = self.label_types.as_ref().ok_or_else(|| {
                    DoccanoError::validation(format!(
                        "{} labels have no label types to look up {name:?} in",
                        T::KIND.segment()
                    ))
                })?;
                let label_type = repository.find_by_name(project_id, &name).await?;
                require_id(label_type.id, "label type")
            }
        }
    }

    async fn current(&self, project_id: i64, example_id: i64, label_id: i64) -> Result<T> {
        let mut label = self.find_by_id(project_id, example_id, label_id).await?;
        label.meta_mut().id = Some(label_id);
        label.meta_mut().example = example_id;
        Ok(label)
    }
}

impl LabelUseCase<Category> {
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        label: impl Into<LabelTypeRef>,
        options: LabelOptions,
    ) -> Result<Category> {
        let label = self.resolve(project_id, label.into()).await?;
        let mut category = Category::new(example_id, label);
        options.apply(&mut category.meta);
        self.repository.create(project_id, &category).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: CategoryPatch,
    ) -> Result<Category> {
        let mut category = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut category.meta, patch.manual, patch.prob);
        if let Some(label) = patch.label {
            category.label = self.resolve(project_id, label).await?;
        }
        self.repository.update(project_id, &category).await
    }
}

impl LabelUseCase<Span> {
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        start_offset: usize,
        end_offset: usize,
        label: impl Into<LabelTypeRef>,
        options: LabelOptions,
    ) -> Result<Span> {
        let mut span = Span::new(example_id, 0, start_offset, end_offset)?;
        span.label = self.resolve(project_id, label.into()).await?;
        options.apply(&mut span.meta);
        self.repository.create(project_id, &span).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: SpanPatch,
    ) -> Result<Span> {
        let mut span = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut span.meta, patch.manual, patch.prob);
        if let Some(start) = patch.start_offset {
            span.start_offset = start;
        }
        if let Some(end) = patch.end_offset {
            span.end_offset = end;
        }
        span.validate()?;
        if let Some(label) = patch.label {
            span.label = self.resolve(project_id, label).await?;
        }
        self.repository.update(project_id, &span).await
    }
}

impl LabelUseCase<Relation> {
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        from_id: i64,
        to_id: i64,
        relation_type: impl Into<LabelTypeRef>,
        options: LabelOptions,
    ) -> Result<Relation> {
        let relation_type = self.resolve(project_id, relation_type.into()).await?;
        let mut relation = Relation::new(example_id, from_id, to_id, relation_type);
        options.apply(&mut relation.meta);
        self.repository.create(project_id, &relation).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: RelationPatch,
    ) -> Result<Relation> {
        let mut relation = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut relation.meta, patch.manual, patch.prob);
        if let Some(from_id) = patch.from_id {
            relation.from_id = from_id;
        }
        if let Some(to_id) = patch.to_id {
            relation.to_id = to_id;
        }
        if let Some(relation_type) = patch.relation_type {
            relation.relation_type = self.resolve(project_id, relation_type).await?;
        }
        self.repository.update(project_id, &relation).await
    }
}

impl LabelUseCase<Text> {
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        text: impl Into<String>,
        options: LabelOptions,
    ) -> Result<Text> {
        let mut label = Text::new(example_id, text);
        options.apply(&mut label.meta);
        self.repository.create(project_id, &label).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: TextPatch,
    ) -> Result<Text> {
        let mut label = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut label.meta, patch.manual, patch.prob);
        if let Some(text) = patch.text {
            label.text = text;
        }
        self.repository.update(project_id, &label).await
    }
}

impl LabelUseCase<Segment> {
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        points: Vec<f64>,
        label: impl Into<LabelTypeRef>,
        options: LabelOptions,
    ) -> Result<Segment> {
        let mut segment = Segment::new(example_id, 0, points)?;
        segment.label = self.resolve(project_id, label.into()).await?;
        options.apply(&mut segment.meta);
        self.repository.create(project_id, &segment).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: SegmentPatch,
    ) -> Result<Segment> {
        let mut segment = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut segment.meta, patch.manual, patch.prob);
        if let Some(points) = patch.points {
            segment.points = points;
        }
        segment.validate()?;
        if let Some(label) = patch.label {
            segment.label = self.resolve(project_id, label).await?;
        }
        self.repository.update(project_id, &segment).await
    }
}

impl LabelUseCase<BoundingBox> {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        project_id: i64,
        example_id: i64,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        label: impl Into<LabelTypeRef>,
        options: LabelOptions,
    ) -> Result<BoundingBox> {
        let mut bbox = BoundingBox::new(example_id, 0, x, y, width, height)?;
        bbox.label = self.resolve(project_id, label.into()).await?;
        options.apply(&mut bbox.meta);
        self.repository.create(project_id, &bbox).await
    }

    pub async fn update(
        &self,
        project_id: i64,
        example_id: i64,
        label_id: i64,
        patch: BoundingBoxPatch,
    ) -> Result<BoundingBox> {
        let mut bbox = self.current(project_id, example_id, label_id).await?;
        patch_meta(&mut bbox.meta, patch.manual, patch.prob);
        if let Some(x) = patch.x {
            bbox.x = x;
        }
        if let Some(y) = patch.y {
            bbox.y = y;
        }
        if let Some(width) = patch.width {
            bbox.width = width;
        }
        if let Some(height) = patch.height {
            bbox.height = height;
        }
        bbox.validate()?;
        if let Some(label) = patch.label {
            bbox.label = self.resolve(project_id, label).await?;
        }
        self.repository.update(project_id, &bbox).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::http::{HttpMethod, MockTransport, json_response};
    use crate::models::LabelTypeKind;
    use crate::session::{api, mock_client};
    use serde_json::json;

    fn usecase<T: LabelVariant>(transport: &MockTransport) -> LabelUseCase<T> {
        let client = mock_client(transport);
        let label_types = T::KIND
            .label_type_kind()
            .map(|kind| LabelTypeRepository::new(client.clone(), kind));
        LabelUseCase::new(LabelRepository::new(client), label_types)
    }

    #[tokio::test]
    async fn span_create_resolves_label_name() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/span-types"),
            json_response(200, json!([{"id": 7, "text": "PER", "background_color": "#ff0000"}])),
        );
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/examples/3/spans"),
            json_response(
                201,
                json!({"id": 11, "example": 3, "label": 7, "start_offset": 0, "end_offset": 4}),
            ),
        );

        let span = usecase::<Span>(&transport)
            .create(1, 3, 0, 4, "PER", LabelOptions::default())
            .await
            .expect("create");
        assert_eq!(span.meta.id, Some(11));

        let body = transport.requests()[1].json_body().expect("body");
        assert_eq!(body["label"], 7);
        assert_eq!(body["example"], 3);
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn bad_offsets_fail_before_any_request() {
        let transport = MockTransport::new();
        let err = usecase::<Span>(&transport)
            .create(1, 3, 5, 5, "PER", LabelOptions::default())
            .await
            .expect_err("invalid span");
        assert!(matches!(
            err,
            DoccanoError::Validation(ValidationError::SpanOffsets { start: 5, end: 5 })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn odd_segment_points_fail_before_any_request() {
        let transport = MockTransport::new();
        let err = usecase::<Segment>(&transport)
            .create(1, 3, vec![0.0, 1.0, 2.0], 1, LabelOptions::default())
            .await
            .expect_err("invalid segment");
        assert!(matches!(
            err,
            DoccanoError::Validation(ValidationError::OddSegmentPoints(3))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn segment_names_resolve_against_category_types() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/category-types"),
            json_response(200, json!([{"id": 4, "text": "cat", "background_color": "#ff0000"}])),
        );
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/examples/3/segments"),
            json_response(201, json!({"id": 1, "example": 3, "label": 4, "points": [0.0, 0.0]})),
        );

        usecase::<Segment>(&transport)
            .create(1, 3, vec![0.0, 0.0], "cat", LabelOptions::default())
            .await
            .expect("create");
        assert_eq!(transport.requests()[1].json_body().expect("body")["label"], 4);
        assert_eq!(Segment::KIND.label_type_kind(), Some(LabelTypeKind::Category));
    }

    #[tokio::test]
    async fn unknown_label_name_is_not_found() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/category-types"),
            json_response(200, json!([])),
        );
        let err = usecase::<Category>(&transport)
            .create(1, 3, "missing", LabelOptions::default())
            .await
            .expect_err("not found");
        assert!(err.is_not_found());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_with_fetched_label() {
        let transport = MockTransport::new();
        let item = api("projects/1/examples/3/spans/11");
        transport.push_response(
            HttpMethod::Get,
            &item,
            json_response(
                200,
                json!({
                    "id": 11,
                    "example": 3,
                    "label": 7,
                    "start_offset": 0,
                    "end_offset": 4,
                    "prob": 0.5,
                }),
            ),
        );
        transport.push_response(
            HttpMethod::Put,
            &item,
            json_response(
                200,
                json!({"id": 11, "example": 3, "label": 7, "start_offset": 0, "end_offset": 9}),
            ),
        );

        let patch = SpanPatch {
            end_offset: Some(9),
            manual: Some(true),
            ..SpanPatch::default()
        };
        usecase::<Span>(&transport)
            .update(1, 3, 11, patch)
            .await
            .expect("update");

        let body = transport.requests()[1].json_body().expect("body");
        assert_eq!(body["id"], 11);
        assert_eq!(body["end_offset"], 9);
        assert_eq!(body["label"], 7);
        assert_eq!(body["prob"], 0.5);
        assert_eq!(body["manual"], true);
    }

    #[tokio::test]
    async fn delete_targets_label_by_id() {
        let transport = MockTransport::new();
        let item = api("projects/1/examples/3/texts/2");
        transport.push_response(HttpMethod::Delete, &item, json_response(204, json!(null)));

        usecase::<Text>(&transport)
            .delete(1, 3, 2)
            .await
            .expect("delete");
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, item);
    }

    #[tokio::test]
    async fn text_labels_cannot_resolve_names() {
        let transport = MockTransport::new();
        let usecase = usecase::<Text>(&transport);
        let err = usecase
            .resolve(1, LabelTypeRef::from("anything"))
            .await
            .expect_err("no label types");
        assert!(matches!(err, DoccanoError::Validation(_)));
    }
}
