//! Annotations attached to an example.
//!
//! Every variant shares [`LabelMeta`] and adds its own shape. [`LabelKind`]
//! maps a variant to its URL segment and to the label-type family its
//! `label`/`type` field points into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::label_type::LabelTypeKind;
use crate::error::ValidationError;

/// Fields common to every label variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub example: i64,
    #[serde(default)]
    pub prob: f64,
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub user: Option<i64>,
}

impl LabelMeta {
    pub fn new(example: i64) -> Self {
        Self {
            id: None,
            example,
            prob: 0.0,
            manual: false,
            user: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Category,
    Span,
    Relation,
    Text,
    Segment,
    BoundingBox,
}

impl LabelKind {
    /// URL segment under `projects/{p}/examples/{e}/`.
    pub fn segment(self) -> &'static str {
        match self {
            LabelKind::Category => "categories",
            LabelKind::Span => "spans",
            LabelKind::Relation => "relations",
            LabelKind::Text => "texts",
            LabelKind::Segment => "segments",
            LabelKind::BoundingBox => "bboxes",
        }
    }

    /// Label-type family used to resolve names. Text labels have none.
    pub fn label_type_kind(self) -> Option<LabelTypeKind> {
        match self {
            LabelKind::Category | LabelKind::Segment | LabelKind::BoundingBox => {
                Some(LabelTypeKind::Category)
            }
            LabelKind::Span => Some(LabelTypeKind::Span),
            LabelKind::Relation => Some(LabelTypeKind::Relation),
            LabelKind::Text => None,
        }
    }
}

/// Behaviour shared by the concrete label structs.
pub trait LabelVariant: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: LabelKind;

    fn meta(&self) -> &LabelMeta;

    fn meta_mut(&mut self) -> &mut LabelMeta;

    /// Local shape checks, run before any request.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

macro_rules! label_variant {
    ($ty:ident, $kind:expr) => {
        impl LabelVariant for $ty {
            const KIND: LabelKind = $kind;

            fn meta(&self) -> &LabelMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut LabelMeta {
                &mut self.meta
            }
        }
    };
    ($ty:ident, $kind:expr, validated) => {
        impl LabelVariant for $ty {
            const KIND: LabelKind = $kind;

            fn meta(&self) -> &LabelMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut LabelMeta {
                &mut self.meta
            }

            fn validate(&self) -> Result<(), ValidationError> {
                self.check()
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub meta: LabelMeta,
    pub label: i64,
}

impl Category {
    pub fn new(example: i64, label: i64) -> Self {
        Self {
            meta: LabelMeta::new(example),
            label,
        }
    }
}

/// A labelled character range `[start_offset, end_offset)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(flatten)]
    pub meta: LabelMeta,
    pub label: i64,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Span {
    pub fn new(
        example: i64,
        label: i64,
        start_offset: usize,
        end_offset: usize,
    ) -> Result<Self, ValidationError> {
        let span = Self {
            meta: LabelMeta::new(example),
            label,
            start_offset,
            end_offset,
        };
        span.check()?;
        Ok(span)
    }

    fn check(&self) -> Result<(), ValidationError> {
        if self.start_offset >= self.end_offset {
            return Err(ValidationError::SpanOffsets {
                start: self.start_offset,
                end: self.end_offset,
            });
        }
        Ok(())
    }
}

/// A typed edge between two spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(flatten)]
    pub meta: LabelMeta,
    pub from_id: i64,
    pub to_id: i64,
    #[serde(rename = "type")]
    pub relation_type: i64,
}

impl Relation {
    pub fn new(example: i64, from_id: i64, to_id: i64, relation_type: i64) -> Self {
        Self {
            meta: LabelMeta::new(example),
            from_id,
            to_id,
            relation_type,
        }
    }
}

/// Free text, used by seq2seq, captioning and speech projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(flatten)]
    pub meta: LabelMeta,
    pub text: String,
}

impl Text {
    pub fn new(example: i64, text: impl Into<String>) -> Self {
        Self {
            meta: LabelMeta::new(example),
            text: text.into(),
        }
    }
}

/// A polygon given as a flat `[x0, y0, x1, y1, ...]` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(flatten)]
    pub meta: LabelMeta,
    #[serde(default)]
    pub points: Vec<f64>,
    pub label: i64,
}

impl Segment {
    pub fn new(example: i64, label: i64, points: Vec<f64>) -> Result<Self, ValidationError> {
        let segment = Self {
            meta: LabelMeta::new(example),
            points,
            label,
        };
        segment.check()?;
        Ok(segment)
    }

    fn check(&self) -> Result<(), ValidationError> {
        if self.points.len() % 2 != 0 {
            return Err(ValidationError::OddSegmentPoints(self.points.len()));
        }
        if !self.points.iter().copied().all(non_negative) {
            return Err(ValidationError::Negative { field: "points" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(flatten)]
    pub meta: LabelMeta,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: i64,
}

impl BoundingBox {
    pub fn new(
        example: i64,
        label: i64,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, ValidationError> {
        let bbox = Self {
            meta: LabelMeta::new(example),
            x,
            y,
            width,
            height,
            label,
        };
        bbox.check()?;
        Ok(bbox)
    }

    fn check(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !non_negative(value) {
                return Err(ValidationError::Negative { field });
            }
        }
        Ok(())
    }
}

/// NaN and infinities are rejected along with negatives.
fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

label_variant!(Category, LabelKind::Category);
label_variant!(Span, LabelKind::Span, validated);
label_variant!(Relation, LabelKind::Relation);
label_variant!(Text, LabelKind::Text);
label_variant!(Segment, LabelKind::Segment, validated);
label_variant!(BoundingBox, LabelKind::BoundingBox, validated);

/// Any label variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Category(Category),
    Span(Span),
    Relation(Relation),
    Text(Text),
    Segment(Segment),
    BoundingBox(BoundingBox),
}

impl Label {
    pub fn kind(&self) -> LabelKind {
        match self {
            Label::Category(_) => LabelKind::Category,
            Label::Span(_) => LabelKind::Span,
            Label::Relation(_) => LabelKind::Relation,
            Label::Text(_) => LabelKind::Text,
            Label::Segment(_) => LabelKind::Segment,
            Label::BoundingBox(_) => LabelKind::BoundingBox,
        }
    }

    pub fn meta(&self) -> &LabelMeta {
        match self {
            Label::Category(l) => &l.meta,
            Label::Span(l) => &l.meta,
            Label::Relation(l) => &l.meta,
            Label::Text(l) => &l.meta,
            Label::Segment(l) => &l.meta,
            Label::BoundingBox(l) => &l.meta,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Label::Category(l) => l.validate(),
            Label::Span(l) => l.validate(),
            Label::Relation(l) => l.validate(),
            Label::Text(l) => l.validate(),
            Label::Segment(l) => l.validate(),
            Label::BoundingBox(l) => l.validate(),
        }
    }
}

macro_rules! label_from {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Label {
                fn from(label: $ty) -> Self {
                    Label::$ty(label)
                }
            }
        )*
    };
}

label_from!(Category, Span, Relation, Text, Segment, BoundingBox);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip<T: LabelVariant + PartialEq + std::fmt::Debug>(label: T) {
        let value = serde_json::to_value(&label).expect("serialize");
        let back: T = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, label);
    }

    #[test]
    fn span_requires_start_before_end() {
        assert_eq!(
            Span::new(1, 2, 5, 5),
            Err(ValidationError::SpanOffsets { start: 5, end: 5 })
        );
        assert!(Span::new(1, 2, 6, 5).is_err());
        assert!(Span::new(1, 2, 0, 5).is_ok());
    }

    #[test]
    fn segment_requires_even_non_negative_points() {
        assert_eq!(
            Segment::new(1, 2, vec![0.0, 1.0, 2.0]),
            Err(ValidationError::OddSegmentPoints(3))
        );
        assert_eq!(
            Segment::new(1, 2, vec![0.0, -1.0]),
            Err(ValidationError::Negative { field: "points" })
        );
        assert_eq!(
            Segment::new(1, 2, vec![f64::NAN, 1.0]),
            Err(ValidationError::Negative { field: "points" })
        );
        assert!(Segment::new(1, 2, vec![0.0, 1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn bounding_box_rejects_negative_geometry() {
        assert_eq!(
            BoundingBox::new(1, 2, 0.0, 0.0, -1.0, 4.0),
            Err(ValidationError::Negative { field: "width" })
        );
        assert_eq!(
            BoundingBox::new(1, 2, 0.0, 0.0, f64::NAN, 1.0),
            Err(ValidationError::Negative { field: "width" })
        );
        assert_eq!(
            BoundingBox::new(1, 2, f64::INFINITY, 0.0, 1.0, 1.0),
            Err(ValidationError::Negative { field: "x" })
        );
        assert!(BoundingBox::new(1, 2, 0.5, 0.5, 10.0, 4.0).is_ok());
    }

    #[test]
    fn variants_survive_json_round_trip() {
        let mut category = Category::new(1, 7);
        category.meta.id = Some(3);
        category.meta.prob = 0.75;
        category.meta.manual = true;
        category.meta.user = Some(2);
        round_trip(category);

        round_trip(Span::new(1, 2, 3, 9).expect("valid"));
        round_trip(Relation::new(1, 10, 11, 4));
        round_trip(Text::new(1, "a caption"));
        round_trip(Segment::new(1, 2, vec![1.0, 2.0, 3.5, 4.5]).expect("valid"));
        round_trip(BoundingBox::new(1, 2, 1.0, 2.0, 3.0, 4.0).expect("valid"));
    }

    #[test]
    fn wire_shape_is_flat() {
        let relation = Relation::new(5, 10, 11, 4);
        assert_eq!(
            serde_json::to_value(&relation).expect("serialize"),
            json!({
                "example": 5,
                "prob": 0.0,
                "manual": false,
                "user": null,
                "from_id": 10,
                "to_id": 11,
                "type": 4
            })
        );

        let span: Span = serde_json::from_value(json!({
            "id": 1, "example": 2, "prob": 0, "manual": false, "user": 3,
            "label": 4, "start_offset": 0, "end_offset": 5
        }))
        .expect("deserialize");
        assert_eq!(span.meta.id, Some(1));
        assert_eq!(span.meta.user, Some(3));
    }

    #[test]
    fn kind_maps_segments_and_label_type_families() {
        let expected = [
            (LabelKind::Category, "categories", Some(LabelTypeKind::Category)),
            (LabelKind::Span, "spans", Some(LabelTypeKind::Span)),
            (LabelKind::Relation, "relations", Some(LabelTypeKind::Relation)),
            (LabelKind::Text, "texts", None),
            (LabelKind::Segment, "segments", Some(LabelTypeKind::Category)),
            (LabelKind::BoundingBox, "bboxes", Some(LabelTypeKind::Category)),
        ];
        for (kind, segment, family) in expected {
            assert_eq!(kind.segment(), segment);
            assert_eq!(kind.label_type_kind(), family);
        }

        let label: Label = Span::new(1, 2, 0, 1).expect("valid").into();
        assert_eq!(label.kind(), LabelKind::Span);
        assert_eq!(label.meta().example, 1);
        assert!(label.validate().is_ok());
    }
}
