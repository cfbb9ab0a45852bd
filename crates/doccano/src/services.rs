//! Duplicate detection for label types.

use crate::error::Result;
use crate::models::LabelType;
use crate::repositories::LabelTypeRepository;

/// True when `candidate` clashes with any entry of `existing`.
///
/// An entry with the candidate's own id never clashes. Otherwise a clash is
/// identical text, or, when the candidate has a shortcut, an identical
/// `(prefix_key, suffix_key)` pair.
pub fn has_conflict(existing: &[LabelType], candidate: &LabelType) -> bool {
    existing
        .iter()
        .filter(|other| candidate.id.is_none() || other.id != candidate.id)
        .any(|other| {
            other.text == candidate.text
                || (candidate.has_shortcut()
                    && other.prefix_key == candidate.prefix_key
                    && other.suffix_key == candidate.suffix_key)
        })
}

/// Checks label types against the ones already stored in a project.
#[derive(Debug, Clone)]
pub struct LabelTypeService {
    repository: LabelTypeRepository,
}

impl LabelTypeService {
    pub fn new(repository: LabelTypeRepository) -> Self {
        Self { repository }
    }

    /// Whether storing `candidate` would duplicate another label type.
    pub async fn exists(&self, project_id: i64, candidate: &LabelType) -> Result<bool> {
        let existing = self.repository.list(project_id).await?;
        Ok(has_conflict(&existing, candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, MockTransport, json_response};
    use crate::models::{LabelTypeKind, PrefixKey, SuffixKey};
    use crate::session::{api, mock_client};
    use serde_json::json;

    fn label_type(
        id: Option<i64>,
        text: &str,
        prefix: Option<PrefixKey>,
        suffix: Option<char>,
    ) -> LabelType {
        let mut lt = LabelType::new(text).expect("valid");
        lt.id = id;
        lt.prefix_key = prefix;
        lt.suffix_key = suffix.map(|c| SuffixKey::try_from(c).expect("suffix"));
        lt
    }

    #[test]
    fn empty_collection_never_conflicts() {
        assert!(!has_conflict(&[], &label_type(None, "PER", None, Some('p'))));
    }

    #[test]
    fn entry_does_not_conflict_with_itself() {
        let stored = label_type(Some(1), "PER", Some(PrefixKey::Ctrl), Some('p'));
        assert!(!has_conflict(std::slice::from_ref(&stored), &stored));
    }

    #[test]
    fn same_text_on_another_entry_conflicts() {
        let existing = [label_type(Some(1), "PER", None, None)];
        assert!(has_conflict(&existing, &label_type(None, "PER", None, None)));
        assert!(has_conflict(&existing, &label_type(Some(2), "PER", None, None)));
        assert!(!has_conflict(&existing, &label_type(Some(2), "ORG", None, None)));
    }

    #[test]
    fn same_shortcut_on_another_entry_conflicts() {
        let existing = [
            label_type(Some(1), "PER", Some(PrefixKey::Ctrl), Some('p')),
            label_type(Some(2), "ORG", None, None),
        ];
        assert!(has_conflict(
            &existing,
            &label_type(None, "LOC", Some(PrefixKey::Ctrl), Some('p'))
        ));
        assert!(!has_conflict(
            &existing,
            &label_type(None, "LOC", Some(PrefixKey::Shift), Some('p'))
        ));
        // Only-suffix shortcuts compare against the full pair.
        assert!(!has_conflict(&existing, &label_type(None, "LOC", None, Some('p'))));
    }

    #[test]
    fn missing_shortcut_does_not_match_other_missing_shortcuts() {
        let existing = [label_type(Some(1), "PER", None, None)];
        assert!(!has_conflict(&existing, &label_type(None, "ORG", None, None)));
    }

    #[tokio::test]
    async fn exists_lists_project_label_types() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/3/category-types"),
            json_response(
                200,
                json!([{
                    "id": 1,
                    "text": "positive",
                    "background_color": "#00ff00",
                    "text_color": "#ffffff",
                }]),
            ),
        );
        let service = LabelTypeService::new(LabelTypeRepository::new(
            mock_client(&transport),
            LabelTypeKind::Category,
        ));
        let candidate = label_type(None, "positive", None, None);
        assert!(service.exists(3, &candidate).await.expect("exists"));
    }
}
