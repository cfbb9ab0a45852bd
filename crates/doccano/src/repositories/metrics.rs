use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;
use crate::models::{LabelCount, LabelDistribution, LabelTypeKind, MemberProgress, Progress};
use crate::session::ApiClient;

/// Read-only project statistics.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    client: ApiClient,
}

#[derive(Deserialize)]
struct WireProgress {
    total: u64,
    complete: u64,
    remaining: u64,
}

#[derive(Deserialize)]
struct WireMemberProgress {
    total: u64,
    progress: Vec<WireMemberDone>,
}

#[derive(Deserialize)]
struct WireMemberDone {
    user: String,
    done: u64,
}

impl MetricsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Progress of the current user.
    pub async fn progress(&self, project_id: i64) -> Result<Progress> {
        let wire: WireProgress = self
            .client
            .get(&format!("projects/{project_id}/metrics/progress"))
            .await?;
        Ok(Progress {
            total: wire.total,
            completed: wire.complete,
            remaining: wire.remaining,
        })
    }

    pub async fn members_progress(&self, project_id: i64) -> Result<Vec<MemberProgress>> {
        let wire: WireMemberProgress = self
            .client
            .get(&format!("projects/{project_id}/metrics/member-progress"))
            .await?;
        Ok(wire
            .progress
            .into_iter()
            .map(|p| MemberProgress {
                username: p.user,
                progress: Progress {
                    total: wire.total,
                    completed: p.done,
                    remaining: wire.total.saturating_sub(p.done),
                },
            })
            .collect())
    }

    /// Label counts per user for one label-type family, ordered by username.
    pub async fn label_distribution(
        &self,
        project_id: i64,
        kind: LabelTypeKind,
    ) -> Result<Vec<LabelDistribution>> {
        let family = match kind {
            LabelTypeKind::Category => "category",
            LabelTypeKind::Span => "span",
            LabelTypeKind::Relation => "relation",
        };
        let wire: BTreeMap<String, BTreeMap<String, u64>> = self
            .client
            .get(&format!(
                "projects/{project_id}/metrics/{family}-distribution"
            ))
            .await?;
        Ok(wire
            .into_iter()
            .map(|(username, counts)| LabelDistribution {
                username,
                counts: counts
                    .into_iter()
                    .map(|(label, count)| LabelCount { label, count })
                    .collect(),
            })
            .collect())
    }

    pub async fn category_distribution(&self, project_id: i64) -> Result<Vec<LabelDistribution>> {
        self.label_distribution(project_id, LabelTypeKind::Category)
            .await
    }

    pub async fn span_distribution(&self, project_id: i64) -> Result<Vec<LabelDistribution>> {
        self.label_distribution(project_id, LabelTypeKind::Span).await
    }

    pub async fn relation_distribution(&self, project_id: i64) -> Result<Vec<LabelDistribution>> {
        self.label_distribution(project_id, LabelTypeKind::Relation)
            .await
    }
}
