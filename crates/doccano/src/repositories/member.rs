use crate::error::Result;
use crate::models::Member;
use crate::session::ApiClient;

use super::{Ids, IntoId, require_id};

#[derive(Debug, Clone)]
pub struct MemberRepository {
    client: ApiClient,
}

impl MemberRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn base(project_id: i64) -> String {
        format!("projects/{project_id}/members")
    }

    pub async fn find_by_id(&self, project_id: i64, member_id: i64) -> Result<Member> {
        self.client
            .get(&format!("{}/{member_id}", Self::base(project_id)))
            .await
    }

    pub async fn list(&self, project_id: i64) -> Result<Vec<Member>> {
        self.client.get(&Self::base(project_id)).await
    }

    pub async fn create(&self, project_id: i64, member: &Member) -> Result<Member> {
        let mut payload = member.clone();
        payload.id = None;
        self.client.post(&Self::base(project_id), &payload).await
    }

    pub async fn update(&self, project_id: i64, member: &Member) -> Result<Member> {
        let id = require_id(member.id, "member")?;
        self.client
            .put(&format!("{}/{id}", Self::base(project_id)), member)
            .await
    }

    /// Members are removed through the bulk endpoint.
    pub async fn delete(&self, project_id: i64, member: impl IntoId) -> Result<()> {
        let id = member.into_id()?;
        self.bulk_delete(project_id, [id]).await
    }

    pub async fn bulk_delete<I, T>(&self, project_id: i64, members: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoId,
    {
        let ids = Ids::collect(members)?;
        self.client
            .delete_with(&Self::base(project_id), &ids)
            .await
    }
}
