use crate::error::Result;
use crate::models::Member;
use crate::repositories::{MemberRepository, RoleRepository, UserRepository};

/// Project membership by username and role name.
#[derive(Debug, Clone)]
pub struct MemberUseCase {
    members: MemberRepository,
    users: UserRepository,
    roles: RoleRepository,
}

impl MemberUseCase {
    pub fn new(members: MemberRepository, users: UserRepository, roles: RoleRepository) -> Self {
        Self {
            members,
            users,
            roles,
        }
    }

    pub async fn find_by_id(&self, project_id: i64, member_id: i64) -> Result<Member> {
        self.members.find_by_id(project_id, member_id).await
    }

    pub async fn list(&self, project_id: i64) -> Result<Vec<Member>> {
        self.members.list(project_id).await
    }

    /// Resolve both names, then add the member.
    pub async fn add(&self, project_id: i64, username: &str, role_name: &str) -> Result<Member> {
        let user = self.users.find_by_name(username).await?;
        let role = self.roles.find_by_name(role_name).await?;
        self.members
            .create(project_id, &Member::new(user.id, role.id))
            .await
    }

    /// Change a member's role.
    pub async fn update(&self, project_id: i64, member_id: i64, role_name: &str) -> Result<Member> {
        let role = self.roles.find_by_name(role_name).await?;
        let mut member = self.members.find_by_id(project_id, member_id).await?;
        member.id = Some(member_id);
        member.role = role.id;
        self.members.update(project_id, &member).await
    }

    pub async fn delete(&self, project_id: i64, member_id: i64) -> Result<()> {
        self.members.delete(project_id, member_id).await
    }

    pub async fn bulk_delete(&self, project_id: i64, member_ids: &[i64]) -> Result<()> {
        self.members.bulk_delete(project_id, member_ids).await
    }
}
