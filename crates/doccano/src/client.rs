//! The [`DoccanoClient`] facade.
//!
//! One client owns one [`ApiClient`] session. Use-case accessors are cheap:
//! each call builds a use-case over a clone of the shared session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::models::{
    BoundingBox, Category, ColumnMapping, Comment, Example, ExportOption, ImportOption,
    LabelDistribution, LabelType, LabelTypeKind, LabelVariant, Member, MemberProgress, Progress,
    Project, ProjectType, Relation, Role, Segment, Span, Task, TaskStatus, Text, User,
};
use crate::pagination::Paginator;
use crate::repositories::{
    CommentRepository, DataDownloadRepository, DataUploadRepository, ExampleRepository,
    LabelRepository, LabelTypeRepository, MemberRepository, MetricsRepository, ProjectRepository,
    RoleRepository, TaskStatusRepository, UserDetailsRepository, UserRepository,
};
use crate::session::ApiClient;
use crate::usecase::{
    CommentUseCase, DataDownloadUseCase, DataUploadUseCase, ExamplePatch, ExampleUseCase,
    LabelTypePatch, LabelTypeUseCase, LabelUseCase, MemberUseCase, NewLabelType, ProjectPatch,
    ProjectUseCase, UserDetailsUseCase,
};

/// Client for a doccano server.
#[derive(Debug, Clone)]
pub struct DoccanoClient {
    config: ClientConfig,
    client: ApiClient,
}

impl DoccanoClient {
    /// Connect over HTTP with the transport settings in `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Use a custom transport, e.g. a scripted one in tests.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let client = ApiClient::with_transport(&config, transport);
        Self { config, client }
    }

    /// Authenticate every request with an API token instead of a session.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.client.set_token(token);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying session, for requests the typed API does not cover.
    pub fn session(&self) -> &ApiClient {
        &self.client
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.client.login(username, password).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.client.logout().await
    }

    // Use-cases

    pub fn project(&self) -> ProjectUseCase {
        ProjectUseCase::new(ProjectRepository::new(self.client.clone()))
    }

    pub fn example(&self) -> ExampleUseCase {
        ExampleUseCase::new(ExampleRepository::new(self.client.clone()))
    }

    pub fn comment(&self) -> CommentUseCase {
        CommentUseCase::new(CommentRepository::new(self.client.clone()))
    }

    pub fn member(&self) -> MemberUseCase {
        MemberUseCase::new(
            MemberRepository::new(self.client.clone()),
            UserRepository::new(self.client.clone()),
            RoleRepository::new(self.client.clone()),
        )
    }

    pub fn label_type(&self, kind: LabelTypeKind) -> LabelTypeUseCase {
        LabelTypeUseCase::new(LabelTypeRepository::new(self.client.clone(), kind))
    }

    fn label<T: LabelVariant>(&self) -> LabelUseCase<T> {
        let label_types = T::KIND
            .label_type_kind()
            .map(|kind| LabelTypeRepository::new(self.client.clone(), kind));
        LabelUseCase::new(LabelRepository::new(self.client.clone()), label_types)
    }

    pub fn category(&self) -> LabelUseCase<Category> {
        self.label()
    }

    pub fn span(&self) -> LabelUseCase<Span> {
        self.label()
    }

    pub fn relation(&self) -> LabelUseCase<Relation> {
        self.label()
    }

    pub fn text(&self) -> LabelUseCase<Text> {
        self.label()
    }

    pub fn segment(&self) -> LabelUseCase<Segment> {
        self.label()
    }

    pub fn bounding_box(&self) -> LabelUseCase<BoundingBox> {
        self.label()
    }

    pub fn data_import(&self) -> DataUploadUseCase {
        DataUploadUseCase::new(
            DataUploadRepository::new(self.client.clone()),
            TaskStatusRepository::new(self.client.clone()),
            self.config.task.clone(),
        )
    }

    pub fn data_export(&self) -> DataDownloadUseCase {
        DataDownloadUseCase::new(
            DataDownloadRepository::new(self.client.clone()),
            TaskStatusRepository::new(self.client.clone()),
            self.config.task.clone(),
            self.config.exports_dir(),
        )
    }

    pub fn user_details(&self) -> UserDetailsUseCase {
        UserDetailsUseCase::new(UserDetailsRepository::new(self.client.clone()))
    }

    fn metrics(&self) -> MetricsRepository {
        MetricsRepository::new(self.client.clone())
    }

    // Users and roles

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        RoleRepository::new(self.client.clone()).list().await
    }

    pub async fn get_profile(&self) -> Result<User> {
        UserRepository::new(self.client.clone()).get_profile().await
    }

    pub async fn search_users(&self, name: &str) -> Result<Vec<User>> {
        UserRepository::new(self.client.clone()).list(name).await
    }

    pub async fn find_user_by_name(&self, name: &str) -> Result<User> {
        UserRepository::new(self.client.clone())
            .find_by_name(name)
            .await
    }

    // Projects

    pub fn list_projects(&self) -> Paginator<Project> {
        self.project().list()
    }

    pub async fn find_project_by_id(&self, project_id: i64) -> Result<Project> {
        self.project().find_by_id(project_id).await
    }

    /// Create a project with default flags. Use [`Self::project`] for full control.
    pub async fn create_project(
        &self,
        name: &str,
        project_type: ProjectType,
        description: &str,
    ) -> Result<Project> {
        let project = Project::new(name, description, project_type)?;
        self.project().create(&project).await
    }

    pub async fn update_project(&self, project_id: i64, patch: ProjectPatch) -> Result<Project> {
        self.project().update(project_id, patch).await
    }

    pub async fn delete_project(&self, project_id: i64) -> Result<()> {
        self.project().delete(project_id).await
    }

    // Metrics

    pub async fn get_progress(&self, project_id: i64) -> Result<Progress> {
        self.metrics().progress(project_id).await
    }

    pub async fn get_members_progress(&self, project_id: i64) -> Result<Vec<MemberProgress>> {
        self.metrics().members_progress(project_id).await
    }

    pub async fn get_label_distribution(
        &self,
        project_id: i64,
        kind: LabelTypeKind,
    ) -> Result<Vec<LabelDistribution>> {
        self.metrics().label_distribution(project_id, kind).await
    }

    // Label types

    pub async fn list_label_types(
        &self,
        project_id: i64,
        kind: LabelTypeKind,
    ) -> Result<Vec<LabelType>> {
        self.label_type(kind).list(project_id).await
    }

    pub async fn find_label_type_by_id(
        &self,
        project_id: i64,
        label_type_id: i64,
        kind: LabelTypeKind,
    ) -> Result<LabelType> {
        self.label_type(kind)
            .find_by_id(project_id, label_type_id)
            .await
    }

    pub async fn create_label_type(
        &self,
        project_id: i64,
        kind: LabelTypeKind,
        label_type: NewLabelType,
    ) -> Result<LabelType> {
        self.label_type(kind).create(project_id, label_type).await
    }

    pub async fn update_label_type(
        &self,
        project_id: i64,
        label_type_id: i64,
        kind: LabelTypeKind,
        patch: LabelTypePatch,
    ) -> Result<LabelType> {
        self.label_type(kind)
            .update(project_id, label_type_id, patch)
            .await
    }

    pub async fn delete_label_type(
        &self,
        project_id: i64,
        label_type_id: i64,
        kind: LabelTypeKind,
    ) -> Result<()> {
        self.label_type(kind).delete(project_id, label_type_id).await
    }

    pub async fn bulk_delete_label_types(
        &self,
        project_id: i64,
        label_type_ids: &[i64],
        kind: LabelTypeKind,
    ) -> Result<()> {
        self.label_type(kind)
            .bulk_delete(project_id, label_type_ids)
            .await
    }

    pub async fn upload_label_type(
        &self,
        project_id: i64,
        file_path: &Path,
        kind: LabelTypeKind,
    ) -> Result<()> {
        self.label_type(kind).upload(project_id, file_path).await
    }

    // Examples

    pub fn list_examples(&self, project_id: i64, is_confirmed: Option<bool>) -> Paginator<Example> {
        self.example().list(project_id, is_confirmed)
    }

    pub async fn find_example_by_id(&self, project_id: i64, example_id: i64) -> Result<Example> {
        self.example().find_by_id(project_id, example_id).await
    }

    pub async fn count_examples(&self, project_id: i64) -> Result<u64> {
        self.example().count(project_id).await
    }

    pub async fn create_example(
        &self,
        project_id: i64,
        text: &str,
        meta: Map<String, Value>,
    ) -> Result<Example> {
        self.example().create(project_id, text, None, meta).await
    }

    pub async fn update_example(
        &self,
        project_id: i64,
        example_id: i64,
        patch: ExamplePatch,
    ) -> Result<Example> {
        self.example().update(project_id, example_id, patch).await
    }

    pub async fn delete_example(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.example().delete(project_id, example_id).await
    }

    pub async fn bulk_delete_examples(&self, project_id: i64, example_ids: &[i64]) -> Result<()> {
        self.example().bulk_delete(project_id, example_ids).await
    }

    pub async fn delete_all_examples(&self, project_id: i64) -> Result<()> {
        self.example().delete_all(project_id).await
    }

    /// Toggle the confirmed state of an example for the current user.
    pub async fn update_example_state(&self, project_id: i64, example_id: i64) -> Result<()> {
        self.example().update_state(project_id, example_id).await
    }

    // Comments

    pub async fn find_comment_by_id(&self, project_id: i64, comment_id: i64) -> Result<Comment> {
        self.comment().find_by_id(project_id, comment_id).await
    }

    pub fn list_comments(
        &self,
        project_id: i64,
        example_id: i64,
        query: &str,
    ) -> Paginator<Comment> {
        self.comment().list(project_id, Some(example_id), query)
    }

    pub async fn create_comment(
        &self,
        project_id: i64,
        example_id: i64,
        text: &str,
    ) -> Result<Comment> {
        self.comment().create(project_id, example_id, text).await
    }

    pub async fn update_comment(
        &self,
        project_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Comment> {
        self.comment().update(project_id, comment_id, text).await
    }

    pub async fn delete_comment(&self, project_id: i64, comment_id: i64) -> Result<()> {
        self.comment().delete(project_id, comment_id).await
    }

    pub async fn bulk_delete_comments(&self, project_id: i64, comment_ids: &[i64]) -> Result<()> {
        self.comment().bulk_delete(project_id, comment_ids).await
    }

    // Members

    pub async fn find_member_by_id(&self, project_id: i64, member_id: i64) -> Result<Member> {
        self.member().find_by_id(project_id, member_id).await
    }

    pub async fn list_members(&self, project_id: i64) -> Result<Vec<Member>> {
        self.member().list(project_id).await
    }

    pub async fn add_member(
        &self,
        project_id: i64,
        username: &str,
        role_name: &str,
    ) -> Result<Member> {
        self.member().add(project_id, username, role_name).await
    }

    pub async fn update_member(
        &self,
        project_id: i64,
        member_id: i64,
        role_name: &str,
    ) -> Result<Member> {
        self.member().update(project_id, member_id, role_name).await
    }

    pub async fn delete_member(&self, project_id: i64, member_id: i64) -> Result<()> {
        self.member().delete(project_id, member_id).await
    }

    pub async fn bulk_delete_members(&self, project_id: i64, member_ids: &[i64]) -> Result<()> {
        self.member().bulk_delete(project_id, member_ids).await
    }

    // Import and export

    pub async fn list_upload_options(&self, project_id: i64) -> Result<Vec<ImportOption>> {
        self.data_import().list_options(project_id).await
    }

    pub async fn list_download_options(&self, project_id: i64) -> Result<Vec<ExportOption>> {
        self.data_export().list_options(project_id).await
    }

    /// Import files and wait for the server to finish.
    pub async fn upload<P: AsRef<Path>>(
        &self,
        project_id: i64,
        file_paths: &[P],
        task: Task,
        format: &str,
        columns: &ColumnMapping,
    ) -> Result<TaskStatus> {
        self.data_import()
            .upload(project_id, file_paths, task, format, columns)
            .await
    }

    /// Export a project and save the archive, by default under the configured
    /// exports directory.
    pub async fn download(
        &self,
        project_id: i64,
        format: &str,
        only_approved: bool,
        dir: Option<&Path>,
    ) -> Result<PathBuf> {
        self.data_export()
            .download(project_id, format, only_approved, dir)
            .await
    }
}
