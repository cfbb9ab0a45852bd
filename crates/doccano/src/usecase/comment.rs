use crate::error::Result;
use crate::models::Comment;
use crate::pagination::Paginator;
use crate::repositories::CommentRepository;

#[derive(Debug, Clone)]
pub struct CommentUseCase {
    repository: CommentRepository,
}

impl CommentUseCase {
    pub fn new(repository: CommentRepository) -> Self {
        Self { repository }
    }

    pub async fn find_by_id(&self, project_id: i64, comment_id: i64) -> Result<Comment> {
        self.repository.find_by_id(project_id, comment_id).await
    }

    pub fn list(
        &self,
        project_id: i64,
        example_id: Option<i64>,
        query: &str,
    ) -> Paginator<Comment> {
        self.repository.list(project_id, example_id, query)
    }

    pub async fn create(&self, project_id: i64, example_id: i64, text: &str) -> Result<Comment> {
        self.repository
            .create(project_id, &Comment::new(example_id, text))
            .await
    }

    /// Replace the text of a comment.
    pub async fn update(&self, project_id: i64, comment_id: i64, text: &str) -> Result<Comment> {
        let current = self.repository.find_by_id(project_id, comment_id).await?;
        let mut comment = Comment::new(current.example, text);
        comment.id = Some(comment_id);
        self.repository.update(project_id, &comment).await
    }

    pub async fn delete(&self, project_id: i64, comment_id: i64) -> Result<()> {
        self.repository.delete(project_id, comment_id).await
    }

    pub async fn bulk_delete(&self, project_id: i64, comment_ids: &[i64]) -> Result<()> {
        self.repository.bulk_delete(project_id, comment_ids).await
    }
}
