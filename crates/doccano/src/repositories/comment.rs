use serde::Serialize;

use crate::error::Result;
use crate::models::Comment;
use crate::pagination::Paginator;
use crate::session::{ApiClient, with_query};

use super::{Ids, IntoId, require_id};

#[derive(Debug, Clone)]
pub struct CommentRepository {
    client: ApiClient,
}

#[derive(Serialize)]
struct NewComment<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

impl CommentRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn base(project_id: i64) -> String {
        format!("projects/{project_id}/comments")
    }

    pub async fn find_by_id(&self, project_id: i64, comment_id: i64) -> Result<Comment> {
        self.client
            .get(&format!("{}/{comment_id}", Self::base(project_id)))
            .await
    }

    /// Comments of a project, optionally narrowed to one example and a
    /// search query.
    pub fn list(
        &self,
        project_id: i64,
        example_id: Option<i64>,
        query: &str,
    ) -> Paginator<Comment> {
        let mut params = Vec::new();
        if let Some(example_id) = example_id {
            params.push(("example", example_id.to_string()));
        }
        params.push(("q", query.to_string()));
        let resource = with_query(&Self::base(project_id), &params);
        Paginator::new(self.client.clone(), &resource)
    }

    /// The target example travels in the query string, not the body.
    pub async fn create(&self, project_id: i64, comment: &Comment) -> Result<Comment> {
        let resource = with_query(
            &Self::base(project_id),
            &[("example", comment.example.to_string())],
        );
        let payload = NewComment {
            text: &comment.text,
            user: comment.user,
            username: comment.username.as_deref(),
        };
        self.client.post(&resource, &payload).await
    }

    pub async fn update(&self, project_id: i64, comment: &Comment) -> Result<Comment> {
        let id = require_id(comment.id, "comment")?;
        self.client
            .put(&format!("{}/{id}", Self::base(project_id)), comment)
            .await
    }

    pub async fn delete(&self, project_id: i64, comment: impl IntoId) -> Result<()> {
        let id = comment.into_id()?;
        self.client
            .delete(&format!("{}/{id}", Self::base(project_id)))
            .await
    }

    pub async fn bulk_delete<I, T>(&self, project_id: i64, comments: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoId,
    {
        let ids = Ids::collect(comments)?;
        self.client
            .delete_with(&Self::base(project_id), &ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, MockTransport, json_response};
    use crate::session::{api, mock_client};
    use serde_json::json;

    #[tokio::test]
    async fn create_puts_example_in_query_and_leaves_it_out_of_body() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/comments?example=7"),
            json_response(
                201,
                json!({
                    "id": 3,
                    "text": "typo",
                    "example": 7,
                    "user": 1,
                    "username": "ann",
                }),
            ),
        );
        let repo = CommentRepository::new(mock_client(&transport));
        let created = repo
            .create(1, &Comment::new(7, "typo"))
            .await
            .expect("create");
        assert_eq!(created.id, Some(3));
        assert_eq!(transport.requests()[0].json_body(), Some(json!({"text": "typo"})));
    }

    #[tokio::test]
    async fn list_filters_by_example_and_query() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/comments?example=7&q=typo"),
            json_response(
                200,
                json!({
                    "count": 1,
                    "next": null,
                    "results": [{"id": 3, "text": "typo", "example": 7}],
                }),
            ),
        );
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/comments?q="),
            json_response(200, json!({"count": 0, "next": null, "results": []})),
        );
        let repo = CommentRepository::new(mock_client(&transport));
        let found = repo.list(1, Some(7), "typo").try_collect().await.expect("list");
        assert_eq!(found.len(), 1);
        let all = repo.list(1, None, "").try_collect().await.expect("list");
        assert!(all.is_empty());
    }
}
