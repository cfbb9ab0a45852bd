use serde::Deserialize;

use crate::error::Result;
use crate::http::{HttpBody, HttpMethod};
use crate::models::Example;
use crate::pagination::Paginator;
use crate::session::{ApiClient, with_query};

use super::{Ids, IntoId, require_id};

#[derive(Debug, Clone)]
pub struct ExampleRepository {
    client: ApiClient,
}

#[derive(Deserialize)]
struct Count {
    count: u64,
}

impl ExampleRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn base(project_id: i64) -> String {
        format!("projects/{project_id}/examples")
    }

    pub async fn find_by_id(&self, project_id: i64, example_id: i64) -> Result<Example> {
        self.client
            .get(&format!("{}/{example_id}", Self::base(project_id)))
            .await
    }

    /// Number of examples in the project.
    pub async fn count(&self, project_id: i64) -> Result<u64> {
        let count: Count = self.client.get(&Self::base(project_id)).await?;
        Ok(count.count)
    }

    /// Examples in server order, optionally filtered by confirmed state.
    pub fn list(&self, project_id: i64, is_confirmed: Option<bool>) -> Paginator<Example> {
        let mut params = Vec::new();
        if let Some(confirmed) = is_confirmed {
            params.push(("confirmed", confirmed.to_string()));
        }
        let resource = with_query(&Self::base(project_id), &params);
        Paginator::new(self.client.clone(), &resource)
    }

    pub async fn create(&self, project_id: i64, example: &Example) -> Result<Example> {
        let mut payload = example.clone();
        payload.id = None;
        self.client.post(&Self::base(project_id), &payload).await
    }

    pub async fn update(&self, project_id: i64, example: &Example) -> Result<Example> {
        let id = require_id(example.id, "example")?;
        self.client
            .put(&format!("{}/{id}", Self::base(project_id)), example)
            .await
    }

    pub async fn delete(&self, project_id: i64, example: impl IntoId) -> Result<()> {
        let id = example.into_id()?;
        self.client
            .delete(&format!("{}/{id}", Self::base(project_id)))
            .await
    }

    pub async fn bulk_delete<I, T>(&self, project_id: i64, examples: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoId,
    {
        let ids = Ids::collect(examples)?;
        self.client
            .delete_with(&Self::base(project_id), &ids)
            .await
    }

    /// Delete every example. The server treats an empty id list as "all".
    pub async fn delete_all(&self, project_id: i64) -> Result<()> {
        self.bulk_delete(project_id, Vec::<i64>::new()).await
    }

    /// Toggle the confirmed state of an example for the current user.
    pub async fn update_state(&self, project_id: i64, example: impl IntoId) -> Result<()> {
        let id = example.into_id()?;
        self.client
            .send(
                HttpMethod::Post,
                &format!("{}/{id}/states", Self::base(project_id)),
                HttpBody::Empty,
            )
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockTransport, json_response};
    use crate::session::{api, mock_client};
    use serde_json::json;

    #[tokio::test]
    async fn count_reads_server_total() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/examples"),
            json_response(200, json!({"count": 42, "next": null, "results": []})),
        );
        let repo = ExampleRepository::new(mock_client(&transport));
        assert_eq!(repo.count(1).await.expect("count"), 42);
    }

    #[tokio::test]
    async fn list_passes_confirmed_filter() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("projects/1/examples?confirmed=true"),
            json_response(
                200,
                json!({
                    "count": 1,
                    "next": null,
                    "results": [{"id": 3, "text": "x", "is_confirmed": true}],
                }),
            ),
        );
        let repo = ExampleRepository::new(mock_client(&transport));
        let examples = repo.list(1, Some(true)).try_collect().await.expect("list");
        assert_eq!(examples.len(), 1);
        assert!(examples[0].is_confirmed);
    }

    #[tokio::test]
    async fn bulk_and_full_delete_send_id_lists() {
        let transport = MockTransport::new();
        for _ in 0..2 {
            transport.push_response(
                HttpMethod::Delete,
                api("projects/1/examples"),
                json_response(204, json!(null)),
            );
        }
        let repo = ExampleRepository::new(mock_client(&transport));
        repo.bulk_delete(1, [4i64, 5]).await.expect("bulk");
        repo.delete_all(1).await.expect("all");

        let requests = transport.requests();
        assert_eq!(requests[0].json_body(), Some(json!({"ids": [4, 5]})));
        assert_eq!(requests[1].json_body(), Some(json!({"ids": []})));
    }

    #[tokio::test]
    async fn update_state_posts_without_body() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/examples/3/states"),
            json_response(201, json!({"id": 1, "example": 3, "confirmed_by": 1})),
        );
        let repo = ExampleRepository::new(mock_client(&transport));
        repo.update_state(1, 3).await.expect("state");
        assert_eq!(transport.requests()[0].body, HttpBody::Empty);
    }

    #[tokio::test]
    async fn create_strips_id() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            api("projects/1/examples"),
            json_response(201, json!({"id": 10, "text": "hello"})),
        );
        let repo = ExampleRepository::new(mock_client(&transport));
        let mut example = Example::with_text("hello");
        example.id = Some(77);
        let created = repo.create(1, &example).await.expect("create");
        assert_eq!(created.id, Some(10));
        let body = transport.requests()[0].json_body().expect("body");
        assert!(body.get("id").is_none());
    }
}
