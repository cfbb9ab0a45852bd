//! End-to-end flows through the facade against a scripted server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use doccano::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use doccano::{ClientConfig, DoccanoClient, ErrorBody, LabelTypeKind, ProjectType};
use serde_json::{Value, json};

const BASE: &str = "https://doccano.test";

/// Replies with canned responses in order and records every request.
#[derive(Clone, Default)]
struct ScriptedServer {
    script: Arc<Mutex<VecDeque<(HttpMethod, String, HttpResponse)>>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedServer {
    fn expect(&self, method: HttpMethod, path: &str, response: HttpResponse) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back((method, format!("{BASE}/v1/{path}"), response));
        self
    }

    fn seen(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn client(&self) -> DoccanoClient {
        let mut config = ClientConfig::new(BASE);
        config.retry.max_retries = 0;
        DoccanoClient::with_transport(config, Arc::new(self.clone()))
    }
}

#[async_trait]
impl HttpTransport for ScriptedServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.seen.lock().unwrap().push(request.clone());
        let (method, url, response) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                HttpError::Transport(format!("unscripted {} {}", request.method, request.url))
            })?;
        assert_eq!((method, url.as_str()), (request.method, request.url.as_str()));
        Ok(response)
    }
}

fn json(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn with_cookies(mut response: HttpResponse, cookies: &[&str]) -> HttpResponse {
    for cookie in cookies {
        response.headers.push(("Set-Cookie".into(), (*cookie).into()));
    }
    response
}

#[tokio::test]
async fn login_attaches_csrf_token_to_later_requests() {
    let server = ScriptedServer::default();
    server
        .expect(
            HttpMethod::Post,
            "auth/login/",
            with_cookies(
                json(200, json!({"key": "k"})),
                &["csrftoken=tok123; Path=/", "sessionid=s1; HttpOnly; Path=/"],
            ),
        )
        // Duplicate check lists the existing types first.
        .expect(HttpMethod::Get, "projects/1/category-types", json(200, json!([])))
        .expect(
            HttpMethod::Post,
            "projects/1/category-types",
            json(201, json!({"id": 5, "text": "positive", "background_color": "#00ff00"})),
        );

    let client = server.client();
    client.login("admin", "password").await.unwrap();
    client
        .create_label_type(
            1,
            LabelTypeKind::Category,
            doccano::usecase::NewLabelType::new("positive"),
        )
        .await
        .unwrap();

    let seen = server.seen();
    assert_eq!(
        seen[0].json_body(),
        Some(json!({"username": "admin", "password": "password"}))
    );
    let create = &seen[2];
    assert_eq!(create.header("X-CSRFToken"), Some("tok123"));
    let cookie = create.header("Cookie").unwrap();
    assert!(cookie.contains("csrftoken=tok123"));
    assert!(cookie.contains("sessionid=s1"));
}

#[tokio::test]
async fn invalid_login_returns_forbidden_with_payload() {
    let server = ScriptedServer::default();
    server.expect(
        HttpMethod::Post,
        "auth/login/",
        json(
            403,
            json!({"non_field_errors": ["Unable to log in with provided credentials."]}),
        ),
    );

    let err = server.client().login("admin", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    let api = err.api().unwrap();
    assert_eq!(
        api.body,
        ErrorBody::Json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        }))
    );
    assert_eq!(api.response.status, 403);
}

#[tokio::test]
async fn created_project_carries_derived_resource_type() {
    let server = ScriptedServer::default();
    server.expect(
        HttpMethod::Post,
        "projects",
        json(
            201,
            json!({
                "id": 1, "name": "ner", "description": "news",
                "project_type": "SequenceLabeling",
                "resourcetype": "SequenceLabelingProject"
            }),
        ),
    );

    let project = server
        .client()
        .create_project("ner", ProjectType::SequenceLabeling, "news")
        .await
        .unwrap();
    assert_eq!(project.id, Some(1));

    let body = server.seen()[0].json_body().unwrap();
    assert_eq!(body["project_type"], "SequenceLabeling");
    assert_eq!(body["resourcetype"], "SequenceLabelingProject");
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn listing_follows_next_links_from_another_host() {
    let server = ScriptedServer::default();
    let project = |id: i64| {
        json!({
            "id": id,
            "name": format!("p{id}"),
            "description": "d",
            "project_type": "Seq2seq"
        })
    };
    server
        .expect(
            HttpMethod::Get,
            "projects",
            json(
                200,
                json!({
                    "count": 3,
                    "next": "http://10.0.0.5:8000/v1/projects?limit=2&offset=2",
                    "previous": null,
                    "results": [project(1), project(2)]
                }),
            ),
        )
        .expect(
            HttpMethod::Get,
            "projects?limit=2&offset=2",
            json(
                200,
                json!({
                    "count": 3,
                    "next": null,
                    "previous": "http://10.0.0.5:8000/v1/projects?limit=2",
                    "results": [project(3)]
                }),
            ),
        );

    let mut pages = server.client().list_projects();
    let mut ids = Vec::new();
    while let Some(project) = pages.try_next().await.unwrap() {
        ids.push(project.id.unwrap());
    }
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(pages.total_count(), Some(ids.len() as u64));
    assert!(server.seen().iter().all(|r| r.url.starts_with(BASE)));
}
