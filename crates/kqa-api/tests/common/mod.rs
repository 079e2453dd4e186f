#![allow(dead_code)]

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use kqa_api::{config::Environment, router, state::ApiState};
use kqa_genai::{ImageProvider, ProviderError, QuestionProvider};
use kqa_quiz::{Category, Image, QuestionDraft};
use serde_json::Value;
use tokio::sync::Semaphore;
use tower::ServiceExt;

/// A well formed question whose right answer is `Answer {n}`.
pub fn draft(n: usize) -> QuestionDraft {
    QuestionDraft {
        id: format!("q{n}"),
        prompt: format!("Question number {n}?"),
        options: vec![
            format!("Answer {n}"),
            "Wrong A".to_string(),
            "Wrong B".to_string(),
            "Wrong C".to_string(),
        ],
        correct_answer: format!("Answer {n}"),
        image_description: format!("picture {n}"),
        explanation: format!("Fact {n}"),
        passage: None,
    }
}

pub fn drafts(count: usize) -> Vec<QuestionDraft> {
    (1..=count).map(draft).collect()
}

pub fn png() -> Image {
    Image {
        mime_type: "image/png".to_string(),
        data: vec![1, 2, 3],
    }
}

/// Blocks provider calls until the test releases them, one permit per call.
///
/// Permits are handed out in call order.
#[derive(Clone, Default)]
pub struct Gate(Option<Arc<Semaphore>>);

impl Gate {
    pub fn closed() -> Self {
        Self(Some(Arc::new(Semaphore::new(0))))
    }

    pub fn release(&self, calls: usize) {
        if let Some(semaphore) = &self.0 {
            semaphore.add_permits(calls);
        }
    }

    async fn pass(&self) {
        if let Some(semaphore) = &self.0 {
            semaphore
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
    }
}

/// Question provider returning a fixed batch.
#[derive(Default)]
pub struct StubQuestions {
    drafts: Vec<QuestionDraft>,
    fail: bool,
    gate: Gate,
}

impl StubQuestions {
    pub fn returning(drafts: Vec<QuestionDraft>) -> Self {
        Self {
            drafts,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }
}

#[async_trait]
impl QuestionProvider for StubQuestions {
    async fn generate_questions(
        &self,
        _category: Category,
    ) -> Result<Vec<QuestionDraft>, ProviderError> {
        self.gate.pass().await;

        if self.fail {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(self.drafts.clone())
    }
}

/// Image provider returning a fixed result.
#[derive(Default)]
pub struct StubImages {
    image: Option<Image>,
    fail: bool,
    gate: Gate,
}

impl StubImages {
    pub fn returning(image: Option<Image>) -> Self {
        Self {
            image,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }
}

#[async_trait]
impl ImageProvider for StubImages {
    async fn generate_image(&self, _description: &str) -> Result<Option<Image>, ProviderError> {
        self.gate.pass().await;

        if self.fail {
            return Err(ProviderError::Status {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        Ok(self.image.clone())
    }
}

/// Build the router over stub providers.
pub fn test_app(questions: StubQuestions, images: StubImages) -> (TestClient, ApiState) {
    let state = ApiState::with_providers(
        Arc::new(questions),
        Arc::new(images),
        Environment::Development,
    );
    let app = router::router().with_state(state.clone());
    (TestClient::new(app), state)
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Response is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn request(&self, mut request: Request<Body>) -> TestResponse {
        // Rate limiting keys on the client address
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);
        request.extensions_mut().insert(ConnectInfo(addr));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            body,
            headers,
        }
    }

    fn builder(method: &str, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "127.0.0.1")
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Self::builder("GET", uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Self::builder("POST", uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let request = Self::builder("POST", uri)
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_string(body).expect("Failed to serialize body"),
            ))
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Self::builder("DELETE", uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    /// Create a session and return its id.
    pub async fn create_session(&self) -> String {
        let response = self.post("/sessions").await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["session_id"]
            .as_str()
            .expect("session_id should be a string")
            .to_string()
    }

    /// Start a quiz and wait for the questions to settle.
    pub async fn start_quiz(&self, id: &str, category: &str, expected_view: &str) -> Value {
        let response = self
            .post_json(
                &format!("/sessions/{id}/start"),
                &serde_json::json!({ "category": category }),
            )
            .await;
        assert_eq!(response.status, StatusCode::ACCEPTED);
        self.wait_for_view(id, expected_view).await
    }

    pub async fn answer(&self, id: &str, option: &str) -> TestResponse {
        self.post_json(
            &format!("/sessions/{id}/answer"),
            &serde_json::json!({ "option": option }),
        )
        .await
    }

    /// Poll the session until it shows `view`.
    pub async fn wait_for_view(&self, id: &str, view: &str) -> Value {
        let mut last = Value::Null;
        for _ in 0..200 {
            last = self.get(&format!("/sessions/{id}")).await.json();
            if last["view"] == view {
                return last;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Session never reached view '{view}', last: {last}");
    }

    /// Poll the illustration until it reaches `state`.
    pub async fn wait_for_image(&self, id: &str, state: &str) -> Value {
        let mut last = Value::Null;
        for _ in 0..200 {
            last = self.get(&format!("/sessions/{id}/image")).await.json();
            if last["state"] == state {
                return last;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Illustration never reached '{state}', last: {last}");
    }
}

/// Give spawned fetches a chance to run.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
