//! Shared fakes and request helpers for the router tests.

#![allow(dead_code)]

use api_lib::{
    adapters::{
        BrowserSpeechNarrator, InMemoryAuthSessionStore, InMemoryUserRepository, StaticAccounts,
    },
    config::Config,
    web::{self, AppState},
};
use async_trait::async_trait;
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use study_buddy_core::{
    domain::{ChatRequest, Narration, NarrationAudio, NarrationRequest, Voice, VoiceInfo},
    ports::{
        ChatCompletionService, NarrationProvider, PortError, PortResult, TextExtractionService,
        VoiceCatalog,
    },
};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@studybuddy.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const USER_EMAIL: &str = "user@studybuddy.com";
pub const USER_PASSWORD: &str = "user123";

//=========================================================================================
// Fakes
//=========================================================================================

pub struct FakeExtractor {
    pub text: String,
    pub calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractionService for FakeExtractor {
    async fn extract_text(&self, _pdf_bytes: &[u8]) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Answers every completion with the same reply and records each request.
pub struct ScriptedLlm {
    pub reply: String,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionService for ScriptedLlm {
    async fn complete(&self, request: &ChatRequest) -> PortResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// A cloud narrator that returns fixed bytes, or a fixed failure.
pub struct FakeCloudNarrator {
    pub failure: Option<fn() -> PortError>,
}

#[async_trait]
impl NarrationProvider for FakeCloudNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> PortResult<Narration> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        let voice = request
            .voice
            .unwrap_or_else(|| Voice::for_language(request.language));
        Ok(Narration::Audio(NarrationAudio {
            audio: b"ID3fake".to_vec(),
            voice_id: voice.provider_id().to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
        }))
    }
}

pub struct FakeVoices;

#[async_trait]
impl VoiceCatalog for FakeVoices {
    async fn list_voices(&self) -> PortResult<Vec<VoiceInfo>> {
        Ok(["Varun R", "Rachel", "Monika Sogam"]
            .iter()
            .enumerate()
            .map(|(i, name)| VoiceInfo {
                id: format!("v{}", i),
                name: name.to_string(),
                category: "premade".to_string(),
            })
            .collect())
    }
}

//=========================================================================================
// Harness
//=========================================================================================

pub struct Harness {
    pub app: Router,
    pub extractor: Arc<FakeExtractor>,
    pub llm: Arc<ScriptedLlm>,
}

pub struct HarnessBuilder {
    extracted_text: String,
    reply: String,
    llm_override: Option<Arc<dyn ChatCompletionService>>,
    extractor_override: Option<Arc<dyn TextExtractionService>>,
    cloud_failure: Option<fn() -> PortError>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            extracted_text: "First paragraph.\n\nSecond paragraph.".to_string(),
            reply: "### Overview\n**Photosynthesis** turns light into sugar.".to_string(),
            llm_override: None,
            extractor_override: None,
            cloud_failure: None,
        }
    }
}

impl HarnessBuilder {
    pub fn extracted_text(mut self, text: &str) -> Self {
        self.extracted_text = text.to_string();
        self
    }

    pub fn reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    pub fn llm(mut self, llm: Arc<dyn ChatCompletionService>) -> Self {
        self.llm_override = Some(llm);
        self
    }

    /// Replaces the fake extractor in the router; `Harness::extractor` then sees no calls.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractionService>) -> Self {
        self.extractor_override = Some(extractor);
        self
    }

    pub fn cloud_failure(mut self, failure: fn() -> PortError) -> Self {
        self.cloud_failure = Some(failure);
        self
    }

    pub fn build(self) -> Harness {
        let config = Arc::new(Config::default());
        let extractor = Arc::new(FakeExtractor::new(&self.extracted_text));
        let llm = Arc::new(ScriptedLlm::new(&self.reply));
        let state = AppState {
            config: config.clone(),
            extractor: self
                .extractor_override
                .unwrap_or_else(|| extractor.clone() as Arc<dyn TextExtractionService>),
            llm: self
                .llm_override
                .unwrap_or_else(|| llm.clone() as Arc<dyn ChatCompletionService>),
            cloud_narrator: Arc::new(FakeCloudNarrator {
                failure: self.cloud_failure,
            }),
            browser_narrator: Arc::new(BrowserSpeechNarrator::new()),
            voices: Arc::new(FakeVoices),
            users: Arc::new(InMemoryUserRepository::seeded()),
            accounts: Arc::new(
                StaticAccounts::new(&config.admin_email, &config.admin_password).unwrap(),
            ),
            sessions: Arc::new(InMemoryAuthSessionStore::new()),
        };
        Harness {
            app: web::router(Arc::new(state)),
            extractor,
            llm,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

//=========================================================================================
// Documents
//=========================================================================================

/// Builds a real PDF with one line of Courier text per page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

//=========================================================================================
// Request helpers
//=========================================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        set_cookie,
        body,
    }
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn upload_request(cookie: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let boundary = "study-buddy-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

/// Logs in and returns the `session=<id>` pair to send back as a cookie.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    let set_cookie = response.set_cookie.expect("login sets a cookie");
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}
