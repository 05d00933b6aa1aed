mod common;

use api_lib::adapters::{LopdfExtractor, OpenAiChatAdapter};
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::*;
use serde_json::json;
use std::sync::Arc;
use study_buddy_core::{domain::Voice, PortError};

#[tokio::test]
async fn study_routes_require_a_session() {
    let h = harness();
    for uri in ["/summarize", "/generate-flashcards", "/generate-quiz", "/tts", "/quiz/score"] {
        let response = send(&h.app, json_request("POST", uri, None, json!({"text": "x"}))).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
    let response = send(&h.app, get_request("/tts/voices", None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_rejects_non_pdf_before_extraction() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(&h.app, upload_request(&cookie, "text/plain", b"hello")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "UnsupportedMediaType");
    assert_eq!(h.extractor.calls(), 0);
}

#[tokio::test]
async fn upload_returns_paragraph_chunks() {
    let h = HarnessBuilder::default()
        .extracted_text("  Intro line.\r\n\r\n\n   \nBody text\ncontinues.\n\n\n")
        .build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(&h.app, upload_request(&cookie, "application/pdf", b"%PDF-1.4")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["chunks"],
        json!(["Intro line.", "Body text\ncontinues."])
    );
    assert_eq!(h.extractor.calls(), 1);
}

#[tokio::test]
async fn summarize_works_for_every_language() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    for language in ["english", "telugu", "hindi", "tamil", "kannada"] {
        let response = send(
            &h.app,
            json_request(
                "POST",
                "/summarize",
                Some(&cookie),
                json!({"text": "Plants make food from light.", "language": language}),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK, "{}", language);
        let plain = response.body["plainText"].as_str().unwrap();
        assert!(!plain.contains('*'));
        assert!(!plain.lines().any(|l| l.starts_with('#')));
        assert!(plain.starts_with("Overview: "));
    }

    let requests = h.llm.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests.iter().all(|r| r.temperature == 0.8 && r.max_tokens == 1000));
    assert!(requests[1].user.contains("Telugu"));
}

#[tokio::test]
async fn summarize_defaults_to_telugu_and_rejects_unknown_languages() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request("POST", "/summarize", Some(&cookie), json!({"text": "Some notes."})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(h.llm.requests()[0].user.contains("Telugu"));

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/summarize",
            Some(&cookie),
            json!({"text": "Some notes.", "language": "klingon"}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &h.app,
        json_request("POST", "/summarize", Some(&cookie), json!({"text": "   "})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "ValidationError");
}

#[tokio::test]
async fn missing_openai_key_is_a_configuration_error() {
    let h = HarnessBuilder::default()
        .llm(Arc::new(OpenAiChatAdapter::new(None)))
        .build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/summarize",
            Some(&cookie),
            json!({"text": "Some notes.", "language": "english"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "ConfigurationError");
}

#[tokio::test]
async fn explain_returns_the_model_text() {
    let h = HarnessBuilder::default().reply("Simple ga cheppali ante...").build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request("POST", "/explain", Some(&cookie), json!({"chunk": "Mitochondria."})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["explanation"], "Simple ga cheppali ante...");
    assert_eq!(h.llm.requests()[0].max_tokens, 400);
}

#[tokio::test]
async fn flashcards_are_normalized_and_counts_are_bounded() {
    let h = HarnessBuilder::default()
        .reply(r#"```json
[{"question": "What is ATP?", "answer": "Energy currency"}, {"question": "", "answer": "dropped"}]
```"#)
        .build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/generate-flashcards",
            Some(&cookie),
            json!({"text": "Cells use ATP.", "count": 2}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["language"], "english");
    assert_eq!(response.body["flashcards"][0]["category"], "General");
    assert!(response.body["flashcards"][0]["id"]
        .as_str()
        .unwrap()
        .starts_with("flashcard_"));

    for count in [0, 51] {
        let response = send(
            &h.app,
            json_request(
                "POST",
                "/generate-flashcards",
                Some(&cookie),
                json!({"text": "Cells use ATP.", "count": count}),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "count {}", count);
    }
    assert_eq!(h.llm.requests().len(), 1);
}

#[tokio::test]
async fn quiz_generation_reports_difficulty_and_rejects_prose() {
    let quiz = json!([{
        "id": "q1",
        "question": "Which organelle makes ATP?",
        "options": ["Nucleus", "Mitochondria", "Ribosome", "Golgi"],
        "correctAnswer": 1,
        "explanation": "Mitochondria run cellular respiration.",
        "category": "Biology"
    }]);
    let h = HarnessBuilder::default().reply(&quiz.to_string()).build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/generate-quiz",
            Some(&cookie),
            json!({"text": "Cells.", "language": "hindi", "questionCount": 1, "difficulty": "hard"}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["difficulty"], "hard");
    assert_eq!(response.body["language"], "hindi");
    assert_eq!(response.body["questions"][0]["correctAnswer"], 1);
    assert_eq!(h.llm.requests()[0].max_tokens, 3000);

    let prose = HarnessBuilder::default().reply("Sure! Here is your quiz.").build();
    let cookie = login(&prose.app, USER_EMAIL, USER_PASSWORD).await;
    let response = send(
        &prose.app,
        json_request("POST", "/generate-quiz", Some(&cookie), json!({"text": "Cells."})),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "MalformedGenerationError");
}

#[tokio::test]
async fn cloud_tts_returns_base64_audio_and_picks_voice_by_language() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/tts",
            Some(&cookie),
            json!({"text": "Namaskaram", "language": "telugu"}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["voiceId"], Voice::VarunR.provider_id());
    assert_eq!(response.body["model_id"], "eleven_multilingual_v2");
    let audio = STANDARD
        .decode(response.body["audio"].as_str().unwrap())
        .unwrap();
    assert_eq!(audio, b"ID3fake");

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/tts",
            Some(&cookie),
            json!({"text": "Hello", "voiceId": "monika-sogam", "language": "telugu"}),
        ),
    )
    .await;
    assert_eq!(response.body["voiceId"], Voice::MonikaSogam.provider_id());
}

#[tokio::test]
async fn browser_tts_returns_clamped_speech_settings() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/tts",
            Some(&cookie),
            json!({"text": "Hello", "language": "kannada", "engine": "browser", "rate": 3.0}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["lang"], "en-IN");
    assert_eq!(response.body["rate"], 2.0);
    assert_eq!(response.body["volume"], 1.0);
    assert!(response.body.get("audio").is_none());
}

#[tokio::test]
async fn provider_failures_keep_their_status() {
    let cases: [(fn() -> PortError, StatusCode, &str); 4] = [
        (
            || PortError::Authentication("bad key".into()),
            StatusCode::UNAUTHORIZED,
            "AuthenticationError",
        ),
        (
            || PortError::AccessDenied("quota".into()),
            StatusCode::FORBIDDEN,
            "AccessDeniedError",
        ),
        (
            || PortError::RateLimited("slow".into()),
            StatusCode::TOO_MANY_REQUESTS,
            "RateLimitedError",
        ),
        (
            || PortError::Configuration("ElevenLabs API key not set.".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "ConfigurationError",
        ),
    ];

    for (failure, status, kind) in cases {
        let h = HarnessBuilder::default().cloud_failure(failure).build();
        let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;
        let response = send(
            &h.app,
            json_request("POST", "/tts", Some(&cookie), json!({"text": "Hello"})),
        )
        .await;
        assert_eq!(response.status, status);
        assert_eq!(response.body["kind"], kind);
    }
}

#[tokio::test]
async fn voices_include_the_indian_subset() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(&h.app, get_request("/tts/voices", Some(&cookie))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalVoices"], 3);
    let indian: Vec<&str> = response.body["indianVoices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(indian, ["Varun R", "Monika Sogam"]);
}

#[tokio::test]
async fn quiz_attempts_are_scored() {
    let h = harness();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;
    let question = |id: &str, answer: usize| {
        json!({
            "id": id, "question": "?", "options": ["a", "b", "c"],
            "correctAnswer": answer, "explanation": "", "category": "General"
        })
    };
    let questions = json!([question("1", 0), question("2", 2), question("3", 1)]);

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/quiz/score",
            Some(&cookie),
            json!({"questions": questions, "selectedAnswers": [0, 2, null], "timeSpent": 42}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["correctAnswers"], 2);
    assert_eq!(response.body["totalQuestions"], 3);
    assert_eq!(response.body["score"], 67);
    assert_eq!(response.body["timeSpent"], 42);

    let response = send(
        &h.app,
        json_request(
            "POST",
            "/quiz/score",
            Some(&cookie),
            json!({"questions": questions, "selectedAnswers": [0]}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_then_summarize_each_chunk() {
    let h = HarnessBuilder::default()
        .extracted_text("Chapter one.\n\nChapter two.")
        .reply("> Key idea\n- point one\n- point two")
        .build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let upload = send(&h.app, upload_request(&cookie, "application/pdf", b"%PDF-1.4")).await;
    let chunks = upload.body["chunks"].as_array().unwrap().clone();
    assert_eq!(chunks.len(), 2);

    for chunk in chunks {
        let response = send(
            &h.app,
            json_request(
                "POST",
                "/summarize",
                Some(&cookie),
                json!({"text": chunk, "language": "english"}),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["plainText"], "Key idea point one. point two.");
    }
}

#[tokio::test]
async fn real_pdf_is_chunked_and_summarized_as_one_text() {
    let reply = "## Greetings\n- **Hello** to the _world_\n- Goodbye";
    let h = HarnessBuilder::default()
        .extractor(Arc::new(LopdfExtractor::new()))
        .reply(reply)
        .build();
    let cookie = login(&h.app, USER_EMAIL, USER_PASSWORD).await;

    let pdf = pdf_with_pages(&["Hello world.", "Goodbye."]);
    let upload = send(&h.app, upload_request(&cookie, "application/pdf", &pdf)).await;
    assert_eq!(upload.status, StatusCode::OK, "{}", upload.body);
    assert_eq!(upload.body["chunks"], json!(["Hello world.", "Goodbye."]));
    assert_eq!(h.extractor.calls(), 0);

    let joined = upload.body["chunks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect::<Vec<_>>()
        .join("\n\n");
    let response = send(
        &h.app,
        json_request(
            "POST",
            "/summarize",
            Some(&cookie),
            json!({"text": joined, "language": "english"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let summary = response.body["summary"].as_str().unwrap();
    let plain = response.body["plainText"].as_str().unwrap();
    assert_eq!(plain, study_buddy_core::markdown::to_plain_text(summary));
    assert_eq!(plain, "Greetings: Hello to the world. Goodbye.");

    let requests = h.llm.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user.contains("Hello world.\n\nGoodbye."));
}
