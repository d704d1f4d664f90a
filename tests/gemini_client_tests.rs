use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use trip_planner_rs::{
    AttemptOutcome, GeminiClient, ModelClient, Planner, PlannerConfig, PlannerError, Source,
};

const INSTRUCTION: &str = "Return ONLY valid JSON.";
const TIMEOUT: Duration = Duration::from_secs(5);

fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}
        ]
    })
    .to_string()
}

fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
    GeminiClient::new("test-key")
        .unwrap()
        .with_base_url(server.url())
}

#[tokio::test]
async fn test_success_returns_first_part_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Return ONLY valid JSON".to_string()),
            Matcher::Regex("User Request: 3 days in Lisbon".to_string()),
            Matcher::Regex("generationConfig".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("{\"destination\": \"Lisbon\"}"))
        .create_async()
        .await;

    let outcome = client_for(&server)
        .attempt("gemini-2.0-flash", INSTRUCTION, "3 days in Lisbon", TIMEOUT)
        .await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        AttemptOutcome::Success("{\"destination\": \"Lisbon\"}".to_string())
    );
}

#[tokio::test]
async fn test_server_error_is_recoverable_with_upstream_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-2.5-pro:generateContent")
        .with_status(503)
        .with_body(
            json!({"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}})
                .to_string(),
        )
        .create_async()
        .await;

    let outcome = client_for(&server)
        .attempt("gemini-2.5-pro", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    assert_eq!(
        outcome,
        AttemptOutcome::recoverable(Some(503), "The model is overloaded.")
    );
}

#[tokio::test]
async fn test_unknown_model_is_recoverable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-9-ultra:generateContent")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let outcome = client_for(&server)
        .attempt("gemini-9-ultra", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    assert_eq!(outcome, AttemptOutcome::recoverable(Some(404), "not found"));
}

#[tokio::test]
async fn test_invalid_api_key_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .with_status(400)
        .with_body(
            json!({"error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = client_for(&server)
        .attempt("gemini-2.0-flash", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    match outcome {
        AttemptOutcome::FatalFailure(message) => assert!(message.contains("API key not valid")),
        other => panic!("expected fatal failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_candidate_text_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .with_status(200)
        .with_body(json!({"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_body(candidate_body("   "))
        .create_async()
        .await;

    let client = client_for(&server);
    for model in ["gemini-2.0-flash", "gemini-2.5-flash"] {
        let outcome = client.attempt(model, INSTRUCTION, "Paris", TIMEOUT).await;
        assert_eq!(outcome, AttemptOutcome::recoverable(Some(200), "empty-response"));
    }
}

#[tokio::test]
async fn test_malformed_body_is_recoverable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let outcome = client_for(&server)
        .attempt("gemini-2.0-flash", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    match outcome {
        AttemptOutcome::RecoverableFailure {
            status_code,
            message,
        } => {
            assert_eq!(status_code, Some(200));
            assert!(message.starts_with("malformed response body"));
        }
        other => panic!("expected recoverable failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unusable_credential_is_fatal_without_a_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = GeminiClient::new("bad\nkey")
        .unwrap()
        .with_base_url(server.url());
    let outcome = client
        .attempt("gemini-2.0-flash", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    mock.assert_async().await;
    assert!(matches!(outcome, AttemptOutcome::FatalFailure(_)));
}

#[tokio::test]
async fn test_connection_refused_is_recoverable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new("test-key")
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let outcome = client
        .attempt("gemini-2.0-flash", INSTRUCTION, "Paris", TIMEOUT)
        .await;

    assert!(matches!(
        outcome,
        AttemptOutcome::RecoverableFailure {
            status_code: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = GeminiClient::new("test-key")
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let outcome = client
        .attempt("gemini-2.0-flash", INSTRUCTION, "Paris", Duration::from_millis(300))
        .await;

    assert_eq!(outcome, AttemptOutcome::timeout());
}

#[tokio::test]
async fn test_generate_content_models_filters_methods() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_body(
            json!({"models": [
                {
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/text-embedding-004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]})
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(client.list_models().await.unwrap().len(), 2);

    let models = client.generate_content_models().await.unwrap();
    mock.assert_async().await;
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "models/gemini-2.0-flash");
    assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
}

#[tokio::test]
async fn test_list_models_reports_upstream_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(403)
        .with_body(json!({"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).list_models().await.unwrap_err();
    match err {
        PlannerError::UpstreamStatus { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Permission denied");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_planner_falls_through_to_second_model() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/models/first-model:generateContent")
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;
    let fenced = "```json\n{\"destination\": \"Bali, Indonesia\", \"duration\": \"5 days\", \"budgetLevel\": \"Luxury\", \"bestSeason\": \"Dry season\", \"itinerary\": [{\"day\": 1, \"theme\": \"Ubud\"}]}\n```";
    let second = server
        .mock("POST", "/models/second-model:generateContent")
        .with_status(200)
        .with_body(candidate_body(fenced))
        .create_async()
        .await;

    let config = PlannerConfig::new()
        .with_api_key(Some("test-key".to_string()))
        .with_base_url(server.url())
        .with_models(["first-model", "second-model"]);
    let planner = Planner::new(config).unwrap();
    assert!(planner.is_live());

    let envelope = planner.generate("Luxury Bali escape").await;

    first.assert_async().await;
    second.assert_async().await;
    let metadata = envelope.metadata.as_ref().unwrap();
    assert_eq!(metadata.source, Source::Live);
    assert_eq!(metadata.model_identifier.as_deref(), Some("second-model"));
    let record = envelope.parse_itinerary().unwrap().unwrap();
    assert_eq!(record.day_plans[0].theme, "Ubud");
}

#[tokio::test]
async fn test_planner_rejected_key_falls_back_to_mock() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("POST", "/models/first-model:generateContent")
        .with_status(401)
        .with_body(json!({"error": {"code": 401, "message": "Request had invalid authentication credentials.", "status": "UNAUTHENTICATED"}}).to_string())
        .create_async()
        .await;
    let never = server
        .mock("POST", "/models/second-model:generateContent")
        .expect(0)
        .create_async()
        .await;

    let config = PlannerConfig::new()
        .with_api_key(Some("expired".to_string()))
        .with_base_url(server.url())
        .with_models(["first-model", "second-model"])
        .with_mock_delay(Duration::ZERO);
    let envelope = Planner::new(config).unwrap().generate("Paris weekend").await;

    rejected.assert_async().await;
    never.assert_async().await;
    assert_eq!(envelope.source(), Some(Source::Mock));
    assert_eq!(
        envelope.parse_itinerary().unwrap().unwrap().destination,
        "Paris, France"
    );
}
