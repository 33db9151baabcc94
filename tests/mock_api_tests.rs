//! Mock API tests for the streaming translation client.
//!
//! These tests run the Gemini client against a wiremock server speaking the
//! SSE framing of `streamGenerateContent`, without hitting real endpoints.

use futures::StreamExt;
use subtrans::config::OutputFormat;
use subtrans::session::TranslationSession;
use subtrans::translate::{GeminiTranslator, Translator};
use subtrans::SubtransError;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_event(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
    )
}

async fn mock_stream_server(events: &[&str]) -> MockServer {
    let body: String = events.iter().map(|t| sse_event(t)).collect();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:streamGenerateContent$"))
        .and(query_param("alt", "sse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;
    server
}

// ============================================================================
// Streaming Success Tests
// ============================================================================

mod streaming_tests {
    use super::*;

    #[tokio::test]
    async fn test_fragments_arrive_in_order() {
        let server = mock_stream_server(&[
            "WEBVTT\n\n00:00:01.000",
            " --> 00:00:02.000\nHola\n\n",
            "00:00:03.000 --> 00:00:04.000\nAdiós",
        ])
        .await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let mut stream = translator.submit("translate this").await.unwrap();

        let mut fragments = Vec::new();
        while let Some(item) = stream.next().await {
            fragments.push(item.unwrap());
        }

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], "WEBVTT\n\n00:00:01.000");
        assert_eq!(
            fragments.concat(),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHola\n\n00:00:03.000 --> 00:00:04.000\nAdiós"
        );
    }

    #[tokio::test]
    async fn test_streamed_fragments_drive_session() {
        let server = mock_stream_server(&[
            "1\n00:00:01.000 --> 00:00:02.000\nHola\n\n",
            "2\n00:00:03.000 --> 00:00:04.000\nAdiós",
        ])
        .await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let mut stream = translator.submit("translate this").await.unwrap();

        let mut session = TranslationSession::new();
        session.load_source("movie.srt");
        let id = session.begin();

        while let Some(item) = stream.next().await {
            session.push_fragment(id, &item.unwrap());
        }
        session.finish(id);

        // Stray SRT-style cue numbers in the model output are sanitized away
        assert_eq!(
            session.canonical_vtt(),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHola\n\n00:00:03.000 --> 00:00:04.000\nAdiós"
        );
        assert_eq!(
            session.render_as(OutputFormat::Srt),
            "1\n00:00:01,000 --> 00:00:02,000\nHola\n\n2\n00:00:03,000 --> 00:00:04,000\nAdiós"
        );
    }

    #[tokio::test]
    async fn test_empty_stream_yields_no_fragments() {
        let server = mock_stream_server(&[]).await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let mut stream = translator.submit("translate this").await.unwrap();

        assert!(stream.next().await.is_none());
    }
}

// ============================================================================
// Error Classification Tests
// ============================================================================

mod error_tests {
    use super::*;

    async fn mock_error_server(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_invalid_api_key_classified() {
        let server = mock_error_server(
            400,
            r#"{"error":{"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        )
        .await;

        let translator = GeminiTranslator::new("bad-key".to_string()).with_base_url(server.uri());
        let result = translator.submit("translate this").await;

        assert!(matches!(result, Err(SubtransError::InvalidApiKey(_))));
    }

    #[tokio::test]
    async fn test_not_found_classified_as_unauthorized() {
        let server = mock_error_server(404, "Requested entity was not found.").await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let result = translator.submit("translate this").await;

        assert!(matches!(result, Err(SubtransError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_server_error_classified_as_generic() {
        let server = mock_error_server(500, "internal error").await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let result = translator.submit("translate this").await;

        assert!(matches!(result, Err(SubtransError::Api(_))));
    }

    #[tokio::test]
    async fn test_in_stream_error_payload() {
        let server = MockServer::start().await;
        let body = "data: {\"error\":{\"message\":\"Requested entity was not found.\"}}\n\n";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let translator = GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let mut stream = translator.submit("translate this").await.unwrap();

        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(SubtransError::Unauthorized(_))));
    }
}

// ============================================================================
// Client Configuration Tests
// ============================================================================

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_translator_name() {
        let translator = GeminiTranslator::new("test-key".to_string());
        assert_eq!(translator.name(), "gemini");
    }

    #[tokio::test]
    async fn test_model_appears_in_request_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/gemini-2\.0-flash:streamGenerateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let translator = GeminiTranslator::new("test-key".to_string())
            .with_model("gemini-2.0-flash")
            .with_base_url(server.uri());
        let _ = translator.submit("x").await.unwrap();
    }
}
