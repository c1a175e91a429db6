use crate::common::fixtures::RESPONSE_JSON;
use crate::common::harness::PanelTestHarness;
use codepanel::config::GenerationConfig;
use codepanel::model::GenerateRequest;
use codepanel::services::generation::{
    GenerationBackend, GenerationClient, GenerationError, GenerationSession,
};
use crossterm::event::{KeyCode, KeyModifiers};
use std::io::Read;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

/// One-shot mock of the generation endpoint.
///
/// Answers the first request with `status` and `body` and reports the
/// request's method, URL and decoded body on the returned channel.
fn mock_endpoint(
    status: u16,
    body: &'static str,
) -> (String, mpsc::Receiver<(String, String, GenerateRequest)>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok(mut request) = server.recv() else {
            return;
        };
        let mut raw = String::new();
        request.as_reader().read_to_string(&mut raw).unwrap();
        let decoded: GenerateRequest = serde_json::from_str(&raw).unwrap();
        let _ = tx.send((
            request.method().as_str().to_string(),
            request.url().to_string(),
            decoded,
        ));

        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(header);
        let _ = request.respond(response);
    });

    (format!("http://{addr}"), rx)
}

fn config_for(endpoint: String) -> GenerationConfig {
    GenerationConfig {
        endpoint,
        ..GenerationConfig::default()
    }
}

#[test]
fn test_client_posts_request_and_decodes_response() {
    let (endpoint, requests) = mock_endpoint(200, RESPONSE_JSON);
    let client = GenerationClient::new(&config_for(format!("{endpoint}/")));
    assert_eq!(client.url(), format!("{endpoint}/generate"));

    let response = client.generate("a flask app").unwrap();
    assert_eq!(response.message.as_deref(), Some("Generated a Flask app"));
    assert_eq!(response.artifacts().len(), 3);
    assert_eq!(response.vulnerability_count(), 1);

    let (method, url, request) = requests.recv().unwrap();
    assert_eq!(method, "POST");
    assert_eq!(url, "/generate");
    assert_eq!(request.prompt, "a flask app");
    assert_eq!(request.max_tokens, 2048);
    assert_eq!(request.num_docs, 3);
}

#[test]
fn test_client_reports_status_errors() {
    let (endpoint, _requests) = mock_endpoint(500, r#"{"detail": "model offline"}"#);
    let client = GenerationClient::new(&config_for(endpoint));

    match client.generate("anything") {
        Err(GenerationError::Status { code, body }) => {
            assert_eq!(code, 500);
            assert!(body.contains("model offline"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_client_reports_undecodable_body() {
    let (endpoint, _requests) = mock_endpoint(200, "<html>not json</html>");
    let client = GenerationClient::new(&config_for(endpoint));

    assert!(matches!(
        client.generate("anything"),
        Err(GenerationError::Decode(_))
    ));
}

#[test]
fn test_client_reports_unreachable_endpoint() {
    // Bind then drop a listener so the port is closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = GenerationClient::new(&config_for(format!("http://127.0.0.1:{port}")));

    assert!(matches!(
        client.generate("anything"),
        Err(GenerationError::Transport(_))
    ));
}

/// Prompt line to rendered tree, through the real HTTP client
#[test]
fn test_prompt_round_trip_through_panel() {
    let (endpoint, requests) = mock_endpoint(200, RESPONSE_JSON);
    let mut harness = PanelTestHarness::new(100, 24).unwrap();
    let client = GenerationClient::new(&config_for(endpoint));
    harness
        .panel_mut()
        .set_generation_session(GenerationSession::new(Arc::new(client)));

    harness.send_key(KeyCode::Char('p'), KeyModifiers::NONE).unwrap();
    harness.type_text("flask app").unwrap();
    harness.assert_screen_contains("Prompt: flask app");
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    harness
        .wait_until(|h| h.panel().file_count() == 3)
        .unwrap();

    assert_eq!(requests.recv().unwrap().2.prompt, "flask app");
    assert_eq!(harness.panel().selection(), Some("app/main.py"));
    harness.assert_screen_contains("Generated a Flask app");
    harness.assert_screen_contains("1 vulnerabilities reported");
    harness.assert_screen_contains("Tip: Disable debug mode in production");
    harness.assert_screen_contains("1 │ from flask import Flask");
    harness.assert_screen_contains("requirements.txt");
}

/// A failing request leaves the current artifacts on screen
#[test]
fn test_failed_request_keeps_artifacts() {
    let (endpoint, _requests) = mock_endpoint(503, "busy");
    let mut harness = PanelTestHarness::new(100, 24).unwrap();
    harness
        .load(vec![codepanel::model::Artifact::new("keep.py", "x = 1")])
        .unwrap();
    let client = GenerationClient::new(&config_for(endpoint));
    harness
        .panel_mut()
        .set_generation_session(GenerationSession::new(Arc::new(client)));

    harness.panel_mut().request_generation("again".to_string());
    harness
        .wait_until(|h| !h.panel().is_generating())
        .unwrap();

    harness.assert_screen_contains("Generation failed: endpoint returned status 503: busy");
    assert_eq!(harness.panel().selection(), Some("keep.py"));
    harness.assert_screen_contains("1 │ x = 1");
}
