//! HTTP-level tests for the OpenAI-compatible provider against a local mock server.

use tellerbot_core::error::ProviderError;
use tellerbot_core::message::Message;
use tellerbot_core::provider::{Provider, ProviderRequest, ResponseFormat};
use tellerbot_providers::OpenAiCompatProvider;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new("mock", format!("{}/v1beta/openai/", server.uri()), "test-key")
        .expect("provider")
}

fn balance_request() -> ProviderRequest {
    let mut request = ProviderRequest::new(
        "gemini-2.0-flash",
        vec![
            Message::system("You are a bank agent."),
            Message::user("Check balance for account 12345"),
        ],
    );
    request.response_format = Some(ResponseFormat::json_schema(
        "BalanceResult",
        serde_json::json!({
            "type": "object",
            "properties": {"balance": {"type": "string"}},
            "required": ["balance"]
        }),
    ));
    request
}

#[tokio::test]
async fn posts_chat_completion_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gemini-2.0-flash",
            "response_format": {"type": "json_schema"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "gemini-2.0-flash",
            "choices": [{
                "message": {"role": "assistant", "content": "{\"balance\":\"100000\"}"}
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 6, "total_tokens": 26}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(balance_request())
        .await
        .expect("completion");

    assert_eq!(response.message.content, r#"{"balance":"100000"}"#);
    assert!(response.message.tool_calls.is_empty());
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(26));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(balance_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn rate_limit_is_reported_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(balance_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(balance_request())
        .await
        .unwrap_err();
    match err {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let provider = OpenAiCompatProvider::new("dead", "http://127.0.0.1:9", "test-key")
        .expect("provider");
    let err = provider.complete(balance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)));
}
