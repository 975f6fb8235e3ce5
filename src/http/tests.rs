//! Tests for the HTTP client module

use super::*;
use crate::config::AuthSettings;
use crate::document::{ApiDocument, SecurityScheme};
use crate::interceptor::Authentication;
use crate::types::HttpMethod;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn oauth_document() -> ApiDocument {
    ApiDocument::new()
        .with_scheme(
            "oauth",
            SecurityScheme::OAuth2 {
                flows: Default::default(),
            },
        )
        .with_security(vec![IndexMap::from([("oauth".to_string(), vec![])])])
}

fn oauth_auth(server: &MockServer) -> Arc<Authentication> {
    let settings = AuthSettings::new(server.uri())
        .with_oauth_client("client", "secret", "/oauth/token")
        .with_grant_type("client_credentials");
    Arc::new(Authentication::new(settings, oauth_document()).unwrap())
}

async fn mount_tokens(server: &MockServer, tokens: &[&str]) {
    for token in tokens {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "access_token": token,
                "expires_in": 3600
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(server)
            .await;
    }
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_auth_retries, 1);
    assert!(config.default_headers.is_empty());
    assert!(config.user_agent.starts_with("openapi-auth/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_auth_retries(3)
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_auth_retries, 3);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[tokio::test]
async fn test_invalid_default_header() {
    let server = MockServer::start().await;
    let config = HttpClientConfig::builder().header("bad header", "v").build();

    let result = AuthenticatedClient::with_config(oauth_auth(&server), config);

    assert!(matches!(result, Err(crate::Error::InvalidHeader { .. })));
}

#[tokio::test]
async fn test_get_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(header("X-Api-Key", "secret123"))
        .and(header("X-Custom", "value"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let document = ApiDocument::new()
        .with_scheme(
            "apiKeyAuth",
            SecurityScheme::ApiKey {
                location: Some(crate::document::ApiKeyLocation::Header),
                name: Some("X-Api-Key".to_string()),
            },
        )
        .with_operation(
            "/pets",
            HttpMethod::Get,
            vec![IndexMap::from([("apiKeyAuth".to_string(), vec![])])],
        );
    let settings = AuthSettings::new(server.uri()).with_api_key_value("secret123");
    let auth = Arc::new(Authentication::new(settings, document).unwrap());
    let client = AuthenticatedClient::with_config(
        auth,
        HttpClientConfig::builder().header("X-Custom", "value").build(),
    )
    .unwrap();

    let response = client
        .get(&format!("{}/pets", server.uri()), "/pets")
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_unauthorized_retries_with_new_token() {
    let server = MockServer::start().await;
    mount_tokens(&server, &["stale", "fresh"]).await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthenticatedClient::new(oauth_auth(&server)).unwrap();
    let response = client
        .get(&format!("{}/pets", server.uri()), "/pets")
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
    assert!(client.authentication().token_cache().is_valid().await);
}

#[tokio::test]
async fn test_unauthorized_without_retries() {
    let server = MockServer::start().await;
    mount_tokens(&server, &["stale"]).await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthenticatedClient::with_config(
        oauth_auth(&server),
        HttpClientConfig::builder().max_auth_retries(0).build(),
    )
    .unwrap();
    let response = client
        .get(&format!("{}/pets", server.uri()), "/pets")
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert!(!client.authentication().token_cache().is_valid().await);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    mount_tokens(&server, &["t1", "t2", "t3"]).await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;

    let client = AuthenticatedClient::with_config(
        oauth_auth(&server),
        HttpClientConfig::builder().max_auth_retries(2).build(),
    )
    .unwrap();
    let response = client
        .get(&format!("{}/pets", server.uri()), "/pets")
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_token_reused_across_requests() {
    let server = MockServer::start().await;
    mount_tokens(&server, &["only"]).await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(header("Authorization", "Bearer only"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let client = AuthenticatedClient::new(oauth_auth(&server)).unwrap();
    for _ in 0..3 {
        let response = client
            .get(&format!("{}/pets", server.uri()), "/pets")
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let server = MockServer::start().await;
    mount_tokens(&server, &["only"]).await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthenticatedClient::new(oauth_auth(&server)).unwrap();
    let response = client
        .get(&format!("{}/pets", server.uri()), "/pets")
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    assert!(client.authentication().token_cache().is_valid().await);
}
