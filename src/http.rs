//! Shared HTTP plumbing for the provider clients

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::warn;

const MAX_ERROR_BODY: usize = 200;

/// Build the HTTP client used by every provider backend
///
/// Transport defaults only: no timeout and no retry policy.
pub(crate) fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Send a GET request and return the body of a successful response
///
/// Request URLs carry provider keys, so they are stripped from transport errors.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str, provider: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| {
            Error::Network(format!("{} request failed: {}", provider, e.without_url()))
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| {
            Error::Network(format!("Failed to read {} response: {}", provider, e.without_url()))
        })?;

    if !status.is_success() {
        warn!("{} returned status {}", provider, status);
        return Err(Error::Provider {
            provider: provider.to_string(),
            status: status.as_u16(),
            message: truncate_body(&body),
        });
    }

    Ok(body)
}

/// Send a GET request and decode a successful JSON response
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    provider: &str,
) -> Result<T> {
    let body = get_text(client, url, provider).await?;
    serde_json::from_str(&body).map_err(|e| {
        Error::InvalidPayload(format!("Failed to parse {} response: {}", provider, e))
    })
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY + 3);
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client().unwrap();
        let err = get_text(&client, &format!("{}/broken", server.uri()), "Upstream")
            .await
            .unwrap_err();

        match err {
            Error::Provider {
                provider,
                status,
                message,
            } => {
                assert_eq!(provider, "Upstream");
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client().unwrap();
        let result: Result<serde_json::Value> =
            get_json(&client, &format!("{}/garbage", server.uri()), "Upstream").await;

        assert!(matches!(result, Err(Error::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = client().unwrap();
        let err = get_text(&client, "http://127.0.0.1:1/nothing?key=SECRET", "Upstream")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));

        let message = err.to_string();
        assert!(!message.contains("SECRET"));
        assert!(!message.contains("/nothing"));
    }
}
