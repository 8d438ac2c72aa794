//! Shared HTTP plumbing: sending, status mapping, and body decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use unillm_core::utils::truncate_string;
use unillm_core::{LlmError, ProviderKind, Result};

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send a request, mapping transport failures to [`LlmError::Unknown`].
pub(crate) async fn send(
    provider: ProviderKind,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response> {
    request.send().await.map_err(|e| {
        // The URL can carry a query-string API key.
        let e = e.without_url();
        error!(provider = %provider, error = %e, "HTTP request failed");
        LlmError::unknown(provider, format!("request failed: {e}"), e)
    })
}

/// Read the body of a response, turning a non-success status into [`LlmError::Http`].
pub(crate) async fn read_success(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        let e = e.without_url();
        LlmError::unknown(provider, format!("failed to read response body: {e}"), e)
    })?;

    if !status.is_success() {
        let message = error_message(&body)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        error!(
            provider = %provider,
            status = %status,
            body = %truncate_string(&body, 200),
            "API error"
        );
        return Err(LlmError::Http {
            provider,
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// `send` followed by `read_success`.
pub(crate) async fn execute(
    provider: ProviderKind,
    request: reqwest::RequestBuilder,
) -> Result<String> {
    let response = send(provider, request).await?;
    read_success(provider, response).await
}

/// Decode a typed response envelope.
pub(crate) fn parse_body<T: DeserializeOwned>(provider: ProviderKind, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        error!(provider = %provider, error = %e, "Failed to parse LLM response");
        LlmError::unknown(provider, format!("unexpected response body: {e}"), e)
    })
}

/// Best-effort message from an error payload.
///
/// Tries `error.message`, then a string `error`, then a top-level `message`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("error"),
        value.get("message"),
    ];
    let found = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);
    found
}

/// Loose text extraction for the enterprise gateways, whose envelope varies by deployment.
///
/// Returns the first non-empty string among `response`,
/// `choices[0].message.content` and `content`, else an empty string.
pub(crate) fn extract_gateway_text(provider: ProviderKind, body: &str) -> Result<String> {
    let value: Value = parse_body(provider, body)?;
    let text = ["/response", "/choices/0/message/content", "/content"]
        .into_iter()
        .filter_map(|pointer| value.pointer(pointer))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    Ok(text.to_string())
}
